//! Owner-thread task queue.
//!
//! Background work never touches engine state directly. It posts a task onto
//! the owner's queue, and the owner runs it the next time it drains.

use std::sync::mpsc::{channel, Receiver, Sender};

use crate::pool::ContentPools;

pub type PoolTask = Box<dyn FnOnce(&mut ContentPools) + Send + 'static>;

/// Single-consumer queue drained on the thread that owns the pools.
pub(crate) struct OwnerQueue {
    sender: Sender<PoolTask>,
    receiver: Receiver<PoolTask>,
}

impl OwnerQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    pub(crate) fn handle(&self) -> TaskHandle {
        TaskHandle {
            sender: self.sender.clone(),
        }
    }

    pub(crate) fn drain(&self) -> Vec<PoolTask> {
        self.receiver.try_iter().collect()
    }
}

/// Cloneable, `Send` handle used to post tasks to the owner thread.
#[derive(Clone)]
pub struct TaskHandle {
    sender: Sender<PoolTask>,
}

impl TaskHandle {
    /// Posts a task. Returns false when the owner is gone.
    pub fn post(&self, task: PoolTask) -> bool {
        self.sender.send(task).is_ok()
    }
}
