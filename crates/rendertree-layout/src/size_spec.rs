//! Measurement constraints handed from a parent to a child.

use std::fmt;

/// Tolerance used when comparing a requested size against a measured one.
const SIZE_TOLERANCE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SizeSpecMode {
    /// The child must be exactly `size`.
    Exactly,
    /// The child may be as large as it wants up to `size`.
    AtMost,
    /// No constraint; `size` is only a hint.
    Unspecified,
}

/// A single-dimension measurement constraint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeSpec {
    pub mode: SizeSpecMode,
    pub size: f32,
}

impl SizeSpec {
    pub const fn new(size: f32, mode: SizeSpecMode) -> Self {
        Self { mode, size }
    }

    pub const fn exactly(size: f32) -> Self {
        Self::new(size, SizeSpecMode::Exactly)
    }

    pub const fn at_most(size: f32) -> Self {
        Self::new(size, SizeSpecMode::AtMost)
    }

    pub const fn unspecified() -> Self {
        Self::new(0.0, SizeSpecMode::Unspecified)
    }

    pub fn is_exact(&self) -> bool {
        self.mode == SizeSpecMode::Exactly
    }

    /// Resolves a preferred size against this constraint.
    pub fn resolve(&self, preferred: f32) -> f32 {
        match self.mode {
            SizeSpecMode::Exactly => self.size,
            SizeSpecMode::AtMost => preferred.min(self.size),
            SizeSpecMode::Unspecified => preferred,
        }
    }

    /// Returns whether a result measured under `self` that produced
    /// `measured` can be reused for a request of `requested`.
    pub fn is_compatible_with(&self, requested: SizeSpec, measured: f32) -> bool {
        if *self == requested {
            return true;
        }
        match (self.mode, requested.mode) {
            (SizeSpecMode::Unspecified, SizeSpecMode::Unspecified) => true,
            (_, SizeSpecMode::Exactly) => (requested.size - measured).abs() < SIZE_TOLERANCE,
            (SizeSpecMode::Unspecified, SizeSpecMode::AtMost) => measured <= requested.size,
            (SizeSpecMode::AtMost, SizeSpecMode::AtMost) => {
                self.size >= requested.size && measured <= requested.size
            }
            _ => false,
        }
    }
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self::unspecified()
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            SizeSpecMode::Exactly => write!(f, "EXACTLY {}", self.size),
            SizeSpecMode::AtMost => write!(f, "AT_MOST {}", self.size),
            SizeSpecMode::Unspecified => write!(f, "UNSPECIFIED {}", self.size),
        }
    }
}

#[cfg(test)]
#[path = "tests/size_spec_tests.rs"]
mod tests;
