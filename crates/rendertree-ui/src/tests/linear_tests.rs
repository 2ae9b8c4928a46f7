use super::*;

#[test]
fn vertical_children_get_bounded_height_and_parent_width() {
    let policy = LinearPolicy::new(Axis::Vertical, Arrangement::Start);

    let (width, height) = policy.child_specs(0, SizeSpec::exactly(800.0), SizeSpec::exactly(600.0));
    assert_eq!(width, SizeSpec::exactly(800.0));
    assert_eq!(height, SizeSpec::at_most(600.0));

    let (width, height) = policy.child_specs(0, SizeSpec::exactly(800.0), SizeSpec::unspecified());
    assert_eq!(width, SizeSpec::exactly(800.0));
    assert_eq!(height, SizeSpec::unspecified());
}

#[test]
fn horizontal_children_keep_cross_axis_mode() {
    let policy = LinearPolicy::new(Axis::Horizontal, Arrangement::Start);

    let (width, height) = policy.child_specs(1, SizeSpec::at_most(300.0), SizeSpec::at_most(40.0));
    assert_eq!(width, SizeSpec::at_most(300.0));
    assert_eq!(height, SizeSpec::at_most(40.0));
}

#[test]
fn arrange_stacks_along_main_axis() {
    let policy = LinearPolicy::new(Axis::Vertical, Arrangement::Start);
    let children = [Size::new(50.0, 10.0), Size::new(70.0, 20.0)];

    let arranged = policy.arrange(SizeSpec::unspecified(), SizeSpec::unspecified(), &children);

    assert_eq!(arranged.size, Size::new(70.0, 30.0));
    assert_eq!(arranged.positions, vec![Point::new(0.0, 0.0), Point::new(0.0, 10.0)]);
}

#[test]
fn arrangement_shifts_children_into_free_space() {
    let children = [Size::new(10.0, 10.0), Size::new(10.0, 10.0)];

    let end = LinearPolicy::new(Axis::Horizontal, Arrangement::End).arrange(
        SizeSpec::exactly(100.0),
        SizeSpec::unspecified(),
        &children,
    );
    assert_eq!(end.positions, vec![Point::new(80.0, 0.0), Point::new(90.0, 0.0)]);

    let center = LinearPolicy::new(Axis::Horizontal, Arrangement::Center).arrange(
        SizeSpec::exactly(100.0),
        SizeSpec::unspecified(),
        &children,
    );
    assert_eq!(center.positions[0], Point::new(40.0, 0.0));
    assert_eq!(center.size, Size::new(100.0, 10.0));
}
