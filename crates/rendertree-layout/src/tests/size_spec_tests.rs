use super::{SizeSpec, SizeSpecMode};

#[test]
fn resolve_honors_mode() {
    assert_eq!(SizeSpec::exactly(40.0).resolve(100.0), 40.0);
    assert_eq!(SizeSpec::at_most(40.0).resolve(100.0), 40.0);
    assert_eq!(SizeSpec::at_most(400.0).resolve(100.0), 100.0);
    assert_eq!(SizeSpec::unspecified().resolve(100.0), 100.0);
}

#[test]
fn identical_specs_are_compatible() {
    let spec = SizeSpec::exactly(1080.0);
    assert!(spec.is_compatible_with(SizeSpec::exactly(1080.0), 1080.0));
}

#[test]
fn unspecified_ignores_size_hint() {
    let old = SizeSpec::new(0.0, SizeSpecMode::Unspecified);
    assert!(old.is_compatible_with(SizeSpec::new(600.0, SizeSpecMode::Unspecified), 100.0));
}

#[test]
fn exact_request_matching_measured_size_is_compatible() {
    let old = SizeSpec::unspecified();
    assert!(old.is_compatible_with(SizeSpec::exactly(100.0), 100.0));
    assert!(!old.is_compatible_with(SizeSpec::exactly(600.0), 100.0));
}

#[test]
fn exact_width_change_is_incompatible() {
    let old = SizeSpec::exactly(1080.0);
    assert!(!old.is_compatible_with(SizeSpec::exactly(800.0), 1080.0));
}

#[test]
fn at_most_reuses_result_only_when_it_fits() {
    let old = SizeSpec::unspecified();
    assert!(old.is_compatible_with(SizeSpec::at_most(200.0), 100.0));
    assert!(!old.is_compatible_with(SizeSpec::at_most(50.0), 100.0));

    let old = SizeSpec::at_most(300.0);
    assert!(old.is_compatible_with(SizeSpec::at_most(200.0), 100.0));
    assert!(!old.is_compatible_with(SizeSpec::at_most(400.0), 100.0));
}

#[test]
fn exact_to_at_most_is_incompatible() {
    let old = SizeSpec::exactly(100.0);
    assert!(!old.is_compatible_with(SizeSpec::at_most(200.0), 100.0));
}
