use approx::assert_relative_eq;
use peakfit_rs::parameters::{Bounds, BoundsError, BoundsTransform};
use std::f64::{INFINITY, NEG_INFINITY};

fn transforms() -> Vec<BoundsTransform> {
    vec![
        BoundsTransform::new(Bounds::unbounded()),
        BoundsTransform::new(Bounds::min_only(1.3).unwrap()),
        BoundsTransform::new(Bounds::max_only(-2.0).unwrap()),
        BoundsTransform::new(Bounds::new(0.0, 1.0).unwrap()),
        BoundsTransform::new(Bounds::new(-50.0, 250.0).unwrap()),
    ]
}

#[test]
fn test_interior_values_map_back() {
    let values = [-40.0, -3.5, 0.2, 0.75, 1.5, 7.0, 120.0];

    for transform in transforms() {
        let bounds = transform.bounds();
        for &value in values.iter().filter(|v| bounds.min() < **v && **v < bounds.max()) {
            let internal = transform.to_internal(value).unwrap();
            assert!(internal.is_finite());
            assert_relative_eq!(transform.to_external(internal), value, max_relative = 1e-10);
        }
    }
}

#[test]
fn test_external_always_within_bounds() {
    let internals = [NEG_INFINITY, -1e300, -1e6, -1.0, 0.0, 1.0, 1e6, 1e300, INFINITY];

    for transform in transforms() {
        let bounds = transform.bounds();
        for &y in &internals {
            let value = transform.to_external(y);
            assert!(bounds.is_within_bounds(value), "{} outside {:?}", value, bounds);
        }
    }
}

#[test]
fn test_bounds_map_to_infinity() {
    let transform = BoundsTransform::new(Bounds::new(0.0, 1.0).unwrap());
    assert_eq!(transform.to_internal(0.0).unwrap(), NEG_INFINITY);
    assert_eq!(transform.to_internal(1.0).unwrap(), INFINITY);
    assert_eq!(transform.to_external(NEG_INFINITY), 0.0);
    assert_eq!(transform.to_external(INFINITY), 1.0);

    let lower = BoundsTransform::new(Bounds::min_only(1.3).unwrap());
    assert_eq!(lower.to_internal(1.3).unwrap(), NEG_INFINITY);
    assert_eq!(lower.to_external(NEG_INFINITY), 1.3);
}

#[test]
fn test_seed_moves_inside() {
    for transform in transforms() {
        let bounds = transform.bounds();
        for value in [bounds.min(), bounds.max()].into_iter().filter(|v| v.is_finite()) {
            let seeded = transform.seed(value).unwrap();
            assert!(seeded.is_finite());
            assert_relative_eq!(transform.to_external(seeded), value, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_derivative_matches_difference_quotient() {
    let h = 1e-6;
    for transform in transforms() {
        for y in [-2.0, -0.3, 0.0, 0.4, 1.7] {
            let numeric = (transform.to_external(y + h) - transform.to_external(y - h)) / (2.0 * h);
            assert_relative_eq!(transform.derivative(y), numeric, max_relative = 1e-5);
        }
    }
}

#[test]
fn test_degenerate_and_infinite() {
    let pinned = BoundsTransform::new(Bounds::new(2.0, 2.0).unwrap());
    assert_eq!(pinned.to_internal(5.0).unwrap(), 0.0);
    assert_eq!(pinned.to_external(123.0), 2.0);

    let transform = BoundsTransform::new(Bounds::unbounded());
    assert_eq!(transform.to_internal(INFINITY), Err(BoundsError::InfiniteValue));
    assert_eq!(transform.to_internal(f64::NAN), Err(BoundsError::InfiniteValue));
}
