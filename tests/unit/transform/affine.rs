use super::*;
use crate::foundation::core::Point;

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn absent_transform_is_identity() {
    assert_eq!(from_model(None), Affine::IDENTITY);
    assert_eq!(from_model(Some(&Transform::IDENTITY)), Affine::IDENTITY);
}

#[test]
fn model_coefficients_map_in_order() {
    let t = Transform {
        sx: 2.0,
        ky: 0.5,
        kx: 0.25,
        sy: 3.0,
        tx: 10.0,
        ty: 20.0,
    };
    let p = from_model(Some(&t)) * Point::new(1.0, 1.0);
    assert!(approx(p, Point::new(2.0 + 0.25 + 10.0, 0.5 + 3.0 + 20.0)));
}

#[test]
fn compose_applies_child_first() {
    let child = Affine::scale(2.0);
    let ambient = Affine::translate((5.0, 0.0));
    let p = compose(child, ambient) * Point::new(1.0, 1.0);
    assert!(approx(p, Point::new(7.0, 2.0)));

    let p = compose(ambient, child) * Point::new(1.0, 1.0);
    assert!(approx(p, Point::new(12.0, 2.0)));
}

#[test]
fn compose_model_matches_manual_composition() {
    let t = Transform {
        tx: 3.0,
        ..Transform::IDENTITY
    };
    let ambient = Affine::scale(4.0);
    let p = compose_model(Some(&t), ambient) * Point::ORIGIN;
    assert!(approx(p, Point::new(12.0, 0.0)));
    assert_eq!(compose_model(None, ambient), ambient);
}
