//! Joint-angle geometry over normalized pose landmarks.

use nalgebra::Vector2;

use crate::types::Landmark;

/// Interior angle at `vertex` between the rays toward `a` and `c`, in degrees.
///
/// Computed from the difference of the two ray headings,
/// `atan2(c - vertex) - atan2(a - vertex)`, folded into `[0, 180]`.
/// Total over finite inputs; a fully extended joint reads 180, a right-angle
/// bend reads 90.
pub fn joint_angle(a: &Landmark, vertex: &Landmark, c: &Landmark) -> f64 {
    let v = vertex.to_point2();
    let va: Vector2<f64> = a.to_point2() - v;
    let vc: Vector2<f64> = c.to_point2() - v;

    let raw = vc.y.atan2(vc.x) - va.y.atan2(va.x);
    let mut deg = raw.abs().to_degrees();
    if deg > 180.0 {
        deg = 360.0 - deg;
    }
    deg
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_collinear_is_straight() {
        let a = Landmark::at(0.5, 0.2);
        let vertex = Landmark::at(0.5, 0.5);
        let c = Landmark::at(0.5, 0.8);
        assert!((joint_angle(&a, &vertex, &c) - 180.0).abs() < TOL);
    }

    #[test]
    fn test_right_angle() {
        let a = Landmark::at(0.0, 1.0);
        let vertex = Landmark::at(0.0, 0.0);
        let c = Landmark::at(1.0, 0.0);
        assert!((joint_angle(&a, &vertex, &c) - 90.0).abs() < TOL);
    }

    #[test]
    fn test_symmetric_in_outer_points() {
        let a = Landmark::at(0.1, 0.9);
        let vertex = Landmark::at(0.4, 0.5);
        let c = Landmark::at(0.8, 0.7);
        assert!((joint_angle(&a, &vertex, &c) - joint_angle(&c, &vertex, &a)).abs() < TOL);
    }

    #[test]
    fn test_reflex_difference_folds_back() {
        // Headings 135 and -135 degrees: raw difference is 270, which must
        // fold to the 90-degree interior angle.
        let a = Landmark::at(-1.0, 1.0);
        let vertex = Landmark::at(0.0, 0.0);
        let c = Landmark::at(-1.0, -1.0);
        assert!((joint_angle(&a, &vertex, &c) - 90.0).abs() < TOL);
    }
}
