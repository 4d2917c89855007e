//! Contact geometry helpers.

use nalgebra::{Matrix3, Rotation3, Vector3};

/// Skew-symmetric matrix `[v]x` such that `[v]x * w = v x w`.
pub fn skew_symmetric(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Corner contacts of a rectangular patch with half-extents `lx`, `ly`.
///
/// The patch is rotated by `rpy` (roll, pitch, yaw; applied as
/// `Rz(yaw) * Ry(pitch) * Rx(roll)`) and translated to `position`. All four
/// contacts share the rotated local +Z as their normal.
///
/// Corner order: `(+lx, +ly)`, `(+lx, -ly)`, `(-lx, -ly)`, `(-lx, +ly)`.
pub fn rectangle_contacts(
    lx: f64,
    ly: f64,
    position: &Vector3<f64>,
    rpy: &Vector3<f64>,
) -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
    let rotation = Rotation3::from_euler_angles(rpy.x, rpy.y, rpy.z);
    let corners = [
        Vector3::new(lx, ly, 0.0),
        Vector3::new(lx, -ly, 0.0),
        Vector3::new(-lx, -ly, 0.0),
        Vector3::new(-lx, ly, 0.0),
    ];
    let points = corners.iter().map(|c| position + rotation * c).collect();
    let normal = rotation * Vector3::z();
    (points, vec![normal; 4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn skew_matches_cross_product() {
        let v = Vector3::new(0.3, -1.2, 2.0);
        let w = Vector3::new(-0.7, 0.4, 1.1);
        assert_relative_eq!(skew_symmetric(&v) * w, v.cross(&w), epsilon = 1e-12);
    }

    #[test]
    fn skew_is_antisymmetric() {
        let s = skew_symmetric(&Vector3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(s.transpose(), -s, epsilon = 1e-12);
    }

    #[test]
    fn flat_rectangle_corners() {
        let (p, n) = rectangle_contacts(0.2, 0.1, &Vector3::zeros(), &Vector3::zeros());
        assert_eq!(p.len(), 4);
        assert_relative_eq!(p[0], Vector3::new(0.2, 0.1, 0.0), epsilon = 1e-12);
        assert_relative_eq!(p[2], Vector3::new(-0.2, -0.1, 0.0), epsilon = 1e-12);
        for normal in &n {
            assert_relative_eq!(*normal, Vector3::z(), epsilon = 1e-12);
        }
    }

    #[test]
    fn translated_rectangle() {
        let pos = Vector3::new(1.0, -2.0, 0.5);
        let (p, _) = rectangle_contacts(0.1, 0.1, &pos, &Vector3::zeros());
        let centroid = p.iter().sum::<Vector3<f64>>() / 4.0;
        assert_relative_eq!(centroid, pos, epsilon = 1e-12);
    }

    #[test]
    fn rolled_rectangle_tilts_normal() {
        let (p, n) = rectangle_contacts(
            0.1,
            0.1,
            &Vector3::zeros(),
            &Vector3::new(FRAC_PI_2, 0.0, 0.0),
        );
        // Rolling +90 deg about X sends local +Z to world -Y.
        assert_relative_eq!(n[0], -Vector3::y(), epsilon = 1e-12);
        for point in &p {
            assert_relative_eq!(point.y, 0.0, epsilon = 1e-12);
            assert_relative_eq!(n[0].norm(), 1.0, epsilon = 1e-12);
        }
    }
}
