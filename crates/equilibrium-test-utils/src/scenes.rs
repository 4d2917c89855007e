//! Standard contact sets.

use equilibrium_core::rectangle_contacts;
use nalgebra::Vector3;

/// Parallel contact points and normals.
#[derive(Debug, Clone)]
pub struct ContactSet {
    pub points: Vec<Vector3<f64>>,
    pub normals: Vec<Vector3<f64>>,
}

impl ContactSet {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Four contacts at `(+-lx, +-ly, 0)` with +Z normals.
pub fn flat_square(lx: f64, ly: f64) -> ContactSet {
    let (points, normals) = rectangle_contacts(lx, ly, &Vector3::zeros(), &Vector3::zeros());
    ContactSet { points, normals }
}

/// Rectangle patch at `position` rotated by roll/pitch/yaw `rpy`.
pub fn tilted_square(lx: f64, ly: f64, position: Vector3<f64>, rpy: Vector3<f64>) -> ContactSet {
    let (points, normals) = rectangle_contacts(lx, ly, &position, &rpy);
    ContactSet { points, normals }
}

/// One contact at the origin with a +Z normal.
pub fn single_contact() -> ContactSet {
    ContactSet {
        points: vec![Vector3::zeros()],
        normals: vec![Vector3::z()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_square_has_four_upward_contacts() {
        let set = flat_square(0.5, 0.25);
        assert_eq!(set.len(), 4);
        assert!(set.normals.iter().all(|n| (n - Vector3::z()).norm() < 1e-12));
        assert!(set.points.iter().all(|p| p.x.abs() == 0.5 && p.y.abs() == 0.25));
    }

    #[test]
    fn tilted_square_normals_are_unit() {
        let rpy = Vector3::new(0.2, -0.1, 0.5);
        let set = tilted_square(0.2, 0.1, Vector3::new(0.0, 0.0, 0.3), rpy);
        assert!(set.normals.iter().all(|n| (n.norm() - 1.0).abs() < 1e-12));
    }

    #[test]
    fn single_contact_fixture() {
        let set = single_contact();
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
