//! Conversion between the LP slack `b0` and a force margin `e_max`.

use nalgebra::{Matrix3xX, Vector3};

use crate::generators::friction_cone_generators;

/// Scale between the dimensionless LP slack and a force margin in newtons.
///
/// The coefficient is the distance from the friction-cone boundary to the
/// sum of the cone's unit rays, i.e. the margin reached when every ray
/// carries weight `b0 = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobustnessMetric {
    coefficient: f64,
}

impl RobustnessMetric {
    pub const fn from_coefficient(coefficient: f64) -> Self {
        Self { coefficient }
    }

    /// `|(sum of rays) x (first ray)|` for one contact's friction cone.
    ///
    /// Only depends on friction and ray count, so any contact of a uniform
    /// set gives the same value.
    pub fn from_cone(cone: &Matrix3xX<f64>) -> Self {
        if cone.ncols() == 0 {
            return Self::from_coefficient(0.0);
        }
        let sum: Vector3<f64> = cone.column_sum();
        let first: Vector3<f64> = cone.column(0).into_owned();
        Self::from_coefficient(sum.cross(&first).norm())
    }

    /// Metric for a cone around +Z, used when a contact set is empty.
    pub fn canonical(friction: f64, per_contact: usize) -> Self {
        Self::from_cone(&friction_cone_generators(&Vector3::z(), friction, per_contact))
    }

    pub const fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn b0_to_emax(&self, b0: f64) -> f64 {
        b0 * self.coefficient
    }

    pub fn emax_to_b0(&self, e_max: f64) -> f64 {
        e_max / self.coefficient
    }
}
