//! Friction-cone generators mapped into gravito-inertial wrench space.
//!
//! Each contact's friction cone is approximated by `cg` unit rays spread
//! evenly around the normal. A force `f` applied at point `p` produces the
//! gravito-inertial wrench `A f` with
//!
//! ```text
//! A = [ -I        ]
//!     [ [-p]x     ]
//! ```
//!
//! so each contact contributes a `6 x cg` block `A G_i` to the stacked
//! generator matrix.

use equilibrium_core::{ValidationError, skew_symmetric};
use nalgebra::{DMatrix, DVector, Matrix3, Matrix3xX, Matrix6x3, Vector3, Vector6};

/// Allowed deviation of a contact normal's norm from 1.
pub const NORMAL_TOLERANCE: f64 = 1e-6;

/// Below this the normal is treated as parallel to the reference axis.
const TANGENT_THRESHOLD: f64 = 1e-5;

/// Two unit tangents orthogonal to `normal` and to each other.
///
/// The first tangent is `normal x Y`, or `normal x X` when the normal is
/// (nearly) aligned with Y. The second is `normal x T1`.
pub fn tangent_basis(normal: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let mut t1 = normal.cross(&Vector3::y());
    if t1.norm() < TANGENT_THRESHOLD {
        t1 = normal.cross(&Vector3::x());
    }
    let t2 = normal.cross(&t1);
    (t1.normalize(), t2.normalize())
}

/// Unit rays of a linearized friction cone, one per column.
///
/// Column `j` is `normalize(mu sin(th) T1 + mu cos(th) T2 + n)` with
/// `th = 2 pi j / count`.
pub fn friction_cone_generators(
    normal: &Vector3<f64>,
    friction: f64,
    count: usize,
) -> Matrix3xX<f64> {
    let (t1, t2) = tangent_basis(normal);
    let step = std::f64::consts::TAU / count as f64;
    let rays: Vec<Vector3<f64>> = (0..count)
        .map(|j| {
            let theta = step * j as f64;
            (t1 * (friction * theta.sin()) + t2 * (friction * theta.cos()) + normal).normalize()
        })
        .collect();
    Matrix3xX::from_columns(&rays)
}

/// 6x3 map from a contact force at `point` to the gravito-inertial wrench.
pub fn force_to_wrench(point: &Vector3<f64>) -> Matrix6x3<f64> {
    let mut a = Matrix6x3::zeros();
    a.fixed_view_mut::<3, 3>(0, 0).copy_from(&(-Matrix3::<f64>::identity()));
    a.fixed_view_mut::<3, 3>(3, 0).copy_from(&skew_symmetric(&(-point)));
    a
}

// ---------------------------------------------------------------------------
// GravityWrench
// ---------------------------------------------------------------------------

/// Constant gravity terms: the external wrench at CoM `c` is `D c + d`.
#[derive(Clone, Debug)]
pub struct GravityWrench {
    /// `D = [0; [-m g]x]`, 6x3.
    pub d_matrix: DMatrix<f64>,
    /// `d = [m g; 0]`, length 6.
    pub d_vector: DVector<f64>,
}

impl GravityWrench {
    pub fn new(mass: f64, gravity: &Vector3<f64>) -> Self {
        let weight = gravity * mass;
        let mut d_matrix = Matrix6x3::zeros();
        d_matrix
            .fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&skew_symmetric(&(-weight)));
        let mut d_vector = Vector6::zeros();
        d_vector.fixed_rows_mut::<3>(0).copy_from(&weight);
        Self {
            d_matrix: DMatrix::from_column_slice(6, 3, d_matrix.as_slice()),
            d_vector: DVector::from_column_slice(d_vector.as_slice()),
        }
    }

    /// `D c + d`.
    pub fn wrench(&self, com: &Vector3<f64>) -> DVector<f64> {
        &self.d_matrix * to_dvector(com) + &self.d_vector
    }

    /// `D a`, the wrench change per unit step along `a`.
    pub fn linear(&self, direction: &Vector3<f64>) -> DVector<f64> {
        &self.d_matrix * to_dvector(direction)
    }
}

pub(crate) fn to_dvector(v: &Vector3<f64>) -> DVector<f64> {
    DVector::from_column_slice(v.as_slice())
}

// ---------------------------------------------------------------------------
// WrenchGenerators
// ---------------------------------------------------------------------------

/// Stacked wrench generators of a contact set.
#[derive(Clone, Debug)]
pub struct WrenchGenerators {
    /// `6 x (contacts * per_contact)`; block `i` belongs to contact `i`.
    pub matrix: DMatrix<f64>,
    /// Friction-cone rays of the last contact, kept for the robustness scale.
    pub last_cone: Option<Matrix3xX<f64>>,
    pub per_contact: usize,
}

impl WrenchGenerators {
    /// Build the generator matrix, validating every contact on the way.
    ///
    /// `points` and `normals` must have the same length; normals must have
    /// unit norm within [`NORMAL_TOLERANCE`]; `friction` must be finite and
    /// strictly positive. `per_contact` is used as given.
    pub fn build(
        points: &[Vector3<f64>],
        normals: &[Vector3<f64>],
        friction: f64,
        per_contact: usize,
    ) -> Result<Self, ValidationError> {
        if points.len() != normals.len() {
            return Err(ValidationError::CountMismatch {
                points: points.len(),
                normals: normals.len(),
            });
        }
        if !(friction.is_finite() && friction > 0.0) {
            return Err(ValidationError::InvalidFriction(friction));
        }

        let mut matrix = DMatrix::zeros(6, points.len() * per_contact);
        let mut last_cone = None;
        for (index, (point, normal)) in points.iter().zip(normals).enumerate() {
            if point.iter().chain(normal.iter()).any(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteContact { index });
            }
            let norm = normal.norm();
            if (norm - 1.0).abs() > NORMAL_TOLERANCE {
                return Err(ValidationError::NonUnitNormal { index, norm });
            }

            let cone = friction_cone_generators(normal, friction, per_contact);
            let block = force_to_wrench(point) * &cone;
            matrix
                .view_mut((0, index * per_contact), (6, per_contact))
                .copy_from(&block);
            last_cone = Some(cone);
        }

        Ok(Self {
            matrix,
            last_cone,
            per_contact,
        })
    }

    pub fn num_generators(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn num_contacts(&self) -> usize {
        self.num_generators().checked_div(self.per_contact).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.ncols() == 0
    }

    /// `G 1`, the wrench of unit weight on every generator.
    pub fn column_sum(&self) -> DVector<f64> {
        self.matrix.column_sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tangents_are_orthonormal() {
        for n in [
            Vector3::z(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::new(1.0, 1.0, 1.0).normalize(),
        ] {
            let (t1, t2) = tangent_basis(&n);
            assert_relative_eq!(t1.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(t2.norm(), 1.0, epsilon = 1e-12);
            assert!(t1.dot(&n).abs() < 1e-12);
            assert!(t2.dot(&n).abs() < 1e-12);
            assert!(t1.dot(&t2).abs() < 1e-12);
        }
    }

    #[test]
    fn y_normal_falls_back_to_x_axis() {
        let (t1, _) = tangent_basis(&Vector3::y());
        assert_relative_eq!(t1, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
    }

    #[test]
    fn generators_are_unit_and_inside_cone() {
        let mu = 0.5;
        let n = Vector3::new(0.0, 0.6, 0.8);
        let g = friction_cone_generators(&n, mu, 7);
        assert_eq!(g.ncols(), 7);
        let cos_half_angle = 1.0 / (1.0 + mu * mu).sqrt();
        for col in g.column_iter() {
            assert_relative_eq!(col.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(col.dot(&n), cos_half_angle, epsilon = 1e-12);
        }
    }

    #[test]
    fn first_generator_leans_along_second_tangent() {
        let g = friction_cone_generators(&Vector3::z(), 0.5, 4);
        let (_, t2) = tangent_basis(&Vector3::z());
        let expected = (t2 * 0.5 + Vector3::z()).normalize();
        assert_relative_eq!(g.column(0).into_owned(), expected, epsilon = 1e-12);
    }

    #[test]
    fn force_to_wrench_blocks() {
        let p = Vector3::new(0.1, -0.2, 0.3);
        let a = force_to_wrench(&p);
        let f = Vector3::new(1.0, 2.0, 3.0);
        let w = a * f;
        assert_relative_eq!(w.fixed_rows::<3>(0).into_owned(), -f, epsilon = 1e-12);
        assert_relative_eq!(
            w.fixed_rows::<3>(3).into_owned(),
            (-p).cross(&f),
            epsilon = 1e-12
        );
    }

    #[test]
    fn gravity_wrench_terms() {
        let gw = GravityWrench::new(2.0, &Vector3::new(0.0, 0.0, -10.0));
        assert_relative_eq!(gw.d_vector[2], -20.0, epsilon = 1e-12);
        assert!(gw.d_vector.rows(3, 3).iter().all(|v| *v == 0.0));
        assert!(gw.d_matrix.rows(0, 3).iter().all(|v| *v == 0.0));

        // Torque part is c x (m g) for the weight applied at the CoM.
        let c = Vector3::new(0.3, 0.1, 1.0);
        let w = gw.wrench(&c);
        let torque = c.cross(&Vector3::new(0.0, 0.0, -20.0));
        assert_relative_eq!(w[3], torque.x, epsilon = 1e-12);
        assert_relative_eq!(w[4], torque.y, epsilon = 1e-12);
        assert_relative_eq!(w[5], torque.z, epsilon = 1e-12);
    }

    #[test]
    fn build_stacks_one_block_per_contact() {
        let points = vec![Vector3::new(0.5, 0.5, 0.0), Vector3::new(-0.5, -0.5, 0.0)];
        let normals = vec![Vector3::z(); 2];
        let g = WrenchGenerators::build(&points, &normals, 0.4, 5).unwrap();
        assert_eq!(g.num_generators(), 10);
        assert_eq!(g.num_contacts(), 2);
        assert!(g.last_cone.is_some());

        let cone = friction_cone_generators(&Vector3::z(), 0.4, 5);
        let expected = force_to_wrench(&points[1]) * &cone;
        assert_relative_eq!(
            g.matrix.columns(5, 5).into_owned(),
            DMatrix::from_column_slice(6, 5, expected.as_slice()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn build_rejects_non_unit_normal() {
        let err = WrenchGenerators::build(
            &[Vector3::zeros(), Vector3::zeros()],
            &[Vector3::z(), Vector3::new(0.0, 0.0, 1.0 + 1e-5)],
            0.5,
            4,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NonUnitNormal { index: 1, .. }));
    }

    #[test]
    fn build_accepts_normal_within_tolerance() {
        let normal = Vector3::new(0.0, 0.0, 1.0 + 5e-7);
        assert!(WrenchGenerators::build(&[Vector3::zeros()], &[normal], 0.5, 4).is_ok());
    }

    #[test]
    fn build_rejects_mismatched_counts() {
        let err = WrenchGenerators::build(&[Vector3::zeros()], &[], 0.5, 4).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CountMismatch {
                points: 1,
                normals: 0
            }
        );
    }

    #[test]
    fn build_rejects_bad_friction_and_nan() {
        let err =
            WrenchGenerators::build(&[Vector3::zeros()], &[Vector3::z()], -0.1, 4).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFriction(_)));

        let err =
            WrenchGenerators::build(&[Vector3::zeros()], &[Vector3::z()], 0.0, 4).unwrap_err();
        assert_eq!(err, ValidationError::InvalidFriction(0.0));

        let err = WrenchGenerators::build(
            &[Vector3::new(f64::NAN, 0.0, 0.0)],
            &[Vector3::z()],
            0.5,
            4,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::NonFiniteContact { index: 0 });
    }

    #[test]
    fn empty_contact_set_has_no_columns() {
        let g = WrenchGenerators::build(&[], &[], 0.5, 4).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.num_contacts(), 0);
        assert!(g.last_cone.is_none());
    }
}
