//! Cone-of-generators to `H x <= h`.

use nalgebra::{DMatrix, DVector};

use crate::dd::DoubleDescription;
use crate::error::PolytopeError;

/// Half-space description `H x <= h`.
#[derive(Clone, Debug)]
pub struct HalfSpace {
    pub h_matrix: DMatrix<f64>,
    pub h_vector: DVector<f64>,
}

impl HalfSpace {
    pub fn num_rows(&self) -> usize {
        self.h_matrix.nrows()
    }

    /// Whether `H x <= h + tol` holds row-wise.
    pub fn contains(&self, x: &DVector<f64>, tol: f64) -> bool {
        (&self.h_matrix * x - &self.h_vector)
            .iter()
            .all(|&v| v <= tol)
    }
}

/// H-representation of `cone(columns of generators)`.
///
/// Equalities come back as two opposite inequalities, so the result is
/// always pure `H x <= h`.
pub fn project_cone(generators: &DMatrix<f64>) -> Result<HalfSpace, PolytopeError> {
    project_cone_with(&DoubleDescription::new(), generators)
}

/// [`project_cone`] with an explicit converter.
pub fn project_cone_with(
    dd: &DoubleDescription,
    generators: &DMatrix<f64>,
) -> Result<HalfSpace, PolytopeError> {
    let dim = generators.nrows();
    let count = generators.ncols();

    // Generator rows [0 | g'] mark every column as a ray.
    let mut rows = DMatrix::zeros(count, dim + 1);
    rows.view_mut((0, 1), (count, dim))
        .copy_from(&generators.transpose());

    let rep = dd.cone_to_half_space(&rows)?;

    let n_eq = rep.num_equalities();
    let total = rep.num_rows() + n_eq;
    let mut h_matrix = DMatrix::zeros(total, dim);
    let mut h_vector = DVector::zeros(total);

    // b + A x >= 0  <=>  -A x <= b
    let mut next_eq = rep.num_rows();
    for (i, (row, &eq)) in rep.rows.row_iter().zip(&rep.equality).enumerate() {
        let a = row.columns(1, dim);
        h_matrix.row_mut(i).copy_from(&a.map(|v| -v));
        h_vector[i] = row[0];
        if eq {
            h_matrix.row_mut(next_eq).copy_from(&a);
            h_vector[next_eq] = -row[0];
            next_eq += 1;
        }
    }

    tracing::debug!(
        generators = count,
        rows = total,
        equalities = n_eq,
        "projected generator cone"
    );

    Ok(HalfSpace { h_matrix, h_vector })
}
