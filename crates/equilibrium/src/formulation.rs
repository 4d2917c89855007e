//! Linear programs for robustness and line search.
//!
//! Notation: `G` is the 6xm wrench generator matrix, `w = D c + d` the
//! gravito-inertial wrench at CoM `c`, `1` the all-ones m-vector.

use equilibrium_lp::LpProblem;
use nalgebra::{DMatrix, DVector};

/// Stand-in for "no bound". Backends treat magnitudes this large as absent.
pub const LARGE_BOUND: f64 = 1e10;

/// Floor on primal generator weights and line parameters.
pub const WEIGHT_FLOOR: f64 = -1e5;

/// Robustness, primal form.
///
/// ```text
/// max  b0
/// s.t. G b = w
///      b - b0 1 >= 0
/// ```
///
/// Variables `[b; b0]`. The optimum is `-objective`.
pub fn robustness_primal(g: &DMatrix<f64>, w: &DVector<f64>) -> LpProblem {
    let m = g.ncols();
    let mut cost = DVector::zeros(m + 1);
    cost[m] = -1.0;

    let mut constraints = DMatrix::zeros(6 + m, m + 1);
    constraints.view_mut((0, 0), (6, m)).copy_from(g);
    constraints
        .view_mut((6, 0), (m, m))
        .fill_with_identity();
    constraints.view_mut((6, m), (m, 1)).fill(-1.0);

    let mut constraint_lower = DVector::zeros(6 + m);
    let mut constraint_upper = DVector::from_element(6 + m, f64::INFINITY);
    constraint_lower.rows_mut(0, 6).copy_from(w);
    constraint_upper.rows_mut(0, 6).copy_from(w);

    LpProblem {
        cost,
        lower: DVector::from_element(m + 1, WEIGHT_FLOOR),
        upper: DVector::from_element(m + 1, LARGE_BOUND),
        constraints,
        constraint_lower,
        constraint_upper,
    }
}

/// Robustness, primal form with the slack folded into the force.
///
/// ```text
/// max  b0
/// s.t. G (b + b0 1) = w
///      b >= 0
/// ```
///
/// Same optimum as [`robustness_primal`] with only six rows.
pub fn robustness_alternate(g: &DMatrix<f64>, w: &DVector<f64>) -> LpProblem {
    let m = g.ncols();
    let mut cost = DVector::zeros(m + 1);
    cost[m] = -1.0;

    let mut constraints = DMatrix::zeros(6, m + 1);
    constraints.columns_mut(0, m).copy_from(g);
    constraints.column_mut(m).copy_from(&g.column_sum());

    let mut lower = DVector::zeros(m + 1);
    lower[m] = -LARGE_BOUND;

    LpProblem {
        cost,
        lower,
        upper: DVector::from_element(m + 1, LARGE_BOUND),
        constraints,
        constraint_lower: w.clone(),
        constraint_upper: w.clone(),
    }
}

/// Robustness, dual of [`robustness_alternate`].
///
/// ```text
/// min  w' v
/// s.t. G' v >= 0
///      (G 1)' v = 1
/// ```
///
/// The optimum is `+objective`. Infeasible and unbounded swap meaning
/// relative to the primal.
pub fn robustness_dual(g: &DMatrix<f64>, w: &DVector<f64>) -> LpProblem {
    dual_cone_problem(g, &g.column_sum(), 1.0, w)
}

/// Furthest point `a0 + p a` in equilibrium, primal form.
///
/// ```text
/// max  p
/// s.t. G b - (D a) p = D a0 + d - G 1 b0
///      b >= 0
/// ```
///
/// Variables `[b; p]`. `rhs` is the right-hand side above.
pub fn line_primal(g: &DMatrix<f64>, d_dir: &DVector<f64>, rhs: &DVector<f64>) -> LpProblem {
    let m = g.ncols();
    let mut cost = DVector::zeros(m + 1);
    cost[m] = -1.0;

    let mut constraints = DMatrix::zeros(6, m + 1);
    constraints.columns_mut(0, m).copy_from(g);
    constraints.column_mut(m).copy_from(&(-d_dir));

    let mut lower = DVector::zeros(m + 1);
    lower[m] = WEIGHT_FLOOR;

    LpProblem {
        cost,
        lower,
        upper: DVector::from_element(m + 1, LARGE_BOUND),
        constraints,
        constraint_lower: rhs.clone(),
        constraint_upper: rhs.clone(),
    }
}

/// Dual of [`line_primal`].
///
/// ```text
/// min  rhs' v
/// s.t. G' v >= 0
///      (D a)' v = -1
/// ```
///
/// The objective equals the line parameter `p` at optimum.
pub fn line_dual(g: &DMatrix<f64>, d_dir: &DVector<f64>, rhs: &DVector<f64>) -> LpProblem {
    let mut problem = dual_cone_problem(g, d_dir, -1.0, rhs);
    problem.lower.fill(-LARGE_BOUND);
    problem.upper.fill(LARGE_BOUND);
    problem
}

/// `min c' v` over `G' v >= 0`, `normal' v = level`, with `v` in R^6.
fn dual_cone_problem(
    g: &DMatrix<f64>,
    normal: &DVector<f64>,
    level: f64,
    cost: &DVector<f64>,
) -> LpProblem {
    let m = g.ncols();
    let mut constraints = DMatrix::zeros(m + 1, 6);
    constraints.rows_mut(0, m).copy_from(&g.transpose());
    constraints.row_mut(m).copy_from(&normal.transpose());

    let mut constraint_lower = DVector::zeros(m + 1);
    let mut constraint_upper = DVector::from_element(m + 1, f64::INFINITY);
    constraint_lower[m] = level;
    constraint_upper[m] = level;

    LpProblem {
        cost: cost.clone(),
        lower: DVector::from_element(6, f64::NEG_INFINITY),
        upper: DVector::from_element(6, f64::INFINITY),
        constraints,
        constraint_lower,
        constraint_upper,
    }
}
