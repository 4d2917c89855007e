//! Clarabel backend.
//!
//! Clarabel solves conic programs of the form
//!
//! ```text
//! minimize      1/2 x' P x + q' x
//! subject to    A x + s = b,  s in K
//! ```
//!
//! A bounded LP maps onto this with `P = 0`, equality rows in a zero cone
//! and every finite one-sided bound as a row of the nonnegative cone
//! (`a' x <= b`). Equalities are stacked on top of inequalities.

use clarabel::algebra::CscMatrix;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus,
    SupportedConeT::{self, NonnegativeConeT, ZeroConeT},
};
use equilibrium_core::{LpStatus, SolverConfig};
use nalgebra::{DMatrix, DVector, RowDVector};

use crate::problem::{LpProblem, LpSolution, LpSolver};

/// Entries with magnitude below this are dropped from sparse storage.
const SPARSITY_EPS: f64 = 1e-15;

// ---------------------------------------------------------------------------
// ConicForm
// ---------------------------------------------------------------------------

/// A bounded LP rewritten as `A x + s = b` with `s` in `{0}^n_eq x R+^n_ineq`.
#[derive(Clone, Debug)]
pub struct ConicForm {
    pub a_matrix: DMatrix<f64>,
    pub b_vector: DVector<f64>,
    /// Number of leading equality rows.
    pub n_eq: usize,
    /// Number of trailing inequality rows.
    pub n_ineq: usize,
}

impl ConicForm {
    /// Rewrite `problem`. Bounds that are non-finite or have magnitude
    /// `>= infinite_bound` are dropped.
    pub fn from_problem(problem: &LpProblem, infinite_bound: f64) -> Self {
        let n = problem.num_variables();
        let is_finite = |v: f64| v.is_finite() && v.abs() < infinite_bound;

        let mut eq: Vec<(RowDVector<f64>, f64)> = Vec::new();
        let mut ineq: Vec<(RowDVector<f64>, f64)> = Vec::new();

        let mut push_band = |row: RowDVector<f64>, lo: f64, hi: f64| {
            let (has_lo, has_hi) = (is_finite(lo), is_finite(hi));
            if has_lo && has_hi && lo == hi {
                eq.push((row, hi));
                return;
            }
            if has_hi {
                ineq.push((row.clone(), hi));
            }
            if has_lo {
                ineq.push((-row, -lo));
            }
        };

        // Variable bounds
        for j in 0..n {
            let mut e = RowDVector::zeros(n);
            e[j] = 1.0;
            push_band(e, problem.lower[j], problem.upper[j]);
        }

        // Constraint rows
        for i in 0..problem.num_constraints() {
            push_band(
                problem.constraints.row(i).clone_owned(),
                problem.constraint_lower[i],
                problem.constraint_upper[i],
            );
        }

        let n_eq = eq.len();
        let n_ineq = ineq.len();
        let mut a_matrix = DMatrix::zeros(n_eq + n_ineq, n);
        let mut b_vector = DVector::zeros(n_eq + n_ineq);
        for (row, (coeffs, rhs)) in eq.into_iter().chain(ineq).enumerate() {
            a_matrix.set_row(row, &coeffs);
            b_vector[row] = rhs;
        }

        Self {
            a_matrix,
            b_vector,
            n_eq,
            n_ineq,
        }
    }

    fn cones(&self) -> Vec<SupportedConeT<f64>> {
        let mut cones = Vec::with_capacity(2);
        if self.n_eq > 0 {
            cones.push(ZeroConeT(self.n_eq));
        }
        if self.n_ineq > 0 {
            cones.push(NonnegativeConeT(self.n_ineq));
        }
        cones
    }
}

// ---------------------------------------------------------------------------
// ClarabelLp
// ---------------------------------------------------------------------------

/// LP backend using Clarabel (pure Rust interior-point solver).
pub struct ClarabelLp {
    config: SolverConfig,
}

impl ClarabelLp {
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl Default for ClarabelLp {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

impl LpSolver for ClarabelLp {
    fn solve(&self, problem: &LpProblem) -> LpSolution {
        let n = problem.num_variables();
        if !problem.is_consistent() {
            tracing::error!(
                variables = n,
                rows = problem.num_constraints(),
                "LP problem has inconsistent dimensions"
            );
            return LpSolution::without_solution(LpStatus::Error, n);
        }

        let form = ConicForm::from_problem(problem, self.config.infinite_bound);
        let p_csc = zero_hessian(n);
        let a_csc = constraint_csc(&form.a_matrix);
        let cones = form.cones();

        let settings = match DefaultSettingsBuilder::default()
            .max_iter(self.config.max_iter)
            .verbose(self.config.verbose)
            .tol_gap_abs(self.config.tol_gap_abs)
            .tol_gap_rel(self.config.tol_gap_rel)
            .tol_feas(self.config.tol_feas)
            .build()
        {
            Ok(settings) => settings,
            Err(e) => {
                tracing::error!("invalid Clarabel settings: {e:?}");
                return LpSolution::without_solution(LpStatus::Error, n);
            }
        };

        let q_slice: Vec<f64> = problem.cost.iter().copied().collect();
        let b_slice: Vec<f64> = form.b_vector.iter().copied().collect();

        let mut solver =
            match DefaultSolver::new(&p_csc, &q_slice, &a_csc, &b_slice, &cones, settings) {
                Ok(solver) => solver,
                Err(e) => {
                    tracing::error!("Clarabel rejected the problem data: {e:?}");
                    return LpSolution::without_solution(LpStatus::Error, n);
                }
            };
        solver.solve();
        let sol = &solver.solution;

        let status = map_status(&sol.status);
        if !status.is_optimal() {
            tracing::debug!(clarabel_status = ?sol.status, "LP not solved to optimality");
            return LpSolution::without_solution(status, n);
        }

        LpSolution {
            status,
            objective: sol.obj_val,
            x: DVector::from_column_slice(&sol.x),
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "clarabel"
    }
}

/// Collapse Clarabel's status set into [`LpStatus`].
///
/// Clarabel reports an unbounded primal as a dual infeasibility certificate.
fn map_status(status: &SolverStatus) -> LpStatus {
    match status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => LpStatus::Optimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            LpStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => LpStatus::Unbounded,
        _ => LpStatus::Error,
    }
}

/// Column-compressed copy of `m` without its near-zero entries.
fn constraint_csc(m: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut colptr = Vec::with_capacity(m.ncols() + 1);
    let mut rowval = Vec::new();
    let mut nzval = Vec::new();
    colptr.push(0);
    for column in m.column_iter() {
        for (i, &v) in column.iter().enumerate() {
            if v.abs() > SPARSITY_EPS {
                rowval.push(i);
                nzval.push(v);
            }
        }
        colptr.push(rowval.len());
    }
    CscMatrix::new(m.nrows(), m.ncols(), colptr, rowval, nzval)
}

/// `P = 0` for an `n`-variable LP.
fn zero_hessian(n: usize) -> CscMatrix<f64> {
    CscMatrix::new(n, n, vec![0; n + 1], Vec::new(), Vec::new())
}
