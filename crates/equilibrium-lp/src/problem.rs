//! Problem, solution and solver trait.

use equilibrium_core::LpStatus;
use nalgebra::{DMatrix, DVector};

/// A bounded linear program.
#[derive(Clone, Debug)]
pub struct LpProblem {
    /// Cost vector `c` (n).
    pub cost: DVector<f64>,
    /// Variable lower bounds (n). `-inf` for none.
    pub lower: DVector<f64>,
    /// Variable upper bounds (n). `+inf` for none.
    pub upper: DVector<f64>,
    /// Constraint matrix `A` (m x n).
    pub constraints: DMatrix<f64>,
    /// Row lower bounds (m).
    pub constraint_lower: DVector<f64>,
    /// Row upper bounds (m).
    pub constraint_upper: DVector<f64>,
}

impl LpProblem {
    pub fn num_variables(&self) -> usize {
        self.cost.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.nrows()
    }

    /// Whether all vectors agree with the constraint matrix shape.
    pub fn is_consistent(&self) -> bool {
        let n = self.num_variables();
        let m = self.num_constraints();
        self.lower.len() == n
            && self.upper.len() == n
            && self.constraints.ncols() == n
            && self.constraint_lower.len() == m
            && self.constraint_upper.len() == m
    }

    /// Maximum violation of bounds and rows at `x` (0 when feasible).
    pub fn max_violation(&self, x: &DVector<f64>) -> f64 {
        let ax = &self.constraints * x;
        let var = x
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(&v, (&lo, &hi))| (lo - v).max(v - hi).max(0.0));
        let rows = ax
            .iter()
            .zip(self.constraint_lower.iter().zip(self.constraint_upper.iter()))
            .map(|(&v, (&lo, &hi))| (lo - v).max(v - hi).max(0.0));
        var.chain(rows).fold(0.0, f64::max)
    }
}

/// Result of an LP solve.
///
/// `objective` and `x` are meaningful only when `status` is optimal.
#[derive(Clone, Debug)]
pub struct LpSolution {
    pub status: LpStatus,
    pub objective: f64,
    pub x: DVector<f64>,
}

impl LpSolution {
    /// A non-optimal result with no usable primal point.
    pub fn without_solution(status: LpStatus, num_variables: usize) -> Self {
        Self {
            status,
            objective: f64::NAN,
            x: DVector::zeros(num_variables),
        }
    }
}

/// Trait that concrete LP backends must implement.
pub trait LpSolver: Send + Sync {
    /// Solve `problem`. Backend failures are reported as [`LpStatus::Error`],
    /// never as a panic.
    fn solve(&self, problem: &LpProblem) -> LpSolution;

    /// Human-readable backend name (e.g., "clarabel").
    fn name(&self) -> &str;

    /// Whether an unbounded problem is reported as [`LpStatus::Unbounded`].
    ///
    /// Backends that return `false` may instead report an "optimal" point with
    /// a huge objective; callers apply their own heuristic in that case.
    fn detects_unboundedness(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
