//! Mock implementations of the LP solver for testing.
//!
//! [`ScriptedSolver`] ignores the problem it is given and answers with a
//! preset status and objective, counting how often it was called. Clones
//! share the call counter, so a test can keep one copy while the engine owns
//! another.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use equilibrium_core::LpStatus;
use equilibrium_lp::{LpProblem, LpSolution, LpSolver};
use nalgebra::DVector;

// ---------------------------------------------------------------------------
// ScriptedSolver
// ---------------------------------------------------------------------------

/// An LP solver that always returns the same status and objective.
///
/// The primal point is `x_fill` repeated to the problem's variable count.
#[derive(Clone)]
pub struct ScriptedSolver {
    status: LpStatus,
    objective: f64,
    x_fill: f64,
    detects_unboundedness: bool,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSolver {
    /// Solver reporting `status` with objective `objective`.
    pub fn new(status: LpStatus, objective: f64) -> Self {
        Self {
            status,
            objective,
            x_fill: 0.0,
            detects_unboundedness: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Optimal solver with the given objective.
    pub fn optimal(objective: f64) -> Self {
        Self::new(LpStatus::Optimal, objective)
    }

    /// Fill every entry of the returned primal point with `value`.
    #[must_use]
    pub fn with_primal_fill(mut self, value: f64) -> Self {
        self.x_fill = value;
        self
    }

    /// Pretend the backend cannot report unboundedness.
    #[must_use]
    pub fn blind_to_unboundedness(mut self) -> Self {
        self.detects_unboundedness = false;
        self
    }

    /// Number of `solve` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LpSolver for ScriptedSolver {
    fn solve(&self, problem: &LpProblem) -> LpSolution {
        self.calls.fetch_add(1, Ordering::SeqCst);
        LpSolution {
            status: self.status,
            objective: self.objective,
            x: DVector::from_element(problem.num_variables(), self.x_fill),
        }
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "scripted"
    }

    fn detects_unboundedness(&self) -> bool {
        self.detects_unboundedness
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn problem(n: usize) -> LpProblem {
        LpProblem {
            cost: DVector::zeros(n),
            lower: DVector::zeros(n),
            upper: DVector::zeros(n),
            constraints: DMatrix::zeros(0, n),
            constraint_lower: DVector::zeros(0),
            constraint_upper: DVector::zeros(0),
        }
    }

    #[test]
    fn counts_calls() {
        let solver = ScriptedSolver::optimal(1.5);
        assert_eq!(solver.calls(), 0);
        let sol = solver.solve(&problem(3));
        assert_eq!(sol.status, LpStatus::Optimal);
        assert!((sol.objective - 1.5).abs() < f64::EPSILON);
        assert_eq!(sol.x.len(), 3);
        solver.solve(&problem(1));
        assert_eq!(solver.calls(), 2);
    }

    #[test]
    fn primal_fill_and_capabilities() {
        let solver = ScriptedSolver::new(LpStatus::Unbounded, 0.0)
            .with_primal_fill(2.0)
            .blind_to_unboundedness();
        let sol = solver.solve(&problem(2));
        assert_eq!(sol.status, LpStatus::Unbounded);
        assert!(sol.x.iter().all(|&v| (v - 2.0).abs() < f64::EPSILON));
        assert!(!solver.detects_unboundedness());
        assert_eq!(solver.name(), "scripted");
    }

    #[test]
    fn clones_share_the_counter() {
        let solver = ScriptedSolver::optimal(0.0);
        let boxed: Box<dyn LpSolver> = Box::new(solver.clone());
        boxed.solve(&problem(1));
        assert_eq!(solver.calls(), 1);
    }
}
