//! Per-algorithm query implementations.
//!
//! An [`EquilibriumStrategy`] is chosen once per contact set. Operations an
//! algorithm does not support keep the default body and report
//! [`EquilibriumError::UnsupportedAlgorithm`].

use equilibrium_core::{Algorithm, EquilibriumError, LpOutcome, LpStatus};
use equilibrium_lp::{LpProblem, LpSolution, LpSolver};
use nalgebra::{DMatrix, DVector, Vector3};

use crate::formulation;
use crate::generators::{GravityWrench, to_dvector};
use crate::metric::RobustnessMetric;

/// Dual line objectives below this are read as unbounded when the backend
/// cannot say so itself.
pub const UNBOUNDED_OBJECTIVE: f64 = -1e7;

/// Read-only inputs shared by every query on one contact set.
pub struct QueryContext<'a> {
    pub generators: &'a DMatrix<f64>,
    pub gravity: &'a GravityWrench,
    pub metric: RobustnessMetric,
    pub solver: &'a dyn LpSolver,
}

impl QueryContext<'_> {
    fn solve(&self, problem: &LpProblem) -> LpSolution {
        self.solver.solve(problem)
    }

    /// `D a0 + d - G 1 b0`.
    fn line_rhs(&self, origin: &Vector3<f64>, e_max: f64) -> DVector<f64> {
        let b0 = self.metric.emax_to_b0(e_max);
        self.gravity.wrench(origin) - self.generators.column_sum() * b0
    }
}

/// Capability set of one equilibrium algorithm.
pub trait EquilibriumStrategy: Send + Sync {
    fn algorithm(&self) -> Algorithm;

    /// Robustness margin `e_max` of `com`.
    fn compute_robustness(
        &self,
        _ctx: &QueryContext<'_>,
        _com: &Vector3<f64>,
    ) -> Result<LpOutcome<f64>, EquilibriumError> {
        Err(self.unsupported("compute_equilibrium_robustness"))
    }

    /// Whether `com` is in (zero-margin) equilibrium.
    fn check_equilibrium(
        &self,
        _ctx: &QueryContext<'_>,
        _com: &Vector3<f64>,
    ) -> Result<bool, EquilibriumError> {
        Err(self.unsupported("check_robust_equilibrium"))
    }

    /// Furthest `a0 + p a` with margin `e_max`.
    fn find_extremum_over_line(
        &self,
        _ctx: &QueryContext<'_>,
        _direction: &Vector3<f64>,
        _origin: &Vector3<f64>,
        _e_max: f64,
    ) -> Result<LpOutcome<Vector3<f64>>, EquilibriumError> {
        Err(self.unsupported("find_extremum_over_line"))
    }

    fn unsupported(&self, operation: &'static str) -> EquilibriumError {
        EquilibriumError::UnsupportedAlgorithm {
            algorithm: self.algorithm(),
            operation,
        }
    }
}

/// Build the strategy for an LP-backed algorithm. `Pp` needs a projection
/// and goes through [`HalfSpacePolytope::new`] instead.
pub fn lp_strategy(algorithm: Algorithm) -> Option<Box<dyn EquilibriumStrategy>> {
    match algorithm {
        Algorithm::Lp => Some(Box::new(PrimalLp)),
        Algorithm::Lp2 => Some(Box::new(AlternatePrimalLp)),
        Algorithm::Dlp => Some(Box::new(DualLp)),
        Algorithm::Pp | Algorithm::Ip | Algorithm::Dip => None,
    }
}

fn log_failure(kind: &str, com: &Vector3<f64>, status: LpStatus) {
    tracing::debug!(
        com = ?[com.x, com.y, com.z],
        %status,
        "{kind} robustness LP not solved"
    );
}

fn log_line_failure(
    kind: &str,
    direction: &Vector3<f64>,
    origin: &Vector3<f64>,
    e_max: f64,
    status: LpStatus,
) {
    tracing::debug!(
        direction = ?[direction.x, direction.y, direction.z],
        origin = ?[origin.x, origin.y, origin.z],
        e_max,
        %status,
        "{kind} line LP not solved, no point with this margin on the line"
    );
}

// ---------------------------------------------------------------------------
// PrimalLp
// ---------------------------------------------------------------------------

/// Primal LP over `[b; b0]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimalLp;

impl EquilibriumStrategy for PrimalLp {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lp
    }

    fn compute_robustness(
        &self,
        ctx: &QueryContext<'_>,
        com: &Vector3<f64>,
    ) -> Result<LpOutcome<f64>, EquilibriumError> {
        let problem = formulation::robustness_primal(ctx.generators, &ctx.gravity.wrench(com));
        let solution = ctx.solve(&problem);
        if solution.status.is_optimal() {
            return Ok(LpOutcome::optimal(ctx.metric.b0_to_emax(-solution.objective)));
        }
        log_failure("primal", com, solution.status);
        Ok(LpOutcome::failed(solution.status))
    }

    fn find_extremum_over_line(
        &self,
        ctx: &QueryContext<'_>,
        direction: &Vector3<f64>,
        origin: &Vector3<f64>,
        e_max: f64,
    ) -> Result<LpOutcome<Vector3<f64>>, EquilibriumError> {
        let m = ctx.generators.ncols();
        let problem = formulation::line_primal(
            ctx.generators,
            &ctx.gravity.linear(direction),
            &ctx.line_rhs(origin, e_max),
        );
        let solution = ctx.solve(&problem);
        if solution.status.is_optimal() {
            return Ok(LpOutcome::optimal(origin + direction * solution.x[m]));
        }
        log_line_failure("primal", direction, origin, e_max, solution.status);
        Ok(LpOutcome::with_fallback(solution.status, *origin))
    }
}

// ---------------------------------------------------------------------------
// AlternatePrimalLp
// ---------------------------------------------------------------------------

/// Primal LP with the slack folded into the force; six rows only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternatePrimalLp;

impl EquilibriumStrategy for AlternatePrimalLp {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Lp2
    }

    fn compute_robustness(
        &self,
        ctx: &QueryContext<'_>,
        com: &Vector3<f64>,
    ) -> Result<LpOutcome<f64>, EquilibriumError> {
        let problem = formulation::robustness_alternate(ctx.generators, &ctx.gravity.wrench(com));
        let solution = ctx.solve(&problem);
        if solution.status.is_optimal() {
            return Ok(LpOutcome::optimal(ctx.metric.b0_to_emax(-solution.objective)));
        }
        log_failure("alternate primal", com, solution.status);
        Ok(LpOutcome::failed(solution.status))
    }
}

// ---------------------------------------------------------------------------
// DualLp
// ---------------------------------------------------------------------------

/// Dual LP over `v` in R^6. Non-optimal statuses are reported in primal
/// terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualLp;

impl EquilibriumStrategy for DualLp {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Dlp
    }

    fn compute_robustness(
        &self,
        ctx: &QueryContext<'_>,
        com: &Vector3<f64>,
    ) -> Result<LpOutcome<f64>, EquilibriumError> {
        let problem = formulation::robustness_dual(ctx.generators, &ctx.gravity.wrench(com));
        let solution = ctx.solve(&problem);
        if solution.status.is_optimal() {
            return Ok(LpOutcome::optimal(ctx.metric.b0_to_emax(solution.objective)));
        }
        log_failure("dual", com, solution.status);
        Ok(LpOutcome::failed(solution.status.dual_to_primal()))
    }

    fn find_extremum_over_line(
        &self,
        ctx: &QueryContext<'_>,
        direction: &Vector3<f64>,
        origin: &Vector3<f64>,
        e_max: f64,
    ) -> Result<LpOutcome<Vector3<f64>>, EquilibriumError> {
        let problem = formulation::line_dual(
            ctx.generators,
            &ctx.gravity.linear(direction),
            &ctx.line_rhs(origin, e_max),
        );
        let solution = ctx.solve(&problem);
        if solution.status.is_optimal() {
            let p = solution.objective;
            let com = origin + direction * p;
            if !ctx.solver.detects_unboundedness() && p < UNBOUNDED_OBJECTIVE {
                tracing::debug!(
                    solver = ctx.solver.name(),
                    objective = p,
                    e_max,
                    "dual line LP objective is hugely negative, treating it as unbounded"
                );
                return Ok(LpOutcome::with_fallback(LpStatus::Unbounded, com));
            }
            return Ok(LpOutcome::optimal(com));
        }
        log_line_failure("dual", direction, origin, e_max, solution.status);
        Ok(LpOutcome::with_fallback(
            solution.status.dual_to_primal(),
            *origin,
        ))
    }
}

// ---------------------------------------------------------------------------
// HalfSpacePolytope
// ---------------------------------------------------------------------------

/// Precomputed `HD c + Hd <= 0` test for CoM feasibility.
#[derive(Debug, Clone)]
pub struct HalfSpacePolytope {
    hd_matrix: DMatrix<f64>,
    hd_vector: DVector<f64>,
}

impl HalfSpacePolytope {
    /// Fold the wrench-space half-spaces `H w <= h` with `w = D c + d`.
    pub fn new(h_matrix: &DMatrix<f64>, h_vector: &DVector<f64>, gravity: &GravityWrench) -> Self {
        Self {
            hd_matrix: h_matrix * &gravity.d_matrix,
            hd_vector: h_matrix * &gravity.d_vector - h_vector,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.hd_matrix.nrows()
    }

    pub const fn hd_matrix(&self) -> &DMatrix<f64> {
        &self.hd_matrix
    }

    pub const fn hd_vector(&self) -> &DVector<f64> {
        &self.hd_vector
    }
}

impl EquilibriumStrategy for HalfSpacePolytope {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Pp
    }

    fn check_equilibrium(
        &self,
        _ctx: &QueryContext<'_>,
        com: &Vector3<f64>,
    ) -> Result<bool, EquilibriumError> {
        let residual = &self.hd_matrix * to_dvector(com) + &self.hd_vector;
        Ok(residual.iter().all(|&r| r <= 0.0))
    }
}
