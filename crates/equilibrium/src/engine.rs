//! The static equilibrium engine.

use std::sync::Arc;

use equilibrium_core::{
    Algorithm, EquilibriumConfig, EquilibriumError, LpOutcome, LpStatus,
    MIN_GENERATORS_PER_CONTACT,
};
use equilibrium_lp::{ClarabelLp, LpSolver};
use equilibrium_polytope::project_cone;
use nalgebra::{DMatrix, DVector, Vector3};

use crate::generators::{GravityWrench, WrenchGenerators};
use crate::metric::RobustnessMetric;
use crate::strategy::{EquilibriumStrategy, HalfSpacePolytope, QueryContext, lp_strategy};

// ---------------------------------------------------------------------------
// ContactSnapshot
// ---------------------------------------------------------------------------

/// Everything derived from one accepted contact set.
///
/// Built wholesale by [`StaticEquilibrium::set_new_contacts`] and never
/// mutated afterwards.
pub struct ContactSnapshot {
    generators: WrenchGenerators,
    metric: RobustnessMetric,
    friction: f64,
    strategy: Box<dyn EquilibriumStrategy>,
}

impl ContactSnapshot {
    /// Stacked `6 x m` wrench generator matrix.
    pub const fn generators(&self) -> &DMatrix<f64> {
        &self.generators.matrix
    }

    pub fn num_contacts(&self) -> usize {
        self.generators.num_contacts()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub const fn metric(&self) -> RobustnessMetric {
        self.metric
    }

    pub const fn friction(&self) -> f64 {
        self.friction
    }

    pub fn algorithm(&self) -> Algorithm {
        self.strategy.algorithm()
    }
}

impl std::fmt::Debug for ContactSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactSnapshot")
            .field("contacts", &self.num_contacts())
            .field("generators", &self.generators.num_generators())
            .field("friction", &self.friction)
            .field("algorithm", &self.algorithm())
            .field("metric", &self.metric)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StaticEquilibrium
// ---------------------------------------------------------------------------

/// Robust static equilibrium of one rigid body on frictional point contacts.
///
/// Call [`set_new_contacts`](Self::set_new_contacts) to prepare a contact
/// set, then query CoM positions. Until a contact set is accepted every query
/// behaves as for an empty contact set.
pub struct StaticEquilibrium {
    name: String,
    mass: f64,
    generators_per_contact: usize,
    gravity: GravityWrench,
    solver: Box<dyn LpSolver>,
    snapshot: Option<Arc<ContactSnapshot>>,
}

impl StaticEquilibrium {
    /// Engine backed by the Clarabel LP solver.
    pub fn new(config: &EquilibriumConfig) -> Result<Self, EquilibriumError> {
        Self::with_solver(config, Box::new(ClarabelLp::new(config.solver.clone())))
    }

    /// Engine backed by a caller-provided LP solver.
    pub fn with_solver(
        config: &EquilibriumConfig,
        solver: Box<dyn LpSolver>,
    ) -> Result<Self, EquilibriumError> {
        config.validate()?;

        let mut generators_per_contact = config.generators_per_contact;
        if generators_per_contact < MIN_GENERATORS_PER_CONTACT {
            tracing::warn!(
                requested = generators_per_contact,
                used = MIN_GENERATORS_PER_CONTACT,
                "generators per contact raised to minimum"
            );
            generators_per_contact = MIN_GENERATORS_PER_CONTACT;
        }

        let gravity = Vector3::from(config.gravity);
        Ok(Self {
            name: config.name.clone(),
            mass: config.mass,
            generators_per_contact,
            gravity: GravityWrench::new(config.mass, &gravity),
            solver,
            snapshot: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn mass(&self) -> f64 {
        self.mass
    }

    pub const fn generators_per_contact(&self) -> usize {
        self.generators_per_contact
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    pub const fn gravity_wrench(&self) -> &GravityWrench {
        &self.gravity
    }

    /// Algorithm of the current contact set.
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.snapshot.as_ref().map(|s| s.algorithm())
    }

    /// Robustness scale of the current contact set.
    pub fn robustness_metric(&self) -> Option<RobustnessMetric> {
        self.snapshot.as_ref().map(|s| s.metric())
    }

    /// Shared handle to the current contact set.
    pub fn snapshot(&self) -> Option<Arc<ContactSnapshot>> {
        self.snapshot.clone()
    }

    /// Replace the contact set.
    ///
    /// On error the previous contact set stays active.
    pub fn set_new_contacts(
        &mut self,
        points: &[Vector3<f64>],
        normals: &[Vector3<f64>],
        friction: f64,
        algorithm: Algorithm,
    ) -> Result<(), EquilibriumError> {
        let snapshot = self.prepare(points, normals, friction, algorithm).inspect_err(|e| {
            tracing::error!(
                engine = %self.name,
                %algorithm,
                contacts = points.len(),
                error = %e,
                "contact set rejected"
            );
        })?;
        self.snapshot = Some(Arc::new(snapshot));
        Ok(())
    }

    fn prepare(
        &self,
        points: &[Vector3<f64>],
        normals: &[Vector3<f64>],
        friction: f64,
        algorithm: Algorithm,
    ) -> Result<ContactSnapshot, EquilibriumError> {
        if !algorithm.is_implemented() {
            return Err(EquilibriumError::UnsupportedAlgorithm {
                algorithm,
                operation: "set_new_contacts",
            });
        }

        let generators =
            WrenchGenerators::build(points, normals, friction, self.generators_per_contact)?;
        let metric = generators.last_cone.as_ref().map_or_else(
            || RobustnessMetric::canonical(friction, self.generators_per_contact),
            RobustnessMetric::from_cone,
        );

        let strategy: Box<dyn EquilibriumStrategy> = match lp_strategy(algorithm) {
            Some(strategy) => strategy,
            None => Box::new(self.project(&generators.matrix)?),
        };

        Ok(ContactSnapshot {
            generators,
            metric,
            friction,
            strategy,
        })
    }

    /// Half-space form of the wrench cone, folded with the gravity terms.
    fn project(&self, generators: &DMatrix<f64>) -> Result<HalfSpacePolytope, EquilibriumError> {
        if generators.ncols() == 0 {
            return Ok(HalfSpacePolytope::new(
                &DMatrix::zeros(0, 6),
                &DVector::zeros(0),
                &self.gravity,
            ));
        }
        let half_space =
            project_cone(generators).map_err(|e| EquilibriumError::Polytope(e.to_string()))?;
        Ok(HalfSpacePolytope::new(
            &half_space.h_matrix,
            &half_space.h_vector,
            &self.gravity,
        ))
    }

    fn active(&self) -> Option<&ContactSnapshot> {
        self.snapshot.as_deref().filter(|s| !s.is_empty())
    }

    fn context<'a>(&'a self, snapshot: &'a ContactSnapshot) -> QueryContext<'a> {
        QueryContext {
            generators: snapshot.generators(),
            gravity: &self.gravity,
            metric: snapshot.metric,
            solver: self.solver.as_ref(),
        }
    }

    /// Largest uniform disturbance force `com` can absorb.
    ///
    /// Negative values mean `com` is not in equilibrium. Solver failures are
    /// returned as a non-optimal status. Empty contact sets are infeasible.
    pub fn compute_equilibrium_robustness(
        &self,
        com: &Vector3<f64>,
    ) -> Result<LpOutcome<f64>, EquilibriumError> {
        let Some(snapshot) = self.active() else {
            return Ok(LpOutcome::failed(LpStatus::Infeasible));
        };
        snapshot
            .strategy
            .compute_robustness(&self.context(snapshot), com)
    }

    /// Whether `com` is in equilibrium with margin `e_max`.
    ///
    /// Only the half-space algorithm answers this, and only for `e_max == 0`.
    pub fn check_robust_equilibrium(
        &self,
        com: &Vector3<f64>,
        e_max: f64,
    ) -> Result<bool, EquilibriumError> {
        let Some(snapshot) = self.active() else {
            return Ok(false);
        };
        if e_max != 0.0 {
            return Err(EquilibriumError::NotImplemented(
                "check_robust_equilibrium with a nonzero margin",
            ));
        }
        snapshot
            .strategy
            .check_equilibrium(&self.context(snapshot), com)
    }

    /// Furthest point `a0 + p a` (largest `p`) in equilibrium with margin
    /// `e_max`.
    ///
    /// On a non-optimal status the value is `a0`.
    pub fn find_extremum_over_line(
        &self,
        direction: &Vector3<f64>,
        origin: &Vector3<f64>,
        e_max: f64,
    ) -> Result<LpOutcome<Vector3<f64>>, EquilibriumError> {
        let Some(snapshot) = self.active() else {
            return Ok(LpOutcome::with_fallback(LpStatus::Infeasible, *origin));
        };
        snapshot
            .strategy
            .find_extremum_over_line(&self.context(snapshot), direction, origin, e_max)
    }

    /// Extremum of the feasible CoM region along a direction.
    pub fn find_extremum_in_direction(
        &self,
        _direction: &Vector3<f64>,
        _e_max: f64,
    ) -> Result<LpOutcome<Vector3<f64>>, EquilibriumError> {
        if self.active().is_none() {
            return Ok(LpOutcome::failed(LpStatus::Infeasible));
        }
        Err(EquilibriumError::NotImplemented("find_extremum_in_direction"))
    }
}

impl std::fmt::Debug for StaticEquilibrium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticEquilibrium")
            .field("name", &self.name)
            .field("mass", &self.mass)
            .field("generators_per_contact", &self.generators_per_contact)
            .field("solver", &self.solver.name())
            .field("snapshot", &self.snapshot)
            .finish_non_exhaustive()
    }
}
