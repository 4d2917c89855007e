//! Robust static equilibrium of a rigid body on frictional point contacts.
//!
//! Given contact points, unit normals and a friction coefficient, the engine
//! builds the cone of gravito-inertial wrenches the contacts can produce and
//! answers, for a center-of-mass position `c`:
//!
//! 1. **Robustness**: the largest uniform disturbance force the contacts can
//!    absorb while balancing the body, from one of three equivalent LPs
//!    (`Lp`, `Lp2`, `Dlp`).
//! 2. **Equilibrium check**: a single matrix-vector product against a
//!    half-space description of the cone, precomputed once per contact set
//!    (`Pp`).
//! 3. **Line search**: the furthest point along a line that stays in
//!    equilibrium with a given margin.
//!
//! # Architecture
//!
//! [`StaticEquilibrium::set_new_contacts`] validates the contacts, stacks the
//! wrench generators and picks an [`EquilibriumStrategy`] for the requested
//! algorithm. The result is an immutable [`ContactSnapshot`] swapped in only
//! on success. Queries read the current snapshot and never mutate the engine.

pub mod engine;
pub mod formulation;
pub mod generators;
pub mod metric;
pub mod strategy;

pub use engine::{ContactSnapshot, StaticEquilibrium};
pub use equilibrium_core::{
    Algorithm, EquilibriumConfig, EquilibriumError, LpOutcome, LpStatus, SolverConfig,
    ValidationError, rectangle_contacts,
};
pub use generators::{GravityWrench, NORMAL_TOLERANCE, WrenchGenerators};
pub use metric::RobustnessMetric;
pub use strategy::{
    AlternatePrimalLp, DualLp, EquilibriumStrategy, HalfSpacePolytope, PrimalLp, QueryContext,
};
