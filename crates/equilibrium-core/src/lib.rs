// equilibrium-core: Types, errors, configuration and contact geometry shared by the
// static equilibrium crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::{EquilibriumConfig, SolverConfig};
pub use error::{ConfigError, EquilibriumError, ValidationError};
pub use geometry::{rectangle_contacts, skew_symmetric};
pub use types::{Algorithm, LpOutcome, LpStatus, MIN_GENERATORS_PER_CONTACT};
