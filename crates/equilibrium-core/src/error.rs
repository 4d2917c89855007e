use thiserror::Error;

use crate::types::Algorithm;

/// Top-level error type for the equilibrium crates.
#[derive(Debug, Error)]
pub enum EquilibriumError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("{operation} is not supported by algorithm {algorithm}")]
    UnsupportedAlgorithm {
        algorithm: Algorithm,
        operation: &'static str,
    },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Ill-formed polytope: {0}")]
    Polytope(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid mass: {0} (must be finite and > 0)")]
    InvalidMass(f64),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Contact-set validation errors.
///
/// Copy + static messages for cheap propagation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("Contact count mismatch: {points} points, {normals} normals")]
    CountMismatch { points: usize, normals: usize },

    #[error("Contact normal {index} has norm {norm}, expected 1")]
    NonUnitNormal { index: usize, norm: f64 },

    #[error("Contact {index} has a non-finite point or normal")]
    NonFiniteContact { index: usize },

    #[error("Invalid friction coefficient: {0} (must be finite and > 0)")]
    InvalidFriction(f64),
}
