use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

fn default_name() -> String {
    "static-equilibrium".into()
}
const fn default_mass() -> f64 {
    55.0
}
const fn default_generators_per_contact() -> usize {
    4
}
const fn default_gravity() -> [f64; 3] {
    [0.0, 0.0, -9.81]
}
const fn default_max_iter() -> u32 {
    200
}
const fn default_tolerance() -> f64 {
    1e-8
}
const fn default_infinite_bound() -> f64 {
    1e10
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Settings forwarded to the LP backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum interior-point iterations.
    #[serde(default = "default_max_iter")]
    pub max_iter: u32,

    #[serde(default = "default_tolerance")]
    pub tol_gap_abs: f64,

    #[serde(default = "default_tolerance")]
    pub tol_gap_rel: f64,

    #[serde(default = "default_tolerance")]
    pub tol_feas: f64,

    /// Bounds with magnitude at or above this value are treated as absent.
    #[serde(default = "default_infinite_bound")]
    pub infinite_bound: f64,

    /// Print the backend's iteration log.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iter: default_max_iter(),
            tol_gap_abs: default_tolerance(),
            tol_gap_rel: default_tolerance(),
            tol_feas: default_tolerance(),
            infinite_bound: default_infinite_bound(),
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iter == 0 {
            return Err(invalid("solver.max_iter", "must be > 0"));
        }
        for (field, value) in [
            ("solver.tol_gap_abs", self.tol_gap_abs),
            ("solver.tol_gap_rel", self.tol_gap_rel),
            ("solver.tol_feas", self.tol_feas),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be finite and > 0"));
            }
        }
        if self.infinite_bound.is_nan() || self.infinite_bound <= 0.0 {
            return Err(invalid("solver.infinite_bound", "must be > 0"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// EquilibriumConfig
// ---------------------------------------------------------------------------

/// Physical body and solver setup for one equilibrium engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumConfig {
    /// Label used in diagnostics.
    #[serde(default = "default_name")]
    pub name: String,

    /// Body mass in kg.
    #[serde(default = "default_mass")]
    pub mass: f64,

    /// Friction-cone generators per contact. Values below 3 are raised to 3
    /// when the engine is built.
    #[serde(default = "default_generators_per_contact")]
    pub generators_per_contact: usize,

    /// Gravity vector [x, y, z] in m/s^2.
    #[serde(default = "default_gravity")]
    pub gravity: [f64; 3],

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for EquilibriumConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            mass: default_mass(),
            generators_per_contact: default_generators_per_contact(),
            gravity: default_gravity(),
            solver: SolverConfig::default(),
        }
    }
}

impl EquilibriumConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(ConfigError::InvalidMass(self.mass));
        }
        if self.gravity.iter().any(|g| !g.is_finite()) {
            return Err(invalid("gravity", "components must be finite"));
        }
        self.solver.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
