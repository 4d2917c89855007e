use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest friction-cone discretization that still spans a cone.
pub const MIN_GENERATORS_PER_CONTACT: usize = 3;

// ---------------------------------------------------------------------------
// LpStatus
// ---------------------------------------------------------------------------

/// Outcome reported by a linear program solve.
///
/// Anything a backend cannot classify as one of the first three collapses
/// into [`LpStatus::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl LpStatus {
    pub const fn is_optimal(self) -> bool {
        matches!(self, Self::Optimal)
    }

    /// Reinterpret the status of a dual problem as the status of its primal.
    ///
    /// A primal program is infeasible exactly when its dual is unbounded and
    /// vice versa, so these two flags swap. Everything else passes through.
    #[must_use]
    pub const fn dual_to_primal(self) -> Self {
        match self {
            Self::Infeasible => Self::Unbounded,
            Self::Unbounded => Self::Infeasible,
            other => other,
        }
    }
}

impl fmt::Display for LpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Optimal => "optimal",
            Self::Infeasible => "infeasible",
            Self::Unbounded => "unbounded",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Algorithm
// ---------------------------------------------------------------------------

/// Equilibrium algorithm selected for a contact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Primal LP over generator coefficients and robustness slack.
    Lp,
    /// Primal LP with the slack folded into the force, fewer rows.
    Lp2,
    /// Dual of `Lp2`.
    Dlp,
    /// Half-space representation of the wrench cone, precomputed once.
    Pp,
    /// Incremental projection. Not implemented.
    Ip,
    /// Dual incremental projection. Not implemented.
    Dip,
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lp => "LP",
            Self::Lp2 => "LP2",
            Self::Dlp => "DLP",
            Self::Pp => "PP",
            Self::Ip => "IP",
            Self::Dip => "DIP",
        }
    }

    /// Whether the engine can prepare a contact set for this algorithm.
    pub const fn is_implemented(self) -> bool {
        !matches!(self, Self::Ip | Self::Dip)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// LpOutcome
// ---------------------------------------------------------------------------

/// Result of an LP-backed query.
///
/// `value` is present when `status` is optimal. Queries with a natural
/// fallback (the line search returns its origin) fill it in on failure too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpOutcome<T> {
    pub status: LpStatus,
    pub value: Option<T>,
}

impl<T> LpOutcome<T> {
    pub const fn optimal(value: T) -> Self {
        Self {
            status: LpStatus::Optimal,
            value: Some(value),
        }
    }

    pub const fn failed(status: LpStatus) -> Self {
        Self {
            status,
            value: None,
        }
    }

    pub const fn with_fallback(status: LpStatus, value: T) -> Self {
        Self {
            status,
            value: Some(value),
        }
    }

    pub const fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
