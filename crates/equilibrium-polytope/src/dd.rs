//! Double-description conversion from generators to half-spaces.
//!
//! Input rows follow the cdd generator convention `[t | x]`: `t = 0` for a
//! ray, `t = 1` for a point. The set they span is
//!
//! ```text
//! P = conv(points) + cone(rays)
//! ```
//!
//! with the origin taken as the only point when none is given. Enumeration
//! is delegated to `howzat`; its inequality output uses the same `[b | A]`
//! layout read as `b + A x >= 0`, with linearity rows holding as `= 0`.

use howzat::num::DynamicEpsilon;
use howzat::prelude::{
    ComputationStatus, ConeOptions, Generator, LpMatrixBuilder, PolyhedronOutput,
};
use nalgebra::{DMatrix, DVector};

use crate::context::{DdConstants, dd_context};
use crate::error::PolytopeError;

// ---------------------------------------------------------------------------
// HRepresentation
// ---------------------------------------------------------------------------

/// Half-space description `b + A x >= 0`, with some rows flagged `= 0`.
#[derive(Clone, Debug)]
pub struct HRepresentation {
    /// Rows `[b | A]`, one per constraint.
    pub rows: DMatrix<f64>,
    /// `true` where the row holds with equality.
    pub equality: Vec<bool>,
}

impl HRepresentation {
    pub fn num_rows(&self) -> usize {
        self.rows.nrows()
    }

    pub fn num_equalities(&self) -> usize {
        self.equality.iter().filter(|&&eq| eq).count()
    }

    /// Dimension of the space the rows act on (columns minus the offset).
    pub fn dim(&self) -> usize {
        self.rows.ncols().saturating_sub(1)
    }

    /// Whether `x` satisfies every row up to `tol`.
    pub fn contains(&self, x: &DVector<f64>, tol: f64) -> bool {
        self.rows.row_iter().zip(&self.equality).all(|(row, &eq)| {
            let slack = row[0] + row.columns(1, x.len()).dot(&x.transpose());
            if eq { slack.abs() <= tol } else { slack >= -tol }
        })
    }
}

// ---------------------------------------------------------------------------
// DoubleDescription
// ---------------------------------------------------------------------------

/// Generator-to-half-space converter.
#[derive(Clone, Debug)]
pub struct DoubleDescription {
    constants: DdConstants,
}

impl Default for DoubleDescription {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleDescription {
    /// Converter using the process-wide constants.
    pub fn new() -> Self {
        Self {
            constants: *dd_context(),
        }
    }

    pub const fn with_constants(constants: DdConstants) -> Self {
        Self { constants }
    }

    pub const fn constants(&self) -> &DdConstants {
        &self.constants
    }

    /// Convert generator rows `[t | x]` into rows `[b | A]`.
    ///
    /// Trivial rows (zero `A`, `b >= 0`) are not reported.
    pub fn cone_to_half_space(
        &self,
        generators: &DMatrix<f64>,
    ) -> Result<HRepresentation, PolytopeError> {
        let cols = generators.ncols();
        if cols < 2 {
            return Err(PolytopeError::DimensionMismatch(cols));
        }
        if generators.iter().any(|v| !v.is_finite()) {
            return Err(PolytopeError::NumericalInstability(
                "non-finite generator entry".into(),
            ));
        }

        let tol = self.constants.zero_tolerance;
        let mut rows: Vec<Vec<f64>> = generators
            .row_iter()
            .filter_map(|r| {
                let n = r.norm();
                (n > tol).then(|| r.iter().map(|v| v / n).collect())
            })
            .collect();
        if !rows.iter().any(|r| r[0].abs() > tol) {
            // Rays only: the origin is the implicit point.
            let mut origin = vec![0.0; cols];
            origin[0] = 1.0;
            rows.push(origin);
        }

        let input = LpMatrixBuilder::<f64, Generator>::from_rows(rows.clone()).build();
        let poly = PolyhedronOutput::<f64, Generator>::builder(input)
            .cone_options(ConeOptions::default())
            .run_dd_with_eps(DynamicEpsilon::new(tol))
            .map_err(|e| PolytopeError::NumericalInstability(e.to_string()))?;
        if poly.status() != ComputationStatus::AllFound {
            return Err(PolytopeError::NumericalInstability(format!(
                "enumeration ended with status {:?}",
                poly.status()
            )));
        }

        let output = poly.output();
        let linearity = output.linearity();
        let keep = |v: &[f64], eq: bool| {
            let coeff_norm = v[1..].iter().fold(0.0_f64, |m, x| m.max(x.abs()));
            coeff_norm > tol || (eq && v[0].abs() > tol) || (!eq && v[0] < -tol)
        };
        let mut out: Vec<(&[f64], bool)> = Vec::with_capacity(output.row_count());
        for r in 0..output.row_count() {
            let Some(v) = output.row(r) else { continue };
            if v.len() != cols || v.iter().any(|x| !x.is_finite()) {
                return Err(PolytopeError::NumericalInstability(format!(
                    "malformed output row {r}"
                )));
            }
            let eq = linearity.contains(r);
            if keep(v, eq) {
                out.push((v, eq));
            }
        }
        self.verify(&rows, &out)?;

        let mut result = DMatrix::zeros(out.len(), cols);
        let mut equality = Vec::with_capacity(out.len());
        for (i, (v, eq)) in out.into_iter().enumerate() {
            result.row_mut(i).copy_from_slice(v);
            equality.push(eq);
        }
        tracing::trace!(
            generators = generators.nrows(),
            rows = result.nrows(),
            "double description done"
        );

        Ok(HRepresentation {
            rows: result,
            equality,
        })
    }

    /// Every inequality must hold on every generator; every equality must be
    /// tight on every generator.
    fn verify(
        &self,
        generators: &[Vec<f64>],
        out: &[(&[f64], bool)],
    ) -> Result<(), PolytopeError> {
        let tol = self.constants.verify_tolerance;
        for m in generators {
            for &(v, eq) in out {
                let s = v.iter().zip(m).map(|(a, b)| a * b).sum::<f64>() / max_abs(v);
                if s < -tol || (eq && s > tol) {
                    return Err(PolytopeError::NumericalInstability(format!(
                        "output row off a generator by {s:e}"
                    )));
                }
            }
        }
        Ok(())
    }
}

fn max_abs(v: &[f64]) -> f64 {
    v.iter().fold(f64::MIN_POSITIVE, |m, x| m.max(x.abs()))
}
