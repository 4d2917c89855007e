//! Polyhedral cone conversions for equilibrium checks.
//!
//! A contact set spans a cone of gravito-inertial wrenches given by its
//! generators (V-representation). Checking whether a wrench lies inside that
//! cone is a single matrix-vector product once the cone is rewritten as an
//! intersection of half-spaces (H-representation). This crate performs that
//! rewrite with the double-description method.
//!
//! - [`DoubleDescription`] converts cdd-style generator rows `[t | x]` into
//!   inequality/equality rows `[b | A]` meaning `b + A x >= 0` (or `= 0`).
//! - [`project_cone`] wraps it for a generator matrix and folds equalities
//!   into pairs of inequalities, returning `H x <= h`.

pub mod context;
pub mod dd;
pub mod error;
pub mod projection;

pub use context::{DdConstants, dd_context, initialize, is_initialized};
pub use dd::{DoubleDescription, HRepresentation};
pub use error::PolytopeError;
pub use projection::{HalfSpace, project_cone, project_cone_with};
