//! Shared test fixtures and utilities for the equilibrium crates.
//!
//! Provides deterministic RNG setup, standard contact sets and a scripted LP
//! solver for exercising status handling without a real backend.

pub mod mocks;
pub mod rng;
pub mod scenes;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use mocks::ScriptedSolver;
pub use rng::{sample_box, seeded_rng};
pub use scenes::{ContactSet, flat_square, single_contact, tilted_square};
