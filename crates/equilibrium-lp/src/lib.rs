//! Bounded linear programs for the equilibrium engine.
//!
//! Every formulation is expressed in one shape:
//!
//! ```text
//! minimize      c' x
//! subject to    lb  <= x   <= ub
//!               Alb <= A x <= Aub
//! ```
//!
//! Rows with `Alb == Aub` are equalities. Backends implement [`LpSolver`];
//! [`ClarabelLp`] is the default, built on the Clarabel interior-point solver.

pub mod backend;
pub mod problem;

pub use backend::{ClarabelLp, ConicForm};
pub use problem::{LpProblem, LpSolution, LpSolver};
