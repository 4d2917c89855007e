//! Integration test: status handling with a scripted LP solver.
//!
//! The scripted solver answers every problem with a fixed status and
//! objective, which isolates the engine's interpretation of solver results
//! (sign conventions, dual status swap, unboundedness heuristic) from the
//! numerics of a real backend.

use approx::assert_relative_eq;
use equilibrium::{Algorithm, EquilibriumConfig, LpOutcome, LpStatus, StaticEquilibrium};
use equilibrium_test_utils::{ScriptedSolver, flat_square};
use nalgebra::Vector3;

fn engine_with(solver: &ScriptedSolver, algorithm: Algorithm) -> StaticEquilibrium {
    let mut eq =
        StaticEquilibrium::with_solver(&EquilibriumConfig::default(), Box::new(solver.clone()))
            .unwrap();
    let set = flat_square(0.5, 0.5);
    eq.set_new_contacts(&set.points, &set.normals, 0.5, algorithm)
        .unwrap();
    eq
}

#[test]
fn empty_contacts_never_reach_the_solver() {
    let solver = ScriptedSolver::optimal(1.0);
    let mut eq =
        StaticEquilibrium::with_solver(&EquilibriumConfig::default(), Box::new(solver.clone()))
            .unwrap();
    let com = Vector3::new(0.0, 0.0, 1.0);

    // Before any contact set and after an empty one.
    for round in 0..2 {
        assert_eq!(
            eq.compute_equilibrium_robustness(&com).unwrap(),
            LpOutcome::failed(LpStatus::Infeasible)
        );
        assert!(!eq.check_robust_equilibrium(&com, 0.0).unwrap());
        let line = eq
            .find_extremum_over_line(&Vector3::x(), &com, 0.0)
            .unwrap();
        assert_eq!(line.status, LpStatus::Infeasible);
        assert_eq!(line.value, Some(com));
        assert_eq!(
            eq.find_extremum_in_direction(&Vector3::x(), 0.0).unwrap(),
            LpOutcome::failed(LpStatus::Infeasible)
        );
        if round == 0 {
            eq.set_new_contacts(&[], &[], 0.5, Algorithm::Dlp).unwrap();
        }
    }
    assert_eq!(solver.calls(), 0);
}

#[test]
fn objective_sign_and_scale_per_formulation() {
    // Scale for friction 0.5 and 4 generators is 1.6.
    for (algorithm, expected) in [
        (Algorithm::Lp, 3.2),
        (Algorithm::Lp2, 3.2),
        (Algorithm::Dlp, -3.2),
    ] {
        let solver = ScriptedSolver::optimal(-2.0);
        let eq = engine_with(&solver, algorithm);
        let out = eq
            .compute_equilibrium_robustness(&Vector3::new(0.0, 0.0, 1.0))
            .unwrap();
        assert!(out.is_optimal());
        assert_relative_eq!(out.value.unwrap(), expected, epsilon = 1e-12);
        assert_eq!(solver.calls(), 1);
    }
}

#[test]
fn dual_failures_are_reported_in_primal_terms() {
    let com = Vector3::new(0.0, 0.0, 1.0);
    for (raw, primal) in [
        (LpStatus::Infeasible, LpStatus::Unbounded),
        (LpStatus::Unbounded, LpStatus::Infeasible),
        (LpStatus::Error, LpStatus::Error),
    ] {
        let solver = ScriptedSolver::new(raw, f64::NAN);
        let dlp = engine_with(&solver, Algorithm::Dlp);
        assert_eq!(
            dlp.compute_equilibrium_robustness(&com).unwrap(),
            LpOutcome::failed(primal)
        );

        let lp = engine_with(&solver, Algorithm::Lp);
        assert_eq!(
            lp.compute_equilibrium_robustness(&com).unwrap(),
            LpOutcome::failed(raw)
        );
    }
}

#[test]
fn failed_line_search_falls_back_to_origin() {
    let origin = Vector3::new(0.1, -0.2, 0.9);
    let solver = ScriptedSolver::new(LpStatus::Error, f64::NAN);
    for algorithm in [Algorithm::Lp, Algorithm::Dlp] {
        let out = engine_with(&solver, algorithm)
            .find_extremum_over_line(&Vector3::x(), &origin, 0.0)
            .unwrap();
        assert_eq!(out, LpOutcome::with_fallback(LpStatus::Error, origin));
    }
}

#[test]
fn primal_line_search_reads_line_parameter() {
    let solver = ScriptedSolver::optimal(-0.3).with_primal_fill(0.3);
    let out = engine_with(&solver, Algorithm::Lp)
        .find_extremum_over_line(&Vector3::y(), &Vector3::new(0.0, 0.0, 1.0), 0.0)
        .unwrap();
    assert_eq!(out.status, LpStatus::Optimal);
    assert_relative_eq!(out.value.unwrap(), Vector3::new(0.0, 0.3, 1.0), epsilon = 1e-12);
}

#[test]
fn huge_negative_dual_objective_means_unbounded_for_blind_backends() {
    let origin = Vector3::new(0.0, 0.0, 1.0);

    let blind = ScriptedSolver::optimal(-5e7).blind_to_unboundedness();
    let out = engine_with(&blind, Algorithm::Dlp)
        .find_extremum_over_line(&Vector3::x(), &origin, 0.0)
        .unwrap();
    assert_eq!(out.status, LpStatus::Unbounded);
    assert_relative_eq!(out.value.unwrap().x, -5e7);

    let moderate = ScriptedSolver::optimal(-5e6).blind_to_unboundedness();
    let out = engine_with(&moderate, Algorithm::Dlp)
        .find_extremum_over_line(&Vector3::x(), &origin, 0.0)
        .unwrap();
    assert_eq!(out.status, LpStatus::Optimal);

    let aware = ScriptedSolver::optimal(-5e7);
    let out = engine_with(&aware, Algorithm::Dlp)
        .find_extremum_over_line(&Vector3::x(), &origin, 0.0)
        .unwrap();
    assert_eq!(out.status, LpStatus::Optimal);
}

#[test]
fn polytope_check_does_not_solve() {
    let solver = ScriptedSolver::optimal(0.0);
    let pp = engine_with(&solver, Algorithm::Pp);
    assert!(
        pp.check_robust_equilibrium(&Vector3::new(0.0, 0.0, 1.0), 0.0)
            .unwrap()
    );
    assert!(
        !pp.check_robust_equilibrium(&Vector3::new(2.0, 0.0, 1.0), 0.0)
            .unwrap()
    );
    assert_eq!(solver.calls(), 0);
    assert_eq!(pp.solver_name(), "scripted");
}
