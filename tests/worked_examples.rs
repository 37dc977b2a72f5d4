//! End-to-end runs of the worked reactor problems, exercising the models
//! together with the numerical primitives the way a user would.

use approx::assert_relative_eq;
use molbal::models::{Batch, Cstr, InverseStrategy, Pfr};
use molbal::solvers::integration::{IntegrationMethod, OdeIntegrator};
use molbal::solvers::RootFinder;
use molbal::Uncertain;

fn init_logging() {
    let _ = simplelog::SimpleLogger::init(log::LevelFilter::Debug, simplelog::Config::default());
}

#[test]
fn cstr_worked_example() {
    init_logging();

    // k = 0.23 /hr, Fa0 = 1.0 mol/hr, v0 = 2.5 L/hr, V = 10 L
    let cstr = Cstr::new(0.23, 1.0, 2.5, 10.0);
    let finder = RootFinder::default();

    let closed_form = cstr.exit_concentration();
    assert_relative_eq!(closed_form, 0.2083, max_relative = 1e-3);

    let solved = cstr.solve_exit_concentration(&finder, 1.0).unwrap();
    assert_relative_eq!(solved, closed_form, max_relative = 1e-10);
}

#[test]
fn batch_worked_example() {
    init_logging();

    // k = 0.23 /hr, Ca0 = 2.0 mol/L; concentration after one hour
    let batch = Batch::new(0.23, 2.0);
    let integrator = OdeIntegrator::default();

    let times: Vec<f64> = (0..=20).map(|i| i as f64 * 0.05).collect();
    let trace = batch.integrate(&integrator, &times).unwrap();

    let (t_end, ca_end) = trace.last().unwrap();
    assert_eq!(t_end, 1.0);
    assert_relative_eq!(ca_end, 1.589, max_relative = 1e-3);
    assert_relative_eq!(ca_end, batch.concentration_at(1.0), max_relative = 1e-6);
}

#[test]
fn pfr_worked_example() {
    init_logging();

    // k = 0.23 /min, Ca0 = 3.0 mol/L, v0 = 10 L/min, V = 100 L
    let pfr = Pfr::new(0.23, 3.0, 10.0);
    let integrator = OdeIntegrator::default();

    let exit = pfr.exit_concentration(&integrator, 100.0).unwrap();
    assert_relative_eq!(exit, 0.3008, max_relative = 1e-3);
}

#[test]
fn pfr_inverse_design_all_strategies_agree() {
    init_logging();

    let pfr = Pfr::new(0.23, 3.0, 10.0);
    let integrator = OdeIntegrator::default();
    let finder = RootFinder::default();

    // Analytical volume for an exit concentration of 0.3 mol/L
    let expected = 10.0 / 0.23 * (3.0_f64 / 0.3).ln();

    let by_quad = pfr
        .volume_for_exit(0.3, 150.0, InverseStrategy::QuadratureRootFind, &integrator, &finder)
        .unwrap();
    let by_event = pfr
        .volume_for_exit(0.3, 150.0, InverseStrategy::EventIntegration, &integrator, &finder)
        .unwrap();
    let by_spline = pfr
        .volume_for_exit(0.3, 150.0, InverseStrategy::InterpolateInvert, &integrator, &finder)
        .unwrap();

    for v in [by_quad, by_event, by_spline] {
        assert!((v - expected).abs() < 0.1, "{} vs {}", v, expected);
    }
    assert!((by_quad - by_event).abs() < 0.01);
    assert!((by_event - by_spline).abs() < 0.01);
}

#[test]
fn integration_methods_agree_on_batch_decay() {
    init_logging();

    let batch = Batch::new(0.23, 2.0);
    let methods = [
        IntegrationMethod::Dopri5,
        IntegrationMethod::GaussLegendre6,
        IntegrationMethod::RK4,
    ];
    let analytic = batch.concentration_at(1.0);

    for method in methods {
        let integrator = OdeIntegrator::new(method);
        let trace = batch.integrate(&integrator, &[0.0, 0.5, 1.0]).unwrap();
        let (_, ca) = trace.last().unwrap();
        assert_relative_eq!(ca, analytic, max_relative = 1e-6);
    }
}

#[test]
fn uncertainty_worked_example() {
    init_logging();

    // Rate constant known to +/- 0.10 /hr; propagate through the CSTR balance.
    let cstr = Cstr::new(0.23, 1.0, 2.5, 10.0);
    let ca = cstr.exit_concentration_uncertain(Uncertain::new(0.23, 0.10));

    assert_relative_eq!(ca.value, cstr.exit_concentration(), max_relative = 1e-12);
    assert!((ca.sigma - 0.0434).abs() < 1e-3);
    assert_eq!(format!("{:.3}", ca), "0.208 ± 0.043");
}
