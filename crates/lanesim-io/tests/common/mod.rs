//! Shared helpers for IO integration tests.
#![allow(dead_code)]

use lanesim_core::observer::StepObserver;
use lanesim_engine::application::simulation::Simulation;
use lanesim_io::loader::Scenario;

/// Runs `scenario` to completion on the global pool and returns the final
/// simulation.
pub fn run_scenario(scenario: Scenario, observer: &mut impl StepObserver) -> Simulation {
    let mut sim = Simulation::seeded(scenario.params, scenario.cars).unwrap();
    sim.run(observer).unwrap();
    sim
}

/// Runs `scenario` on a dedicated pool of `threads` workers.
pub fn run_scenario_on(scenario: Scenario, threads: usize) -> Simulation {
    let mut sim = Simulation::seeded(scenario.params, scenario.cars)
        .unwrap()
        .with_threads(threads)
        .unwrap();
    sim.run(&mut lanesim_core::observer::NoopObserver).unwrap();
    sim
}
