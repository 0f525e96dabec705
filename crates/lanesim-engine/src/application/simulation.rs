//! Simulation driver.
//!
//! Owns the road, the random stream and the step orchestrator, and runs the
//! configured number of steps, handing each resulting state to an observer.

use std::time::Instant;

use lanesim_core::car::Car;
use lanesim_core::error::SimError;
use lanesim_core::observer::StepObserver;
use lanesim_core::params::Params;
use lanesim_core::rng::{MinStdRand, RandomSource};

use super::step::StepOrchestrator;
use crate::domain::road::Road;

/// A validated simulation ready to be stepped.
#[derive(Debug)]
pub struct Simulation<R = MinStdRand> {
    params: Params,
    road: Road,
    rng: R,
    orchestrator: StepOrchestrator,
    pool: Option<rayon::ThreadPool>,
    check_invariants: bool,
}

impl Simulation<MinStdRand> {
    /// Creates a simulation driven by a [`MinStdRand`] seeded from
    /// `params.seed`, or the default seed when there is none.
    ///
    /// # Errors
    ///
    /// See [`Simulation::new`].
    pub fn seeded(params: Params, cars: Vec<Car>) -> Result<Self, SimError> {
        let rng = MinStdRand::new(params.seed.unwrap_or(MinStdRand::DEFAULT_SEED));
        Self::new(params, cars, rng)
    }
}

impl<R: RandomSource + Send> Simulation<R> {
    /// Validates the parameters and initial cars and builds the road.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if the parameters are out of
    /// range or the number of cars differs from `params.n`, and
    /// `SimError::InvalidCar` if a car is off the road, overlaps another car,
    /// has an out-of-order id or exceeds `vmax`.
    pub fn new(params: Params, cars: Vec<Car>, rng: R) -> Result<Self, SimError> {
        params.validate()?;
        if cars.len() != params.n {
            return Err(SimError::InvalidParameter(format!(
                "expected {} cars, got {}",
                params.n,
                cars.len()
            )));
        }
        if let Some(car) = cars.iter().find(|car| car.v > params.vmax) {
            return Err(SimError::InvalidCar {
                id: car.id,
                reason: format!("velocity {} exceeds vmax {}", car.v, params.vmax),
            });
        }

        let road = Road::new(params.length, cars)?;
        let orchestrator = StepOrchestrator::new(&params);
        Ok(Self {
            params,
            road,
            rng,
            orchestrator,
            pool: None,
            check_invariants: false,
        })
    }

    /// Runs every step on a dedicated pool of `threads` workers. Zero keeps
    /// the global rayon pool.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidParameter` if the pool cannot be started.
    pub fn with_threads(mut self, threads: usize) -> Result<Self, SimError> {
        if threads == 0 {
            self.pool = None;
            return Ok(self);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lanesim-{i}"))
            .build()
            .map_err(|e| {
                SimError::InvalidParameter(format!("cannot start {threads} worker threads: {e}"))
            })?;
        self.pool = Some(pool);
        Ok(self)
    }

    /// Verifies the road invariants after every step when `enabled`.
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// The parameters this simulation was built with.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The current road.
    #[must_use]
    pub fn road(&self) -> &Road {
        &self.road
    }

    /// All cars in id order.
    #[must_use]
    pub fn cars(&self) -> &[Car] {
        self.road.cars()
    }

    /// The random stream, as left by the last step.
    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Number of steps completed so far.
    #[must_use]
    pub fn steps_done(&self) -> usize {
        self.orchestrator.steps_done()
    }

    /// Advances the simulation by one step.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvariantViolation` if the road is found
    /// inconsistent during or, with invariant checks on, after the step.
    pub fn step(&mut self) -> Result<(), SimError> {
        let step = self.orchestrator.steps_done();
        let Self {
            road,
            rng,
            orchestrator,
            pool,
            ..
        } = self;
        match pool {
            Some(pool) => pool.install(|| orchestrator.step(road, rng))?,
            None => orchestrator.step(road, rng)?,
        }

        if self.check_invariants {
            self.road
                .check_invariants(self.params.vmax)
                .map_err(|detail| SimError::InvariantViolation { step, detail })?;
        }
        Ok(())
    }

    /// Runs the remaining steps up to `params.steps`, reporting the state
    /// after each one to `observer`.
    ///
    /// # Errors
    ///
    /// Propagates the first error from a step or from the observer.
    pub fn run<O: StepObserver + ?Sized>(&mut self, observer: &mut O) -> Result<(), SimError> {
        let started = Instant::now();
        tracing::info!(
            n = self.params.n,
            length = self.params.length,
            steps = self.params.steps,
            threads = self
                .pool
                .as_ref()
                .map_or_else(rayon::current_num_threads, rayon::ThreadPool::current_num_threads),
            "Starting simulation"
        );

        while self.steps_done() < self.params.steps {
            let step = self.steps_done();
            self.step()?;
            tracing::debug!(step, "Step complete");
            observer.on_step(step, self.road.cars())?;
        }

        tracing::info!(
            steps = self.steps_done(),
            elapsed_ms = started.elapsed().as_millis(),
            "Simulation finished"
        );
        Ok(())
    }
}
