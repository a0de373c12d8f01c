//! Tour session service
//!
//! Couples a shared engine with its step driver and the random source used
//! for generated point sets. Every mutation goes through the engine mutex.

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::{debug, info, instrument};

use crate::application::driver::{lock_engine, SharedEngine, StepDriver, StepObserver};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{Generation, Region, Snapshot, StepResult, TourEngine};

/// Interactive session over one tour engine.
pub struct TourSession {
    driver: StepDriver,
    rng: Pcg64,
    default_region: Region,
}

impl TourSession {
    /// Create a session from settings (interval, default region, seed).
    pub fn new(engine: TourEngine, settings: &Settings, observer: Option<StepObserver>) -> Self {
        let engine: SharedEngine = Arc::new(Mutex::new(engine));
        let mut driver = StepDriver::new(engine, settings.step_interval());
        if let Some(observer) = observer {
            driver = driver.with_observer(observer);
        }
        let rng = match settings.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        debug!(
            interval_ms = settings.step_interval_ms,
            seed = ?settings.seed,
            "session created"
        );
        Self {
            driver,
            rng,
            default_region: settings.region(),
        }
    }

    pub fn engine(&self) -> &SharedEngine {
        self.driver.engine()
    }

    pub fn default_region(&self) -> Region {
        self.default_region
    }

    pub fn add_point(&self, x: i32, y: i32) -> ApplicationResult<()> {
        lock_engine(self.engine())?.add_point(x, y);
        Ok(())
    }

    pub fn step(&self) -> ApplicationResult<StepResult> {
        self.driver.step_once()
    }

    /// Step until the engine reports a terminal result, returning every step.
    #[instrument(level = "debug", skip(self))]
    pub fn run_to_completion(&self) -> ApplicationResult<Vec<StepResult>> {
        let mut results = Vec::new();
        loop {
            let result = self.step()?;
            results.push(result);
            if result.is_terminal() {
                return Ok(results);
            }
        }
    }

    pub fn undo(&self) -> ApplicationResult<()> {
        lock_engine(self.engine())?.undo();
        Ok(())
    }

    pub fn reset(&self) -> ApplicationResult<()> {
        lock_engine(self.engine())?.reset();
        Ok(())
    }

    /// Replace the point set with random points in `region` (or the
    /// configured default region).
    #[instrument(level = "debug", skip(self))]
    pub fn generate_random(
        &mut self,
        count: usize,
        region: Option<Region>,
    ) -> ApplicationResult<Generation> {
        let region = region.unwrap_or(self.default_region);
        let generation = lock_engine(self.driver.engine())?.generate_random(
            count,
            region,
            &mut self.rng,
        )?;
        info!(
            requested = generation.requested,
            generated = generation.generated,
            %region,
            "random points"
        );
        Ok(generation)
    }

    pub fn start_auto(&mut self) -> ApplicationResult<()> {
        self.driver.start_auto()
    }

    pub fn stop_auto(&mut self) {
        self.driver.stop_auto();
    }

    /// Block until automatic stepping finishes by itself.
    pub fn wait(&mut self) {
        self.driver.wait();
    }

    pub fn is_auto_running(&self) -> bool {
        self.driver.is_running()
    }

    pub fn snapshot(&self) -> ApplicationResult<Snapshot> {
        Ok(lock_engine(self.engine())?.snapshot())
    }
}
