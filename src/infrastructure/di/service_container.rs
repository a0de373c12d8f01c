//! Service container for dependency injection
//!
//! Wires settings into engines and sessions.

use std::sync::Arc;

use crate::application::services::TourSession;
use crate::application::StepObserver;
use crate::config::Settings;
use crate::domain::{CompletionListener, TourEngine};

/// Container holding the loaded settings and building configured services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,
}

impl ServiceContainer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// Engine configured from settings, reporting to `listener`.
    pub fn engine(&self, listener: Box<dyn CompletionListener>) -> TourEngine {
        TourEngine::new()
            .with_attempts_per_point(self.settings.attempts_per_point)
            .with_listener(listener)
    }

    /// Session with a configured engine and step driver.
    pub fn session(
        &self,
        listener: Box<dyn CompletionListener>,
        observer: Option<StepObserver>,
    ) -> TourSession {
        TourSession::new(self.engine(listener), &self.settings, observer)
    }
}
