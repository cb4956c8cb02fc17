//! Shared application state

use std::sync::Arc;

use suites_core::{HotelDirectory, MaintenanceCopilot, VectorizationService};

/// Handles injected into every handler; all read-only after construction
#[derive(Clone)]
pub struct AppState {
    pub vectorization: Arc<VectorizationService>,
    pub hotels: Arc<dyn HotelDirectory>,
    pub copilot: Arc<MaintenanceCopilot>,
}

impl AppState {
    pub fn new(
        vectorization: Arc<VectorizationService>,
        hotels: Arc<dyn HotelDirectory>,
        copilot: Arc<MaintenanceCopilot>,
    ) -> Self {
        Self {
            vectorization,
            hotels,
            copilot,
        }
    }
}
