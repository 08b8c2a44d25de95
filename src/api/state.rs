use std::sync::Arc;

use crate::store::Dataset;

/// Shared application state
///
/// The dataset is read-only after startup, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }
}
