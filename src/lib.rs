pub mod config;
pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;

use std::sync::Arc;

use crate::repositories::RecordStore;

pub use handlers::configure;

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}
