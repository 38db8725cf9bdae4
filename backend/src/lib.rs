pub mod config;
pub mod connection;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod store;

use std::sync::Arc;

use connection::{ConnectionManager, Connector};

pub use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub connections: Arc<ConnectionManager>,
}

impl AppState {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connections: Arc::new(ConnectionManager::new(connector)),
        }
    }
}
