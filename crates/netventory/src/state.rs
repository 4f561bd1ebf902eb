//! Application state shared across HTTP handlers

use std::sync::Arc;

use kameo::actor::ActorRef;
use netventory_core::InventoryActor;

use crate::config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Reference to the inventory actor
    pub inventory: ActorRef<InventoryActor>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(inventory: ActorRef<InventoryActor>, config: Config) -> Self {
        Self {
            inventory,
            config: Arc::new(config),
        }
    }
}
