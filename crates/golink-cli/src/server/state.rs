use std::sync::Arc;

use golink_core::{LinkRegistry, LinkStore};

/// Registry shared by every request
pub type SharedRegistry = Arc<LinkRegistry<Box<dyn LinkStore>>>;

#[derive(Clone)]
pub struct AppState {
    registry: SharedRegistry,
    public_host: String,
}

impl AppState {
    pub fn new(store: Box<dyn LinkStore>, public_host: impl Into<String>) -> Self {
        Self {
            registry: Arc::new(LinkRegistry::new(store)),
            public_host: public_host.into(),
        }
    }

    pub fn registry(&self) -> SharedRegistry {
        Arc::clone(&self.registry)
    }

    /// Host used in generated URLs when a request carries no Host header
    pub fn public_host(&self) -> &str {
        &self.public_host
    }
}
