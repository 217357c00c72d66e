use std::sync::Arc;

use catalog::{
    Catalog,
    chat::{CannedResponder, Responder},
};

use super::config::Config;

pub struct State {
    pub catalog: Catalog,
    pub responder: Arc<dyn Responder>,
    pub config: Config,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        Self::with_responder(config, Arc::new(CannedResponder))
    }

    pub fn with_responder(config: Config, responder: Arc<dyn Responder>) -> Arc<Self> {
        Arc::new(Self {
            catalog: Catalog::new(),
            responder,
            config,
        })
    }
}

pub type SharedState = Arc<State>;
