use std::sync::Arc;

use crate::{
    cleanup::CleanupScheduler,
    config::Config,
    ids::ClipIds,
    tools::{MediaTools, ToolAvailability},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tools: Arc<dyn MediaTools>,
    pub availability: ToolAvailability,
    pub ids: Arc<ClipIds>,
    pub cleanup: CleanupScheduler,
}

impl AppState {
    pub fn new(config: Config, tools: Arc<dyn MediaTools>, availability: ToolAvailability) -> Self {
        Self {
            config: Arc::new(config),
            tools,
            availability,
            ids: Arc::new(ClipIds::new()),
            cleanup: CleanupScheduler::new(),
        }
    }
}
