use std::sync::Arc;

use bluetape_events::NotificationDispatcher;

use crate::config::ServerConfig;
use crate::render::ReportRenderer;
use crate::storage::FileStorage;

/// Handles every request needs. Clones share the same pool and services.
#[derive(Clone)]
pub struct AppState {
    pub pool: bluetape_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Where uploaded photos and documents are written.
    pub storage: Arc<dyn FileStorage>,
    /// Outbound email/SMS dispatch.
    pub notifier: Arc<NotificationDispatcher>,
    /// Punch list and manual export renderer.
    pub renderer: Arc<dyn ReportRenderer>,
}
