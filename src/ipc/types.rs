use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::api::ApiClient;
use crate::session::Session;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Shared process state. The session mutex is never held across an upstream
/// HTTP call: handlers capture a fetch token, release the lock, await, then
/// re-lock and apply if the token is still current.
pub struct AppState {
    pub session: Mutex<Session>,
    /// Upstream client; absent until configured by flag or `session.open`.
    pub api: RwLock<Option<Arc<ApiClient>>>,
    pub request_timeout: Duration,
}
