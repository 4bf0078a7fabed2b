//! Shared state handed to every axum handler.

use std::sync::Arc;

use crate::usecase::SessionCoordinator;

/// Shared application state
pub struct AppState {
    /// SessionCoordinator（ルーム状態とイベント処理の窓口）
    pub coordinator: Arc<SessionCoordinator>,
}
