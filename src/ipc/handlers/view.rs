use chrono::Local;
use serde_json::json;

use crate::grid;
use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grid.model" => Some(handle_grid_model(state, req).await),
        "print.model" => Some(handle_print_model(state, req).await),
        _ => None,
    }
}

async fn handle_grid_model(state: &AppState, req: &Request) -> serde_json::Value {
    let session = state.session.lock().await;
    let model = session.detail.as_ref().map(grid::grid_model);
    ok(&req.id, json!({ "grid": model }))
}

/// Printable document for the host's native print path; null when no chart
/// is loaded.
async fn handle_print_model(state: &AppState, req: &Request) -> serde_json::Value {
    let session = state.session.lock().await;
    let document = session
        .detail
        .as_ref()
        .map(|detail| grid::print_model(detail, session.selected_class_name(), Local::now()));
    ok(&req.id, json!({ "document": document }))
}
