use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "classes.select" => Some(handle_classes_select(state, req).await),
        _ => None,
    }
}

/// Switch class, then load its charts: chart selection is reconciled and the
/// selected chart's detail follows. A failed fetch keeps the previous view.
async fn handle_classes_select(state: &AppState, req: &Request) -> serde_json::Value {
    let class_id = match req.params.get("classId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing classId", None),
    };

    let token = {
        let mut session = state.session.lock().await;
        match session.select_class(class_id) {
            Some(t) => t,
            None => return err(&req.id, "bad_params", "unknown classId", None),
        }
    };

    if let Some(api) = helpers::current_api(state).await {
        helpers::fetch_charts_with(state, &api, class_id, token).await;
    }

    ok(&req.id, json!({ "state": helpers::snapshot(state).await }))
}
