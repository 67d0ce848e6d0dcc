use std::sync::Arc;

use serde_json::json;

use crate::api::ApiClient;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req).await),
        "session.open" => Some(handle_session_open(state, req).await),
        "session.state" => Some(handle_session_state(state, req).await),
        _ => None,
    }
}

async fn handle_health(state: &AppState, req: &Request) -> serde_json::Value {
    let api = helpers::current_api(state).await;
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "apiBaseUrl": api.map(|a| a.base_url().to_string()),
        }),
    )
}

async fn handle_session_state(state: &AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "state": helpers::snapshot(state).await }))
}

/// Sign-in entry point: resolve the teacher, load classes, select the first
/// class and cascade into its charts. Upstream failures are logged and the
/// response simply shows the empty state.
async fn handle_session_open(state: &AppState, req: &Request) -> serde_json::Value {
    let user_id = match req.params.get("userId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing userId", None),
    };

    // The host UI knows its deployment and may point us at it here.
    if let Some(base) = req.params.get("apiBaseUrl").and_then(|v| v.as_str()) {
        let base = base.trim();
        if base.is_empty() {
            return err(&req.id, "bad_params", "apiBaseUrl must not be empty", None);
        }
        match ApiClient::new(base, state.request_timeout) {
            Ok(client) => *state.api.write().await = Some(Arc::new(client)),
            Err(e) => {
                return err(
                    &req.id,
                    "bad_params",
                    format!("invalid apiBaseUrl: {e}"),
                    None,
                )
            }
        }
    }

    let Some(api) = helpers::current_api(state).await else {
        return err(
            &req.id,
            "not_configured",
            "no API base URL; start with --api-base-url or pass apiBaseUrl",
            None,
        );
    };

    let token = state.session.lock().await.begin_open();

    let teacher = match api.teacher_for_user(user_id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            tracing::warn!(user_id, "no teacher record for user");
            return ok(&req.id, json!({ "state": helpers::snapshot(state).await }));
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id, "teacher lookup failed");
            return ok(&req.id, json!({ "state": helpers::snapshot(state).await }));
        }
    };

    let classes = match api.classes_for_teacher(teacher.id).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, teacher_id = teacher.id, "class list fetch failed");
            Vec::new()
        }
    };

    let follow_up = {
        let mut session = state.session.lock().await;
        session.install_roster(token, teacher, classes)
    };
    if let Some((class_id, charts_token)) = follow_up {
        helpers::fetch_charts_with(state, &api, class_id, charts_token).await;
    }

    ok(&req.id, json!({ "state": helpers::snapshot(state).await }))
}
