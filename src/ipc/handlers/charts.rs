use serde_json::json;

use crate::api::{ChartAction, ChartUpdate};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

// Editor defaults and the dimension bounds the form advertises. The server
// validates dimensions; we forward whatever the form submits.
const DEFAULT_ROWS: i64 = 5;
const DEFAULT_COLUMNS: i64 = 6;
const MIN_DIMENSION: i64 = 1;
const MAX_DIMENSION: i64 = 10;
const DEFAULT_LAYOUT: &str = "grid";

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "charts.select" => Some(handle_charts_select(state, req).await),
        "charts.editorOpen" => Some(handle_editor_open(state, req).await),
        "charts.editorClose" => Some(handle_editor_close(state, req).await),
        "charts.save" => Some(handle_charts_save(state, req).await),
        "charts.delete" => Some(handle_charts_delete(state, req).await),
        _ => None,
    }
}

async fn handle_charts_select(state: &AppState, req: &Request) -> serde_json::Value {
    let chart_id = match req.params.get("chartId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing chartId", None),
    };

    let token = {
        let mut session = state.session.lock().await;
        match session.select_chart(chart_id) {
            Some(t) => t,
            None => return err(&req.id, "bad_params", "unknown chartId", None),
        }
    };

    if let Some(api) = helpers::current_api(state).await {
        helpers::fetch_detail_with(state, &api, chart_id, token).await;
    }

    ok(&req.id, json!({ "state": helpers::snapshot(state).await }))
}

async fn handle_editor_open(state: &AppState, req: &Request) -> serde_json::Value {
    let mut session = state.session.lock().await;
    if session.selected_class.is_none() {
        return err(&req.id, "no_class_selected", "select a class first", None);
    }
    session.editor_open = true;
    ok(
        &req.id,
        json!({
            "editor": {
                "name": "",
                "roomName": "",
                "rows": DEFAULT_ROWS,
                "columns": DEFAULT_COLUMNS,
                "minDimension": MIN_DIMENSION,
                "maxDimension": MAX_DIMENSION,
            },
            "state": session.snapshot(),
        }),
    )
}

async fn handle_editor_close(state: &AppState, req: &Request) -> serde_json::Value {
    let mut session = state.session.lock().await;
    session.editor_open = false;
    session.editing_chart = None;
    ok(&req.id, json!({ "state": session.snapshot() }))
}

/// Persist the editor form: create when no chart is being edited, update
/// when one is. This is the only path that surfaces an upstream failure to
/// the UI; everything else logs and carries on.
async fn handle_charts_save(state: &AppState, req: &Request) -> serde_json::Value {
    let name = match req.params.get("name").and_then(|v| v.as_str()) {
        Some(v) => v.trim().to_string(),
        None => return err(&req.id, "bad_params", "missing name", None),
    };
    if name.is_empty() {
        return err(&req.id, "bad_params", "name must not be empty", None);
    }
    let room_name = req
        .params
        .get("roomName")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim()
        .to_string();
    let rows = match req.params.get("rows").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing rows", None),
    };
    let columns = match req.params.get("columns").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing columns", None),
    };

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let (class_id, editing) = {
        let session = state.session.lock().await;
        if !session.editor_open {
            return err(&req.id, "bad_params", "editor is not open", None);
        }
        match session.selected_class {
            Some(id) => (id, session.editing_chart),
            None => return err(&req.id, "no_class_selected", "select a class first", None),
        }
    };

    let saved = match editing {
        // No UI path populates editing_chart today; the branch is wired for
        // when one does.
        Some(chart_id) => {
            api.update_chart(
                chart_id,
                &ChartUpdate {
                    name,
                    room_name,
                    rows,
                    columns,
                },
            )
            .await
        }
        None => {
            api.post_action(&ChartAction::CreateChart {
                class_id,
                name,
                room_name,
                rows,
                columns,
                layout_type: DEFAULT_LAYOUT.to_string(),
            })
            .await
        }
    };

    if let Err(e) = saved {
        tracing::warn!(error = %e, class_id, "chart save failed");
        return err(
            &req.id,
            "save_failed",
            "could not save the seating chart",
            None,
        );
    }

    {
        let mut session = state.session.lock().await;
        session.editor_open = false;
        session.editing_chart = None;
    }
    helpers::refresh_charts(state).await;

    ok(
        &req.id,
        json!({ "saved": true, "state": helpers::snapshot(state).await }),
    )
}

/// Deleting is destructive: without `confirm` the request is answered, not
/// acted on, and the host UI shows its blocking prompt.
async fn handle_charts_delete(state: &AppState, req: &Request) -> serde_json::Value {
    let chart_id = match req.params.get("chartId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing chartId", None),
    };
    let confirm = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    {
        let session = state.session.lock().await;
        if !session.charts.iter().any(|c| c.id == chart_id) {
            return err(&req.id, "bad_params", "unknown chartId", None);
        }
    }

    if !confirm {
        return ok(
            &req.id,
            json!({
                "deleted": false,
                "confirmRequired": true,
                "state": helpers::snapshot(state).await,
            }),
        );
    }

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let deleted = match api.delete_chart(chart_id).await {
        Ok(()) => {
            helpers::refresh_charts(state).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, "chart delete failed");
            false
        }
    };

    ok(
        &req.id,
        json!({ "deleted": deleted, "state": helpers::snapshot(state).await }),
    )
}
