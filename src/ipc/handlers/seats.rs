use serde_json::json;

use crate::api::ChartAction;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers;
use crate::ipc::types::{AppState, Request};

pub async fn try_handle(state: &AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "seats.dragBegin" => Some(handle_drag_begin(state, req).await),
        "seats.dragCancel" => Some(handle_drag_cancel(state, req).await),
        "seats.drop" => Some(handle_drop(state, req).await),
        "seats.remove" => Some(handle_remove(state, req).await),
        "seats.autoAssign" => Some(handle_auto_assign(state, req).await),
        "seats.shuffle" => Some(handle_shuffle(state, req).await),
        _ => None,
    }
}

async fn handle_drag_begin(state: &AppState, req: &Request) -> serde_json::Value {
    let student_id = match req.params.get("studentId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing studentId", None),
    };
    let mut session = state.session.lock().await;
    session.held_student = Some(student_id);
    ok(&req.id, json!({ "state": session.snapshot() }))
}

async fn handle_drag_cancel(state: &AppState, req: &Request) -> serde_json::Value {
    let mut session = state.session.lock().await;
    session.held_student = None;
    ok(&req.id, json!({ "state": session.snapshot() }))
}

/// Drop the held student on a grid cell. The server is the sole arbiter of
/// seat uniqueness; we send the assignment and reflect whatever the refetch
/// returns.
async fn handle_drop(state: &AppState, req: &Request) -> serde_json::Value {
    let row_num = match req.params.get("rowNum").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing rowNum", None),
    };
    let col_num = match req.params.get("colNum").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing colNum", None),
    };

    let (chart_id, student_id) = {
        let mut session = state.session.lock().await;
        let Some(student_id) = session.held_student else {
            // Nothing being dragged: ignore the drop.
            return ok(
                &req.id,
                json!({ "assigned": false, "state": session.snapshot() }),
            );
        };
        let Some(chart_id) = session.selected_chart else {
            return err(&req.id, "no_chart_selected", "select a chart first", None);
        };
        let Some(detail) = session.detail.as_ref() else {
            return err(
                &req.id,
                "no_chart_selected",
                "chart detail not loaded yet",
                None,
            );
        };
        if row_num < 1
            || row_num > detail.chart.rows
            || col_num < 1
            || col_num > detail.chart.columns
        {
            return err(
                &req.id,
                "bad_params",
                "seat position outside the grid",
                Some(json!({ "rows": detail.chart.rows, "columns": detail.chart.columns })),
            );
        }
        session.held_student = None;
        (chart_id, student_id)
    };

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let assigned = match api
        .post_action(&ChartAction::AssignSeat {
            chart_id,
            student_id,
            row_num,
            col_num,
        })
        .await
    {
        Ok(()) => {
            helpers::refresh_detail(state).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, student_id, "seat assignment failed");
            false
        }
    };

    ok(
        &req.id,
        json!({ "assigned": assigned, "state": helpers::snapshot(state).await }),
    )
}

async fn handle_remove(state: &AppState, req: &Request) -> serde_json::Value {
    let student_id = match req.params.get("studentId").and_then(|v| v.as_i64()) {
        Some(v) => v,
        None => return err(&req.id, "bad_params", "missing studentId", None),
    };

    let chart_id = {
        let session = state.session.lock().await;
        match session.selected_chart {
            Some(id) => id,
            None => return err(&req.id, "no_chart_selected", "select a chart first", None),
        }
    };

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let removed = match api
        .post_action(&ChartAction::RemoveAssignment {
            chart_id,
            student_id,
        })
        .await
    {
        Ok(()) => {
            helpers::refresh_detail(state).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, student_id, "seat removal failed");
            false
        }
    };

    ok(
        &req.id,
        json!({ "removed": removed, "state": helpers::snapshot(state).await }),
    )
}

/// Server-side placement of everyone still unassigned. The sidecar sends the
/// chart id and refetches; the placement strategy is the server's business.
async fn handle_auto_assign(state: &AppState, req: &Request) -> serde_json::Value {
    let chart_id = {
        let session = state.session.lock().await;
        match session.selected_chart {
            Some(id) => id,
            None => return err(&req.id, "no_chart_selected", "select a chart first", None),
        }
    };

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let auto_assigned = match api.post_action(&ChartAction::AutoAssign { chart_id }).await {
        Ok(()) => {
            helpers::refresh_detail(state).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, "auto-assign failed");
            false
        }
    };

    ok(
        &req.id,
        json!({ "autoAssigned": auto_assigned, "state": helpers::snapshot(state).await }),
    )
}

/// Shuffle rearranges every seat, so it is gated behind `confirm` the same
/// way deleting a chart is.
async fn handle_shuffle(state: &AppState, req: &Request) -> serde_json::Value {
    let confirm = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let chart_id = {
        let session = state.session.lock().await;
        match session.selected_chart {
            Some(id) => id,
            None => return err(&req.id, "no_chart_selected", "select a chart first", None),
        }
    };

    if !confirm {
        return ok(
            &req.id,
            json!({
                "shuffled": false,
                "confirmRequired": true,
                "state": helpers::snapshot(state).await,
            }),
        );
    }

    let Some(api) = helpers::current_api(state).await else {
        return err(&req.id, "not_configured", "no API base URL configured", None);
    };

    let shuffled = match api.post_action(&ChartAction::Shuffle { chart_id }).await {
        Ok(()) => {
            helpers::refresh_detail(state).await;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, "shuffle failed");
            false
        }
    };

    ok(
        &req.id,
        json!({ "shuffled": shuffled, "state": helpers::snapshot(state).await }),
    )
}
