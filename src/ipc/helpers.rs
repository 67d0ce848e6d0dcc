use std::sync::Arc;

use crate::api::ApiClient;
use crate::ipc::types::AppState;
use crate::session::{ChartsOutcome, ChartsToken, DetailToken};

pub async fn current_api(state: &AppState) -> Option<Arc<ApiClient>> {
    state.api.read().await.clone()
}

pub async fn snapshot(state: &AppState) -> serde_json::Value {
    state.session.lock().await.snapshot()
}

/// Fetch charts for `class_id` and apply them under `token`, chaining into a
/// detail fetch when reconciliation moved the chart selection. A fetch
/// failure logs and leaves the view as it was.
pub async fn fetch_charts_with(
    state: &AppState,
    api: &ApiClient,
    class_id: i64,
    token: ChartsToken,
) {
    match api.charts_for_class(class_id).await {
        Ok(charts) => {
            let follow_up = {
                let mut session = state.session.lock().await;
                match session.apply_charts(token, charts) {
                    ChartsOutcome::Applied { detail_fetch } => detail_fetch,
                    ChartsOutcome::Stale => {
                        tracing::debug!(class_id, "discarding stale chart list");
                        None
                    }
                }
            };
            if let Some((chart_id, detail_token)) = follow_up {
                fetch_detail_with(state, api, chart_id, detail_token).await;
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, class_id, "chart list fetch failed; keeping previous state");
        }
    }
}

pub async fn fetch_detail_with(
    state: &AppState,
    api: &ApiClient,
    chart_id: i64,
    token: DetailToken,
) {
    match api.chart_detail(chart_id).await {
        Ok(detail) => {
            let mut session = state.session.lock().await;
            if !session.apply_detail(token, detail) {
                tracing::debug!(chart_id, "discarding stale chart detail");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, chart_id, "chart detail fetch failed; keeping previous state");
        }
    }
}

/// Refetch the selected class's chart list, reconciling chart selection.
/// No-op when nothing is selected or no client is configured.
pub async fn refresh_charts(state: &AppState) {
    let Some(api) = current_api(state).await else {
        return;
    };
    let fetch = {
        let mut session = state.session.lock().await;
        session
            .selected_class
            .map(|class_id| (class_id, session.begin_charts_fetch()))
    };
    if let Some((class_id, token)) = fetch {
        fetch_charts_with(state, &api, class_id, token).await;
    }
}

/// Refetch the selected chart's detail. No-op when nothing is selected.
pub async fn refresh_detail(state: &AppState) {
    let Some(api) = current_api(state).await else {
        return;
    };
    let fetch = {
        let mut session = state.session.lock().await;
        session
            .selected_chart
            .map(|chart_id| (chart_id, session.begin_detail_fetch()))
    };
    if let Some((chart_id, token)) = fetch {
        fetch_detail_with(state, &api, chart_id, token).await;
    }
}
