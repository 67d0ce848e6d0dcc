use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

pub async fn handle_request(state: &AppState, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::classes::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::charts::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::seats::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::view::try_handle(state, &req).await {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
