mod api;
mod grid;
mod ipc;
mod models;
mod session;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing_subscriber::EnvFilter;

use crate::api::ApiClient;
use crate::session::Session;

/// Seating-chart sidecar: line-delimited JSON requests on stdin, one JSON
/// response per line on stdout, logs on stderr.
#[derive(Debug, Parser)]
#[command(name = "seatingd", version)]
struct CliArgs {
    /// Base URL of the school-management API, e.g. http://localhost:3000/api.
    /// May also be supplied later via session.open.
    #[arg(long)]
    api_base_url: Option<String>,

    /// Upstream request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // stdout carries the protocol; logging must stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let request_timeout = Duration::from_secs(args.request_timeout_secs);
    let api = match args.api_base_url.as_deref() {
        Some(base) => Some(Arc::new(ApiClient::new(base, request_timeout)?)),
        None => None,
    };

    let state = Arc::new(ipc::AppState {
        session: Mutex::new(Session::default()),
        api: RwLock::new(api),
        request_timeout,
    });

    // Handlers run concurrently; a single writer task keeps response lines
    // from interleaving.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if stdout.write_all(b"\n").await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let _ = tx.send(ipc::bad_json(e.to_string()).to_string());
                continue;
            }
        };

        let state = Arc::clone(&state);
        let tx = tx.clone();
        tokio::spawn(async move {
            let resp = ipc::handle_request(&state, req).await;
            let _ = tx.send(resp.to_string());
        });
    }

    drop(tx);
    let _ = writer.await;
    Ok(())
}
