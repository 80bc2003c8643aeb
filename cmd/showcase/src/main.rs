//! Showcase server entry point.

mod telemetry;
mod wiring;

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{build_router, serve_media, AppState};
use configs::{MediaBackend, Settings};
use domains::{BuildEvent, View};
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    telemetry::init(settings.log.format);

    let showcase = Arc::new(wiring::showcase(&settings).await?);
    spawn_event_log(showcase.events.subscribe());

    let state = AppState::new(showcase, settings.moderation.admin_token.clone());
    let mut router = build_router(state);
    if settings.media.backend == MediaBackend::Local {
        router = serve_media(router, &settings.media.url_prefix, &settings.media.root);
    }

    let addr = settings.server.addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, policy = ?settings.moderation.approval, "showcase listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("showcase stopped");
    Ok(())
}

/// Logs which views each mutation invalidates.
fn spawn_event_log(mut events: broadcast::Receiver<BuildEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let views: Vec<String> =
                        event.affected_views().iter().map(View::path).collect();
                    info!(build_id = %event.build_id(), ?views, ?event, "views invalidated");
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "event log fell behind"),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
