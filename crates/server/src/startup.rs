use std::{net::SocketAddr, time::Duration};

use axum::Router;
use configs::AppConfig;
use service::{ContactStore, NewContact};
use tracing::info;

use crate::errors::StartupError;
use crate::metrics;
use crate::routes::{self, ServerState};

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Build the seeded store and the router around it.
pub async fn build_app(cfg: &AppConfig) -> Router {
    common::env::ensure_asset_dirs(&[cfg.assets.images_dir.as_str(), cfg.assets.css_dir.as_str()])
        .await;

    // owned before the await so the future stays Send
    let seed: Vec<NewContact> = cfg
        .contacts
        .seed
        .iter()
        .map(|s| NewContact::new(s.name.clone(), s.email.clone()))
        .collect();
    let store = ContactStore::with_seed(seed).await;
    let seeded = store.len().await;
    metrics::set_current(seeded);
    info!(seeded, "contact store initialized");

    let state = ServerState::new(store, Duration::from_millis(cfg.contacts.delete_delay_ms));
    routes::build_router(state, &cfg.assets)
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await;

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, delete_delay_ms = cfg.contacts.delete_delay_ms, "starting contacts server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    axum::serve(listener, app).await?;
    Ok(())
}
