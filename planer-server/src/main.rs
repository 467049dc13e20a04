mod config;
mod lists;
mod locks;
mod routes;
mod service;
mod state;
mod store;
mod token;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::service::Planer;
use crate::state::AppState;
use crate::store::sharepoint::SharePointStore;
use crate::token::AcsTokenProvider;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("planer_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::load()?;

    let http = reqwest::Client::builder()
        .user_agent(concat!("planer-server/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let tokens = Arc::new(AcsTokenProvider::new(http.clone(), &config));
    let store = SharePointStore::new(http, config.api_base(), tokens, config.page_size);
    let planer = Planer::new(Arc::new(store)).with_first_name_column(config.first_name_column);
    let state = AppState::new(planer);

    let app = routes::app(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("planer-server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
