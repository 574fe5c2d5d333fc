//! # Gaceta
//!
//! Assembles the site from its adapters and serves it.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState, UploadLimit};
use auth_adapters::{Argon2Hasher, JwtTokenService};
use configs::{LogFormat, Settings};
use secrecy::ExposeSecret;
use services::{AccountService, CommentService, PostService};
use storage_adapters::{LocalMediaStore, SqliteStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// URL prefix uploaded images are served under; `/public` maps to `public_dir`.
const IMAGE_URL_PREFIX: &str = "/public/img";

fn install_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,gaceta=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not listen for shutdown signal");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    install_tracing(settings.log_format);

    let store = Arc::new(
        SqliteStore::connect(&settings.database_url, settings.database_max_connections)
            .await
            .context("opening database")?,
    );

    let upload_dir = settings.upload_dir();
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .with_context(|| format!("creating upload directory {}", upload_dir.display()))?;
    let media = Arc::new(LocalMediaStore::new(upload_dir, IMAGE_URL_PREFIX.to_string()));

    let tokens = Arc::new(JwtTokenService::new(
        settings.secreto.expose_secret().as_bytes(),
        chrono::Duration::seconds(settings.token_ttl_secs),
    ));

    let state = AppState {
        accounts: Arc::new(AccountService::new(
            store.clone(),
            Arc::new(Argon2Hasher::new()),
            tokens,
        )),
        posts: Arc::new(PostService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            media,
        )),
        comments: Arc::new(CommentService::new(store.clone())),
        upload_limit: UploadLimit {
            megabytes: settings.upload_limit_mb,
        },
    };

    let app = router(state, &settings.public_dir);

    let address = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!(%address, "Gaceta listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;

    store.close().await;
    info!("Gaceta stopped");
    Ok(())
}
