// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

use std::net::SocketAddr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use framedrop::{
    api,
    config::Config,
    state::AppState,
    sweeper::StaleSweeper,
    tls::load_server_config,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var("LOG_FORMAT").unwrap_or_default();

    if format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    // Install the ring crypto provider for rustls (must happen before any
    // TLS operations).
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = Config::from_env();

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    let state = AppState::new(config.clone());

    // Startup hygiene: drop orphaned staging, rebuild dashboard history.
    if let Err(e) = state.uploads.cleanup_stale_parts().await {
        error!(error = %e, "failed to clean up stale parts");
    }
    if let Err(e) = state.uploads.scan_existing().await {
        error!(error = %e, "failed to scan existing uploads");
    }

    // TLS is mandatory: the camera only speaks HTTPS to the vendor hostname.
    let tls_config = load_server_config(&config.cert_dir)
        .await
        .expect("Failed to load TLS certificate material");

    let shutdown = CancellationToken::new();
    let sweeper = StaleSweeper::new(state.uploads.clone(), state.auth.clone());
    tokio::spawn(sweeper.run(shutdown.clone()));

    // Plain-HTTP dashboard on its own port, sharing state with the API.
    let dashboard_addr: SocketAddr = format!("{}:{}", config.host, config.dashboard_port)
        .parse()
        .expect("Failed to parse dashboard bind address");
    let dashboard = api::dashboard_router(state.clone());
    let dashboard_listener = tokio::net::TcpListener::bind(dashboard_addr)
        .await
        .expect("Failed to bind dashboard port");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(dashboard_listener, dashboard).await {
            error!(error = %e, "dashboard server failed");
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Failed to parse bind address");

    info!("framedrop server started");
    info!("  Camera API (HTTPS): port {}", config.port);
    info!("  Dashboard (HTTP):   port {}", config.dashboard_port);
    info!("  Uploads directory:  {}", config.upload_dir.display());
    info!("  Certificates:       {}", config.cert_dir.display());

    let handle = axum_server::Handle::new();
    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                shutdown.cancel();
                handle.graceful_shutdown(Some(Duration::from_secs(10)));
            }
        });
    }

    axum_server::bind_rustls(addr, tls_config)
        .handle(handle)
        .serve(api::router(state).into_make_service())
        .await
        .expect("HTTPS server failed");
}
