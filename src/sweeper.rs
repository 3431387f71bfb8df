// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! # Stale State Sweeper
//!
//! Background task that periodically reclaims abandoned upload sessions
//! (a camera that disconnected mid-transfer leaves its staging files behind
//! forever otherwise) and drops expired pairing codes and tokens.
//!
//! Completed uploads are never touched; only sessions with no part activity
//! inside the idle window are reclaimed. Uses
//! `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::AuthStore;
use crate::uploads::UploadManager;

/// Time between sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// A session untouched this long is considered abandoned.
const MAX_SESSION_IDLE: Duration = Duration::from_secs(24 * 60 * 60);

/// Periodic reclaim of abandoned sessions and expired auth entries.
pub struct StaleSweeper {
    uploads: Arc<UploadManager>,
    auth: Arc<AuthStore>,
    interval: Duration,
    max_idle: Duration,
}

impl StaleSweeper {
    pub fn new(uploads: Arc<UploadManager>, auth: Arc<AuthStore>) -> Self {
        Self {
            uploads,
            auth,
            interval: SWEEP_INTERVAL,
            max_idle: MAX_SESSION_IDLE,
        }
    }

    /// Run the sweep loop until the cancellation token fires.
    ///
    /// Spawn as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            max_idle_secs = self.max_idle.as_secs(),
            "stale sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("stale sweeper shutting down");
                    return;
                }
            }

            let reclaimed = self.uploads.sweep_stale(self.max_idle).await;
            let (codes, tokens) = self.auth.sweep_expired().await;
            if reclaimed > 0 || codes > 0 || tokens > 0 {
                info!(
                    sessions = reclaimed,
                    device_codes = codes,
                    tokens,
                    "sweep reclaimed stale state"
                );
            }
        }
    }
}
