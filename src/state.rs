// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::auth::AuthStore;
use crate::config::Config;
use crate::uploads::{UploadManager, UploadPaths};

/// Shared application state handed to every request handler.
///
/// The stores are explicit owned containers (no ambient globals): the
/// [`AuthStore`] owns pairing and token records, the [`UploadManager`] owns
/// sessions and staged files.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<AuthStore>,
    pub uploads: Arc<UploadManager>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let uploads = UploadManager::new(
            UploadPaths::new(&config.upload_dir),
            config.public_base_url.clone(),
        );
        Self {
            config: Arc::new(config),
            auth: Arc::new(AuthStore::new()),
            uploads: Arc::new(uploads),
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
