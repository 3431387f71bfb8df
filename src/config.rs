// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup. All variables
//! have defaults suited to the container image; nothing is mandatory.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `UPLOAD_DIR` | Root directory for finalized uploads and `.parts` staging | `/uploads` |
//! | `CERT_DIR` | Certificate root (`server.crt`, `server.key`, `ca.crt`) | `/certs` |
//! | `HOST` | Bind address for both listeners | `0.0.0.0` |
//! | `PORT` | HTTPS camera API port | `443` |
//! | `DASHBOARD_PORT` | Plain-HTTP dashboard port | `3000` |
//! | `PUBLIC_BASE_URL` | Base of synthesized upload URLs | `https://api.frame.io` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! The camera resolves `api.frame.io` to this server via DNS rewrite, so the
//! upload URLs we hand out use the vendor hostname and still land here.

use std::env;
use std::path::PathBuf;

/// Fixed chunk size for multi-part uploads (vendor-compatible).
pub const PART_SIZE: u64 = 25 * 1024 * 1024;

/// Upper bound on parts per asset (~100 GB at 25 MiB per part).
pub const MAX_PARTS: u32 = 4000;

/// How many upload references a realtime batch request hands out.
pub const REALTIME_PART_BATCH: u32 = 5;

/// Runtime configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub cert_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub dashboard_port: u16,
    pub public_base_url: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/uploads")),
            cert_dir: env::var("CERT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/certs")),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(443),
            dashboard_port: env::var("DASHBOARD_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "https://api.frame.io".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("/uploads"),
            cert_dir: PathBuf::from("/certs"),
            host: "0.0.0.0".to_string(),
            port: 443,
            dashboard_port: 3000,
            public_base_url: "https://api.frame.io".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_container_layout() {
        let config = Config::default();
        assert_eq!(config.upload_dir, PathBuf::from("/uploads"));
        assert_eq!(config.cert_dir, PathBuf::from("/certs"));
        assert_eq!(config.port, 443);
        assert_eq!(config.dashboard_port, 3000);
        assert_eq!(config.public_base_url, "https://api.frame.io");
    }

    #[test]
    fn part_size_is_25_mib() {
        assert_eq!(PART_SIZE, 26_214_400);
    }
}
