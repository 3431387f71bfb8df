// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! TLS material for the camera-facing listener.
//!
//! Certificate generation happens outside this process: a one-shot bootstrap
//! writes a CA plus a leaf certificate for the vendor hostname into
//! `CERT_DIR` before the server starts. We consume `server.crt` and
//! `server.key` read-only. The camera trusts the CA because its host network
//! installs `ca.crt`.

use std::io;
use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load the server certificate chain and private key from the certificate
/// root. TLS is mandatory; the caller treats failure as fatal at startup.
pub async fn load_server_config(cert_dir: &Path) -> io::Result<RustlsConfig> {
    let cert = cert_dir.join("server.crt");
    let key = cert_dir.join("server.key");

    for path in [&cert, &key] {
        if !path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "missing TLS material: {} (run the certificate bootstrap first)",
                    path.display()
                ),
            ));
        }
    }

    RustlsConfig::from_pem_file(cert, key).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_certificates_fail_with_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load_server_config(dir.path()).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("server.crt"));
    }
}
