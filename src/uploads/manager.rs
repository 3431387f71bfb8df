// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! # Asset & Upload Session Manager
//!
//! Owns every [`UploadSession`] and the staged chunk files on disk. Chunks
//! arrive as independent HTTP requests, possibly concurrent, out of order,
//! and duplicated after firmware retries; the manager reconstructs the
//! original file exactly once.
//!
//! ## Locking discipline
//!
//! Sessions live in a `RwLock<HashMap<_, Arc<Mutex<UploadSession>>>>`:
//! the outer map lock is held only to look up or insert a session, and each
//! session has its own mutex so unrelated uploads never serialize against
//! each other. Request bodies are streamed to scratch files *outside* the
//! session lock; only the rename-into-place, the received-part bookkeeping,
//! and finalization itself run under it. The completeness check and the
//! finalize that follows happen inside one critical section, so of several
//! writers racing on the last part exactly one observes the incomplete ->
//! complete transition.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use chrono::{DateTime, Local, Utc};
use futures::{Stream, StreamExt};
use serde::Serialize;
use thiserror::Error;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::paths::UploadPaths;
use super::session::UploadSession;
use crate::config::REALTIME_PART_BATCH;
use crate::error::ApiError;
use crate::models::{AssetResponse, CreateAssetRequest};

/// Dashboard history is bounded; files on disk remain authoritative.
const HISTORY_CAP: usize = 500;

/// Errors from session lookups and part writes.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("asset not found")]
    UnknownAsset,
    #[error("unknown part index")]
    UnknownPart,
    /// Late or duplicate write for an asset that has already been assembled.
    /// Rejected rather than silently re-applied.
    #[error("asset already finalized")]
    AlreadyFinalized,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnknownAsset => ApiError::not_found("asset not found"),
            UploadError::UnknownPart => ApiError::not_found("unknown part index"),
            UploadError::AlreadyFinalized => ApiError::conflict("asset already finalized"),
            UploadError::Io(e) => ApiError::internal(format!("storage failure: {e}")),
        }
    }
}

/// Result of a staged part write.
#[derive(Debug)]
pub struct PartOutcome {
    /// Whether this write completed the session and triggered finalization.
    pub finalized: bool,
    /// Distinct parts received so far.
    pub received: u32,
    /// Parts allocated for the asset.
    pub part_count: u32,
    /// Bytes persisted for this part.
    pub bytes: u64,
}

/// One finalized upload, as shown on the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadRecord {
    pub name: String,
    pub size: u64,
    /// Date bucket the file landed in (`YYYY-MM-DD`).
    pub directory: String,
    #[serde(rename = "type")]
    pub filetype: String,
    pub timestamp: DateTime<Utc>,
}

/// Owns upload sessions, chunk staging, and finalized-file assembly.
pub struct UploadManager {
    paths: UploadPaths,
    public_base: String,
    sessions: RwLock<HashMap<String, Arc<Mutex<UploadSession>>>>,
    history: Mutex<Vec<UploadRecord>>,
}

impl UploadManager {
    pub fn new(paths: UploadPaths, public_base: impl Into<String>) -> Self {
        Self {
            paths,
            public_base: public_base.into(),
            sessions: RwLock::new(HashMap::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Register a new asset and synthesize its upload references.
    pub async fn create_asset(&self, request: CreateAssetRequest) -> AssetResponse {
        let id = Uuid::new_v4().to_string();
        let name = sanitize_name(request.name.as_deref(), &id);
        let filetype = request
            .filetype
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let session = UploadSession::new(
            id.clone(),
            name.clone(),
            filetype.clone(),
            request.filesize,
            request.is_realtime_upload,
        );
        let part_count = session.part_count;
        let upload_urls: Vec<String> = (1..=part_count).map(|n| self.upload_url(&id, n)).collect();

        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));

        info!(
            asset_id = %id,
            name = %name,
            filesize = ?request.filesize,
            parts = part_count,
            realtime = request.is_realtime_upload,
            "asset created"
        );

        AssetResponse {
            id,
            name,
            filesize: request.filesize,
            filetype,
            upload_urls,
            is_realtime_upload: request.is_realtime_upload,
        }
    }

    /// Append a batch of upload references to a realtime asset whose total
    /// part count is not known up front.
    pub async fn add_realtime_parts(&self, asset_id: &str) -> Result<Vec<String>, UploadError> {
        let session = self.session(asset_id).await?;
        let mut session = session.lock().await;
        if session.finalized {
            return Err(UploadError::AlreadyFinalized);
        }

        let start = session.part_count + 1;
        session.part_count += REALTIME_PART_BATCH;
        session.last_activity = Utc::now();

        Ok((start..start + REALTIME_PART_BATCH)
            .map(|n| self.upload_url(asset_id, n))
            .collect())
    }

    /// Stream one part's bytes to its staging file and record it.
    ///
    /// Idempotent per part: a retried part overwrites the previously staged
    /// bytes (last write wins) and does not count twice toward completion.
    /// If this write makes a non-realtime session complete, the file is
    /// assembled before the call returns.
    pub async fn write_part<S, E>(
        &self,
        asset_id: &str,
        part: u32,
        body: S,
    ) -> Result<PartOutcome, UploadError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::fmt::Display,
    {
        let session = self.session(asset_id).await?;

        {
            let mut session = session.lock().await;
            if session.finalized {
                return Err(UploadError::AlreadyFinalized);
            }
            if !session.accepts_part(part) {
                return Err(UploadError::UnknownPart);
            }
            session.last_activity = Utc::now();
        }

        // Stream to a scratch file without holding the session lock, so
        // other parts of the same asset upload concurrently.
        fs::create_dir_all(self.paths.asset_parts_dir(asset_id)).await?;
        let nonce = Uuid::new_v4().simple().to_string();
        let scratch = self.paths.part_scratch_file(asset_id, part, &nonce);
        let bytes = match stream_to_file(&scratch, body).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&scratch).await;
                return Err(e.into());
            }
        };

        let mut session = session.lock().await;
        if session.finalized {
            // Lost a race against finalization while the body streamed in.
            let _ = fs::remove_file(&scratch).await;
            return Err(UploadError::AlreadyFinalized);
        }

        fs::rename(&scratch, self.paths.part_file(asset_id, part)).await?;
        session.received.insert(part, bytes);
        session.last_activity = Utc::now();

        let finalized = if session.is_complete() {
            self.finalize(&mut session).await?;
            true
        } else {
            false
        };

        Ok(PartOutcome {
            finalized,
            received: session.received.len() as u32,
            part_count: session.part_count,
            bytes,
        })
    }

    /// Camera signal that a realtime upload is done: whatever parts arrived
    /// are the whole file. Idempotent; completing twice is a no-op.
    pub async fn complete_realtime(&self, asset_id: &str) -> Result<(), UploadError> {
        let session = self.session(asset_id).await?;
        let mut session = session.lock().await;
        if session.finalized || session.received.is_empty() {
            return Ok(());
        }
        session.part_count = session.received.len() as u32;
        self.finalize(&mut session).await?;
        Ok(())
    }

    /// Remove orphaned staging directories left by interrupted uploads.
    /// Run at startup, before any session exists.
    pub async fn cleanup_stale_parts(&self) -> io::Result<()> {
        let parts_root = self.paths.parts_root();
        if !parts_root.exists() {
            return Ok(());
        }

        let mut removed = 0usize;
        let mut entries = fs::read_dir(&parts_root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                fs::remove_dir_all(entry.path()).await?;
                removed += 1;
            }
        }
        if removed > 0 {
            info!(count = removed, "cleaned up orphaned partial uploads");
        }
        let _ = fs::remove_dir(&parts_root).await;
        Ok(())
    }

    /// Populate the dashboard history from files already on disk.
    pub async fn scan_existing(&self) -> io::Result<()> {
        let root = self.paths.root().to_path_buf();
        if !root.exists() {
            return Ok(());
        }

        let mut records = Vec::new();
        scan_dir(&root, &root, &mut records)?;
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(HISTORY_CAP);

        if !records.is_empty() {
            info!(count = records.len(), "found existing files in uploads directory");
        }
        *self.history.lock().await = records;
        Ok(())
    }

    /// Reclaim sessions with no activity since `max_idle` ago. Incomplete
    /// sessions lose their staging area; finalized ones are just forgotten
    /// (their files are on disk and in the history). Returns the number of
    /// abandoned incomplete sessions reclaimed.
    pub async fn sweep_stale(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_idle).unwrap_or_else(|_| chrono::Duration::hours(24));

        let mut drop_ids: Vec<(String, bool)> = Vec::new();
        {
            let sessions = self.sessions.read().await;
            for (id, cell) in sessions.iter() {
                // A session we cannot lock right now is being written to.
                if let Ok(session) = cell.try_lock() {
                    if session.last_activity < cutoff {
                        drop_ids.push((id.clone(), !session.finalized));
                    }
                }
            }
        }

        if drop_ids.is_empty() {
            return 0;
        }

        {
            let mut sessions = self.sessions.write().await;
            for (id, _) in &drop_ids {
                sessions.remove(id);
            }
        }

        let mut reclaimed = 0usize;
        for (id, incomplete) in &drop_ids {
            if *incomplete {
                warn!(asset_id = %id, "reclaiming abandoned upload session");
                let _ = fs::remove_dir_all(self.paths.asset_parts_dir(id)).await;
                reclaimed += 1;
            }
        }
        reclaimed
    }

    /// Most recent finalized uploads, newest first.
    pub async fn history(&self, limit: usize) -> Vec<UploadRecord> {
        let history = self.history.lock().await;
        history.iter().take(limit).cloned().collect()
    }

    /// Total finalized uploads and their cumulative size.
    pub async fn totals(&self) -> (usize, u64) {
        let history = self.history.lock().await;
        (history.len(), history.iter().map(|r| r.size).sum())
    }

    /// Sessions still waiting for parts.
    pub async fn pending_count(&self) -> usize {
        let sessions = self.sessions.read().await;
        let mut pending = 0;
        for cell in sessions.values() {
            if let Ok(session) = cell.try_lock() {
                if !session.finalized {
                    pending += 1;
                }
            } else {
                // Locked means a write is in flight, hence not finalized.
                pending += 1;
            }
        }
        pending
    }

    async fn session(&self, asset_id: &str) -> Result<Arc<Mutex<UploadSession>>, UploadError> {
        self.sessions
            .read()
            .await
            .get(asset_id)
            .cloned()
            .ok_or(UploadError::UnknownAsset)
    }

    fn upload_url(&self, asset_id: &str, part: u32) -> String {
        format!("{}/upload/{}?part={}", self.public_base, asset_id, part)
    }

    /// Assemble the staged parts into the final date-bucketed file.
    ///
    /// Runs with the session lock held, so only one writer can ever get
    /// here for a given asset.
    async fn finalize(&self, session: &mut UploadSession) -> io::Result<()> {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let out_dir = self.paths.dated_dir(&date);
        fs::create_dir_all(&out_dir).await?;

        // Never overwrite an unrelated earlier file with the same name.
        let dest = disambiguate(out_dir.join(&session.name));

        let mut out = File::create(&dest).await?;
        for part in session.received_parts_sorted() {
            let mut input = File::open(self.paths.part_file(&session.id, part)).await?;
            tokio::io::copy(&mut input, &mut out).await?;
        }
        out.sync_all().await?;
        drop(out);

        fs::remove_dir_all(self.paths.asset_parts_dir(&session.id)).await?;
        session.finalized = true;

        let size = fs::metadata(&dest).await?.len();
        if let Some(declared) = session.declared_size {
            if declared != size {
                warn!(
                    asset_id = %session.id,
                    declared,
                    actual = size,
                    "finalized size differs from declared filesize"
                );
            }
        }

        let final_name = dest
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| session.name.clone());
        info!(
            asset_id = %session.id,
            name = %final_name,
            size,
            directory = %date,
            "upload finalized"
        );

        let mut history = self.history.lock().await;
        history.insert(
            0,
            UploadRecord {
                name: final_name,
                size,
                directory: date,
                filetype: session.filetype.clone(),
                timestamp: Utc::now(),
            },
        );
        history.truncate(HISTORY_CAP);
        Ok(())
    }
}

/// Reduce a camera-supplied name to a bare filename. Anything that does not
/// yield a usable final component falls back to an id-derived name.
fn sanitize_name(name: Option<&str>, asset_id: &str) -> String {
    name.map(Path::new)
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("unknown_{asset_id}"))
}

/// Append `_1`, `_2`, ... before the extension until the path is free.
fn disambiguate(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = parent.join(format!("{stem}_{counter}{extension}"));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

async fn stream_to_file<S, E>(path: &Path, mut body: S) -> io::Result<u64>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut file = File::create(path).await?;
    let mut bytes = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| io::Error::other(e.to_string()))?;
        file.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(bytes)
}

fn scan_dir(dir: &Path, root: &Path, records: &mut Vec<UploadRecord>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            // Skips the .parts staging tree and hidden files.
            continue;
        }
        if path.is_dir() {
            scan_dir(&path, root, records)?;
        } else if let Ok(metadata) = entry.metadata() {
            let directory = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default();
            let timestamp = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            records.push(UploadRecord {
                name: file_name,
                size: metadata.len(),
                directory,
                filetype: String::new(),
                timestamp,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PART_SIZE;
    use futures::stream;
    use std::convert::Infallible;
    use tempfile::TempDir;

    fn manager() -> (Arc<UploadManager>, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let manager = UploadManager::new(UploadPaths::new(dir.path()), "https://api.frame.io");
        (Arc::new(manager), dir)
    }

    fn body(bytes: &[u8]) -> impl Stream<Item = Result<Bytes, Infallible>> + Unpin {
        stream::iter(vec![Ok(Bytes::copy_from_slice(bytes))])
    }

    fn sized_request(name: &str, filesize: u64) -> CreateAssetRequest {
        CreateAssetRequest {
            name: Some(name.to_string()),
            filetype: Some("image/jpeg".to_string()),
            filesize: Some(filesize),
            is_realtime_upload: false,
        }
    }

    async fn finalized_file(dir: &TempDir, name: &str) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        dir.path().join(date).join(name)
    }

    #[tokio::test]
    async fn create_asset_allocates_parts_and_urls() {
        let (manager, _dir) = manager();
        let asset = manager
            .create_asset(sized_request("A.JPG", PART_SIZE * 2 + 1))
            .await;

        assert_eq!(asset.upload_urls.len(), 3);
        assert_eq!(
            asset.upload_urls[0],
            format!("https://api.frame.io/upload/{}?part=1", asset.id)
        );
        assert_eq!(
            asset.upload_urls[2],
            format!("https://api.frame.io/upload/{}?part=3", asset.id)
        );
    }

    #[tokio::test]
    async fn create_asset_sanitizes_names() {
        let (manager, _dir) = manager();
        let asset = manager
            .create_asset(CreateAssetRequest {
                name: Some("../../etc/passwd".to_string()),
                ..Default::default()
            })
            .await;
        assert_eq!(asset.name, "passwd");

        let asset = manager.create_asset(CreateAssetRequest::default()).await;
        assert_eq!(asset.name, format!("unknown_{}", asset.id));
    }

    #[tokio::test]
    async fn parts_assemble_in_index_order_regardless_of_arrival() {
        let (manager, dir) = manager();
        let asset = manager.create_asset(sized_request("A.JPG", PART_SIZE + 1)).await;

        // Reverse order: part 2 first.
        let outcome = manager.write_part(&asset.id, 2, body(b"world")).await.unwrap();
        assert!(!outcome.finalized);
        assert_eq!(outcome.received, 1);

        let outcome = manager.write_part(&asset.id, 1, body(b"hello ")).await.unwrap();
        assert!(outcome.finalized);

        let content = tokio::fs::read(finalized_file(&dir, "A.JPG").await)
            .await
            .unwrap();
        assert_eq!(content, b"hello world");

        // Staging area is gone.
        assert!(!dir.path().join(".parts").join(&asset.id).exists());

        let history = manager.history(10).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "A.JPG");
        assert_eq!(history[0].size, 11);
    }

    #[tokio::test]
    async fn part_rewrite_is_last_write_wins() {
        let (manager, dir) = manager();
        let asset = manager.create_asset(sized_request("A.JPG", PART_SIZE + 1)).await;

        manager.write_part(&asset.id, 2, body(b"first")).await.unwrap();
        let outcome = manager.write_part(&asset.id, 2, body(b"second")).await.unwrap();
        // Duplicate must not count as a new part.
        assert!(!outcome.finalized);
        assert_eq!(outcome.received, 1);

        manager.write_part(&asset.id, 1, body(b"x")).await.unwrap();
        let content = tokio::fs::read(finalized_file(&dir, "A.JPG").await)
            .await
            .unwrap();
        assert_eq!(content, b"xsecond");
    }

    #[tokio::test]
    async fn write_after_finalize_is_rejected() {
        let (manager, _dir) = manager();
        let asset = manager.create_asset(sized_request("A.JPG", 10)).await;
        manager.write_part(&asset.id, 1, body(b"data")).await.unwrap();

        let err = manager.write_part(&asset.id, 1, body(b"late")).await.unwrap_err();
        assert!(matches!(err, UploadError::AlreadyFinalized));
    }

    #[tokio::test]
    async fn unknown_asset_and_part_are_not_found() {
        let (manager, _dir) = manager();
        let err = manager.write_part("nope", 1, body(b"x")).await.unwrap_err();
        assert!(matches!(err, UploadError::UnknownAsset));

        let asset = manager.create_asset(sized_request("A.JPG", 10)).await;
        let err = manager.write_part(&asset.id, 0, body(b"x")).await.unwrap_err();
        assert!(matches!(err, UploadError::UnknownPart));
        let err = manager.write_part(&asset.id, 2, body(b"x")).await.unwrap_err();
        assert!(matches!(err, UploadError::UnknownPart));
    }

    #[tokio::test]
    async fn name_collisions_get_counter_suffixes() {
        let (manager, dir) = manager();

        for expected in ["A.JPG", "A_1.JPG", "A_2.JPG"] {
            let asset = manager.create_asset(sized_request("A.JPG", 10)).await;
            manager.write_part(&asset.id, 1, body(b"data")).await.unwrap();
            assert!(
                finalized_file(&dir, expected).await.exists(),
                "expected {expected}"
            );
        }
    }

    #[tokio::test]
    async fn concurrent_writers_finalize_exactly_once() {
        let (manager, dir) = manager();
        let parts: u64 = 8;
        let asset = manager
            .create_asset(sized_request("burst.bin", PART_SIZE * (parts - 1) + 1))
            .await;
        assert_eq!(asset.upload_urls.len(), parts as usize);

        let mut tasks = Vec::new();
        for n in 1..=parts as u32 {
            let manager = Arc::clone(&manager);
            let id = asset.id.clone();
            tasks.push(tokio::spawn(async move {
                let payload = vec![n as u8; 64];
                manager
                    .write_part(&id, n, body(&payload))
                    .await
                    .map(|o| o.finalized)
            }));
        }

        let mut finalized_count = 0;
        for task in tasks {
            if task.await.unwrap().unwrap() {
                finalized_count += 1;
            }
        }
        assert_eq!(finalized_count, 1);

        let content = tokio::fs::read(finalized_file(&dir, "burst.bin").await)
            .await
            .unwrap();
        let mut expected = Vec::new();
        for n in 1..=parts as u32 {
            expected.extend(std::iter::repeat_n(n as u8, 64));
        }
        assert_eq!(content, expected);

        let (count, bytes) = manager.totals().await;
        assert_eq!(count, 1);
        assert_eq!(bytes, parts * 64);
    }

    #[tokio::test]
    async fn realtime_flow_appends_parts_and_completes_on_signal() {
        let (manager, dir) = manager();
        let asset = manager
            .create_asset(CreateAssetRequest {
                name: Some("clip.mov".to_string()),
                filetype: Some("video/quicktime".to_string()),
                filesize: None,
                is_realtime_upload: true,
            })
            .await;
        assert_eq!(asset.upload_urls.len(), 1);

        let more = manager.add_realtime_parts(&asset.id).await.unwrap();
        assert_eq!(more.len(), REALTIME_PART_BATCH as usize);
        assert!(more[0].ends_with("?part=2"));

        manager.write_part(&asset.id, 1, body(b"aa")).await.unwrap();
        manager.write_part(&asset.id, 2, body(b"bb")).await.unwrap();
        let outcome = manager.write_part(&asset.id, 3, body(b"cc")).await.unwrap();
        // Realtime sessions wait for the explicit completion signal.
        assert!(!outcome.finalized);

        manager.complete_realtime(&asset.id).await.unwrap();
        let content = tokio::fs::read(finalized_file(&dir, "clip.mov").await)
            .await
            .unwrap();
        assert_eq!(content, b"aabbcc");

        // Completing again is a no-op.
        manager.complete_realtime(&asset.id).await.unwrap();

        let err = manager.complete_realtime("missing").await.unwrap_err();
        assert!(matches!(err, UploadError::UnknownAsset));
    }

    #[tokio::test]
    async fn declared_filesize_is_advisory() {
        let (manager, dir) = manager();
        // Declared 10 bytes; actually send 4. Must still finalize.
        let asset = manager.create_asset(sized_request("short.bin", 10)).await;
        manager.write_part(&asset.id, 1, body(b"data")).await.unwrap();
        let content = tokio::fs::read(finalized_file(&dir, "short.bin").await)
            .await
            .unwrap();
        assert_eq!(content, b"data");
    }

    #[tokio::test]
    async fn sweep_reclaims_abandoned_sessions() {
        let (manager, dir) = manager();
        let asset = manager.create_asset(sized_request("gone.bin", PART_SIZE + 1)).await;
        manager.write_part(&asset.id, 1, body(b"partial")).await.unwrap();
        assert!(dir.path().join(".parts").join(&asset.id).exists());

        // Zero idle tolerance: everything is stale.
        let reclaimed = manager.sweep_stale(Duration::ZERO).await;
        assert_eq!(reclaimed, 1);
        assert!(!dir.path().join(".parts").join(&asset.id).exists());

        let err = manager.write_part(&asset.id, 2, body(b"x")).await.unwrap_err();
        assert!(matches!(err, UploadError::UnknownAsset));
    }

    #[tokio::test]
    async fn startup_scan_finds_existing_files() {
        let (manager, dir) = manager();
        let dated = dir.path().join("2026-01-01");
        std::fs::create_dir_all(&dated).unwrap();
        std::fs::write(dated.join("old.jpg"), b"previous").unwrap();
        // Staging leftovers must be ignored and removed.
        let stale_parts = dir.path().join(".parts").join("dead-asset");
        std::fs::create_dir_all(&stale_parts).unwrap();
        std::fs::write(stale_parts.join("000001"), b"junk").unwrap();

        manager.cleanup_stale_parts().await.unwrap();
        manager.scan_existing().await.unwrap();

        assert!(!stale_parts.exists());
        let history = manager.history(10).await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].name, "old.jpg");
        assert_eq!(history[0].directory, "2026-01-01");
        assert_eq!(history[0].size, 8);
    }
}
