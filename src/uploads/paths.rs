// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 framedrop contributors

//! Filesystem layout of the upload tree.
//!
//! ```text
//! <root>/
//!   .parts/<asset_id>/NNNNNN     staged chunks, zero-padded part index
//!   <YYYY-MM-DD>/<name>          finalized files, date-bucketed
//! ```

use std::path::{Path, PathBuf};

/// Path utilities for staging and finalized uploads.
#[derive(Debug, Clone)]
pub struct UploadPaths {
    root: PathBuf,
}

impl UploadPaths {
    /// Create paths rooted at a custom directory (configurable; tests use a
    /// temp dir).
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Root directory of all uploads.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every asset's staging area.
    pub fn parts_root(&self) -> PathBuf {
        self.root.join(".parts")
    }

    /// Staging directory for one asset's chunks.
    pub fn asset_parts_dir(&self, asset_id: &str) -> PathBuf {
        self.parts_root().join(asset_id)
    }

    /// Staged file for one part. Zero-padded so a lexical directory listing
    /// is also index order.
    pub fn part_file(&self, asset_id: &str, part: u32) -> PathBuf {
        self.asset_parts_dir(asset_id).join(format!("{part:06}"))
    }

    /// Scratch file a part is streamed into before being renamed over the
    /// staged file. The nonce keeps concurrent retries of the same part from
    /// interleaving.
    pub fn part_scratch_file(&self, asset_id: &str, part: u32, nonce: &str) -> PathBuf {
        self.asset_parts_dir(asset_id)
            .join(format!("{part:06}.{nonce}.tmp"))
    }

    /// Date bucket for finalized files, e.g. `<root>/2026-08-28`.
    pub fn dated_dir(&self, date: &str) -> PathBuf {
        self.root.join(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_stable() {
        let paths = UploadPaths::new("/uploads");
        assert_eq!(paths.root(), Path::new("/uploads"));
        assert_eq!(paths.parts_root(), PathBuf::from("/uploads/.parts"));
        assert_eq!(
            paths.asset_parts_dir("a1"),
            PathBuf::from("/uploads/.parts/a1")
        );
        assert_eq!(
            paths.part_file("a1", 7),
            PathBuf::from("/uploads/.parts/a1/000007")
        );
        assert_eq!(
            paths.dated_dir("2026-08-28"),
            PathBuf::from("/uploads/2026-08-28")
        );
    }

    #[test]
    fn part_files_sort_in_index_order() {
        let paths = UploadPaths::new("/uploads");
        let early = paths.part_file("a1", 2);
        let late = paths.part_file("a1", 10);
        assert!(early.to_string_lossy() < late.to_string_lossy());
    }
}
