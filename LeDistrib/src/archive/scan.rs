//! Directory scanning: find track archives and checksum them
//!
//! Checksums are computed in parallel; the resulting list is ordered by path
//! so staging stays deterministic.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use sha1::{Digest, Sha1 as Sha1Hasher};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::track::{Sha1, TrackType};

use super::record::{ArchiveScan, SlotHints};

/// File extensions recognized as track archives
pub const TRACK_EXTENSIONS: [&str; 3] = ["szs", "wbz", "lex"];

/// Progress of a directory scan
#[derive(Debug, Clone)]
pub struct ScanProgress {
    pub current: usize,
    pub total: usize,
    pub file: String,
}

/// Find all track archives below `dir`, sorted by path
pub fn find_track_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::InvalidPath(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path.extension().is_some_and(|ext| {
                TRACK_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// SHA1 of a byte buffer
#[must_use]
pub fn sha1_of(data: &[u8]) -> Sha1 {
    let digest = Sha1Hasher::digest(data);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&digest);
    Sha1(bytes)
}

/// Read and checksum one archive
///
/// Archives are declared as race tracks; `[battle]` or `[arena]` in the file
/// name turns them into arenas when the record is built.
pub fn scan_file(path: &Path) -> Result<ArchiveScan> {
    let data = std::fs::read(path)?;
    Ok(ArchiveScan {
        path: path.to_path_buf(),
        track_type: TrackType::Versus,
        sha1: Some(sha1_of(&data)),
        hints: SlotHints::default(),
    })
}

/// Checksum every file in parallel, keeping the input order
///
/// Files that cannot be read are logged and skipped.
pub fn scan_files<F>(files: &[PathBuf], progress: F) -> Vec<ArchiveScan>
where
    F: Fn(&ScanProgress) + Send + Sync,
{
    let processed = AtomicUsize::new(0);
    let total = files.len();

    let scans: Vec<Option<ArchiveScan>> = files
        .par_iter()
        .map(|path| {
            let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(&ScanProgress {
                current,
                total,
                file: path.display().to_string(),
            });
            match scan_file(path) {
                Ok(scan) => Some(scan),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    scans.into_iter().flatten().collect()
}
