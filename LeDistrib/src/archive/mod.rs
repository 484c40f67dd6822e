//! Archive merge: stage tracks found in external files, then commit them
//!
//! # Usage
//!
//! ```
//! use ledistrib::archive::{ArchiveRecord, ArchiveScan};
//! use ledistrib::{DistribConfig, Distribution};
//!
//! let mut distrib = Distribution::new(DistribConfig::default());
//! distrib.import_archive_record(ArchiveRecord::from_scan(&ArchiveScan {
//!     path: "tracks/GCN Rainbow Road v2.0 [head=RR].szs".into(),
//!     ..ArchiveScan::default()
//! }));
//! distrib.import_archive_record(ArchiveRecord::from_scan(&ArchiveScan {
//!     path: "tracks/Rainbow Road Night [grp=RR].szs".into(),
//!     ..ArchiveScan::default()
//! }));
//! let stats = distrib.commit_archive()?;
//! assert_eq!(stats.committed, 2);
//! # Ok::<(), ledistrib::Error>(())
//! ```

mod merge;
mod name;
mod record;
mod scan;

pub use merge::{ArchiveStage, CommitStats};
pub use name::{GAME_PREFIXES, NameParts};
pub use record::{ArchiveRecord, ArchiveScan, SlotHints};
pub use scan::{ScanProgress, TRACK_EXTENSIONS, find_track_files, scan_file, scan_files, sha1_of};
