//! # LeDistrib
//!
//! An LE-CODE distribution engine for Mario Kart Wii track packs.
//!
//! A distribution is a table of up to 4096 track slots plus two cup tables
//! (race cups of 4, battle cups of 5). Tracks are imported from text and JSON
//! listings or merged in from scanned track archives; the engine keeps the
//! cups consistent with the slots and serializes the result again.
//!
//! ## Components
//!
//! - **Slot table** - slot allocation, standard-track templates, checking and packing
//! - **Cup tables** - cup rows and the consistency pass that repairs them
//! - **Archive merge** - staging, randomization groups and commit ordering
//! - **Codecs** - JSON, track list, SHA1 list and cup list formats
//!
//! ## Quick Start
//!
//! ```
//! use ledistrib::prelude::*;
//!
//! let mut distrib = Distribution::new(DistribConfig::standard());
//! distrib.setup_standard_cups(CupType::Versus)?;
//! distrib.import_record(
//!     ImportRecord::new(0x44, TrackType::Versus, 0x08, 0x75)
//!         .exported()
//!         .with_field(TrackField::Name("Lava Lake".into())),
//! )?;
//!
//! let cups = Format::CupList.export(&mut distrib)?;
//! assert!(String::from_utf8_lossy(&cups).contains("Lava Lake"));
//! # Ok::<(), ledistrib::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `ledistrib` command-line binary

pub mod archive;
pub mod codec;
pub mod config;
pub mod cups;
pub mod distrib;
pub mod error;
pub mod slots;
pub mod track;

// Re-exports for convenience
pub use config::DistribConfig;
pub use distrib::{DistribStats, Distribution, ImportRecord};
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::archive::{ArchiveRecord, ArchiveScan, CommitStats, NameParts, SlotHints};
    pub use crate::codec::{Codec, Format};
    pub use crate::config::DistribConfig;
    pub use crate::cups::{CupTable, CupType, CupUpdate, SlotRef};
    pub use crate::distrib::{DistribStats, Distribution, ImportRecord};
    pub use crate::error::{Error, Result};
    pub use crate::slots::SlotTable;
    pub use crate::track::{Sha1, Track, TrackField, TrackFlags, TrackStatus, TrackType};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
