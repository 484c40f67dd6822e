//! Distribution options (ledistrib.toml)
//!
//! The options are passed explicitly into [`crate::Distribution::new`] and from
//! there into every slot definition; nothing here is process-global.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cups::CupType;
use crate::error::Result;
use crate::track::TrackType;

fn default_true() -> bool {
    true
}

/// Options that influence how slots are populated and cups are repaired
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistribConfig {
    /// Track types whose conventional slots are pre-populated with the
    /// original game tracks on first touch
    #[serde(default)]
    pub auto_setup: Vec<TrackType>,
    /// Append committed race tracks that no cup references
    #[serde(default = "default_true")]
    pub append_unused_versus: bool,
    /// Append committed arenas that no cup references
    #[serde(default = "default_true")]
    pub append_unused_battle: bool,
    /// Keep authored cup boundaries: skip cup packing, only even out
    #[serde(default)]
    pub keep_cups: bool,
}

impl Default for DistribConfig {
    fn default() -> Self {
        Self {
            auto_setup: Vec::new(),
            append_unused_versus: true,
            append_unused_battle: true,
            keep_cups: false,
        }
    }
}

impl DistribConfig {
    /// Configuration with auto-setup enabled for every standard range
    #[must_use]
    pub fn standard() -> Self {
        Self {
            auto_setup: vec![TrackType::Versus, TrackType::Battle, TrackType::Random],
            ..Self::default()
        }
    }

    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading distribution config: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    #[must_use]
    pub fn auto_setup_for(&self, track_type: TrackType) -> bool {
        self.auto_setup.contains(&track_type)
    }

    #[must_use]
    pub fn append_unused(&self, cup_type: CupType) -> bool {
        match cup_type {
            CupType::Versus => self.append_unused_versus,
            CupType::Battle => self.append_unused_battle,
        }
    }
}
