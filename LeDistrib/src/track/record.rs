//! The per-slot track record

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::layout::{FIRST_CUSTOM_SLOT, RANDOM_SLOTS};
use super::standard::{RANDOM_NAMES, StandardTrack};
use super::types::{Sha1, TrackFlags, TrackStatus, TrackType};

/// One slot's data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Slot number, equal to the storage index
    pub slot: usize,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    pub status: TrackStatus,
    /// Game track or arena id the slot is based on
    pub property: u32,
    /// Music id
    pub music: u32,
    #[serde(default)]
    pub flags: TrackFlags,
    /// Lap count, 0 for the game default
    #[serde(default)]
    pub laps: u8,
    /// Speed factor, 0.0 for the game default
    #[serde(default)]
    pub speed: f32,
    /// Target of an alias slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<usize>,
    /// Randomization group id, 0 if none
    #[serde(default)]
    pub group: u32,
    /// Display cup position (`10 * cup + column + 11`), 0 until assigned
    #[serde(default)]
    pub cup_slot: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<Sha1>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1_d: Option<Sha1>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ident: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ident_d: String,
    /// Source file name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_d: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name_d: String,
    /// Extended display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub xname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub xname_d: String,
    /// Free-form keyed strings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub strings: IndexMap<String, String>,

    /// Referenced by a cup during the current consistency pass
    #[serde(skip)]
    pub(crate) used: bool,
}

/// A single value an importer writes into a track
#[derive(Debug, Clone, PartialEq)]
pub enum TrackField {
    Sha1(Sha1),
    Sha1D(Sha1),
    Ident(String),
    IdentD(String),
    File(String),
    FileD(String),
    Name(String),
    NameD(String),
    XName(String),
    XNameD(String),
    Laps(u8),
    Speed(f32),
    /// Alias target slot, also sets [`TrackFlags::ALIAS`]
    Alias(usize),
    Custom { key: String, value: String },
}

impl Track {
    /// A cleared slot in the `Valid` state
    #[must_use]
    pub fn new(slot: usize) -> Self {
        Self {
            slot,
            status: TrackStatus::Valid,
            ..Default::default()
        }
    }

    /// An untouched slot
    #[must_use]
    pub(crate) fn invalid(slot: usize) -> Self {
        Self {
            slot,
            ..Default::default()
        }
    }

    /// Reset to `Valid`, keeping only the slot number
    pub fn clear(&mut self) {
        *self = Self::new(self.slot);
    }

    #[must_use]
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.status >= TrackStatus::Export
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.flags.contains(TrackFlags::HIDDEN)
    }

    #[must_use]
    pub fn is_group_head(&self) -> bool {
        self.flags.contains(TrackFlags::RANDOM_HEAD)
    }

    /// Original game track sitting in its own conventional slot
    #[must_use]
    pub fn is_original(&self) -> bool {
        self.slot < FIRST_CUSTOM_SLOT && self.property as usize == self.slot
    }

    /// Best name available for display
    #[must_use]
    pub fn display_name(&self) -> &str {
        [&self.xname, &self.name, &self.ident, &self.file]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or("", String::as_str)
    }

    /// Populate type, ids and names from an original track
    pub fn apply_standard(&mut self, track_type: TrackType, standard: &StandardTrack) {
        self.track_type = track_type;
        self.property = standard.property;
        self.music = standard.music;
        self.name = standard.name.to_string();
        self.ident = format!("std:{:02x}", standard.property);
    }

    /// Populate a random selector slot
    pub(crate) fn apply_random(&mut self) {
        let index = self.slot - RANDOM_SLOTS.start;
        self.track_type = TrackType::Random;
        self.property = self.slot as u32;
        self.music = 0;
        self.name = RANDOM_NAMES[index].to_string();
        self.ident = format!("std:{:02x}", self.slot);
    }

    /// Write one importer-provided value
    pub fn set_field(&mut self, field: TrackField) {
        match field {
            TrackField::Sha1(v) => self.sha1 = Some(v),
            TrackField::Sha1D(v) => self.sha1_d = Some(v),
            TrackField::Ident(v) => self.ident = v,
            TrackField::IdentD(v) => self.ident_d = v,
            TrackField::File(v) => self.file = v,
            TrackField::FileD(v) => self.file_d = v,
            TrackField::Name(v) => self.name = v,
            TrackField::NameD(v) => self.name_d = v,
            TrackField::XName(v) => self.xname = v,
            TrackField::XNameD(v) => self.xname_d = v,
            TrackField::Laps(v) => self.laps = v,
            TrackField::Speed(v) => self.speed = v,
            TrackField::Alias(target) => {
                self.alias = Some(target);
                self.flags |= TrackFlags::ALIAS;
            }
            TrackField::Custom { key, value } => {
                self.strings.insert(key, value);
            }
        }
    }

    /// Copy everything an importer or the archive merge staged, keeping `slot`
    pub(crate) fn copy_payload_from(&mut self, other: &Track) {
        let slot = self.slot;
        *self = other.clone();
        self.slot = slot;
        self.cup_slot = 0;
        self.used = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::standard::standard_track;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_is_valid() {
        let track = Track::new(0x50);
        assert_eq!(track.status, TrackStatus::Valid);
        assert!(!track.is_live());
    }

    #[test]
    fn test_apply_standard() {
        let mut track = Track::new(0x08);
        track.apply_standard(TrackType::Versus, standard_track(0x08).unwrap());
        assert_eq!(track.name, "Luigi Circuit");
        assert_eq!(track.ident, "std:08");
        assert!(track.is_original());
    }

    #[test]
    fn test_set_fields() {
        let mut track = Track::new(0x50);
        track.set_field(TrackField::Name("Six King Labyrinth".into()));
        track.set_field(TrackField::Alias(0x51));
        track.set_field(TrackField::Custom {
            key: "author".into(),
            value: "Wiimm".into(),
        });
        assert_eq!(track.display_name(), "Six King Labyrinth");
        assert!(track.flags.contains(TrackFlags::ALIAS));
        assert_eq!(track.strings.get("author").map(String::as_str), Some("Wiimm"));

        track.set_field(TrackField::XName("Six King Labyrinth (v2)".into()));
        assert_eq!(track.display_name(), "Six King Labyrinth (v2)");
    }

    #[test]
    fn test_clear_keeps_slot() {
        let mut track = Track::new(0x60);
        track.status = TrackStatus::Export;
        track.name = "Test".into();
        track.clear();
        assert_eq!(track, Track::new(0x60));
    }

    #[test]
    fn test_copy_payload_keeps_slot() {
        let mut staged = Track::new(0);
        staged.name = "Staged".into();
        staged.cup_slot = 11;
        let mut target = Track::new(0x70);
        target.copy_payload_from(&staged);
        assert_eq!(target.slot, 0x70);
        assert_eq!(target.name, "Staged");
        assert_eq!(target.cup_slot, 0);
    }
}
