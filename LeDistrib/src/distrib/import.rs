//! Generic record written by every codec

use crate::track::{TrackField, TrackFlags, TrackType};

/// One pre-parsed track as handed over by a codec
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportRecord {
    pub slot: usize,
    pub track_type: TrackType,
    pub property: u32,
    pub music: u32,
    pub flags: TrackFlags,
    /// Randomization group id, 0 for none
    pub group: u32,
    /// Promote the slot to `Export` instead of `Active`
    pub mark_export: bool,
    pub fields: Vec<TrackField>,
}

impl ImportRecord {
    #[must_use]
    pub fn new(slot: usize, track_type: TrackType, property: u32, music: u32) -> Self {
        Self {
            slot,
            track_type,
            property,
            music,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: TrackFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: TrackField) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn exported(mut self) -> Self {
        self.mark_export = true;
        self
    }
}
