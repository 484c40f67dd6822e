//! Type definitions shared by every track record

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::cups::CupType;
use crate::error::{Error, Result};

use super::layout::{BATTLE_SLOTS, RANDOM_SLOTS, VERSUS_SLOTS};

/// Kind of track a slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    /// Race track
    #[default]
    Versus,
    /// Battle arena
    Battle,
    /// Random selector, placed in race cups
    Random,
}

impl TrackType {
    /// Conventional slot range of this type
    #[must_use]
    pub fn standard_slots(self) -> Range<usize> {
        match self {
            Self::Versus => VERSUS_SLOTS,
            Self::Battle => BATTLE_SLOTS,
            Self::Random => RANDOM_SLOTS,
        }
    }

    /// Whether `property` names a game track of this type
    #[must_use]
    pub fn is_valid_property(self, property: u32) -> bool {
        let range = self.standard_slots();
        (range.start as u32..range.end as u32).contains(&property)
    }

    /// The cup table that may reference tracks of this type
    #[must_use]
    pub fn cup_type(self) -> CupType {
        match self {
            Self::Versus | Self::Random => CupType::Versus,
            Self::Battle => CupType::Battle,
        }
    }

    /// Type whose conventional range contains `slot`
    #[must_use]
    pub fn for_standard_slot(slot: usize) -> Option<Self> {
        [Self::Versus, Self::Battle, Self::Random]
            .into_iter()
            .find(|t| t.standard_slots().contains(&slot))
    }

    /// Single-letter tag used in text formats and group keys
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            Self::Versus => 'V',
            Self::Battle => 'B',
            Self::Random => 'R',
        }
    }

    /// Parse a single-letter tag (case-insensitive)
    #[must_use]
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag.to_ascii_uppercase() {
            'V' => Some(Self::Versus),
            'B' => Some(Self::Battle),
            'R' => Some(Self::Random),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Versus => "versus",
            Self::Battle => "battle",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a slot
///
/// The ordering is significant: everything at or above [`TrackStatus::Active`]
/// is a committed track that cups may reference, everything below is free
/// storage that packing may reclaim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum TrackStatus {
    /// Never touched
    #[default]
    Invalid = 0,
    /// Initialized, no committed track
    Valid,
    /// Rejected by a property check
    Fail,
    /// Committed, not selected for export
    Active,
    /// Engine-synthesized placeholder for incomplete cups
    Fill,
    /// Committed and selected for export
    Export,
}

impl TrackStatus {
    /// Committed track that cups may reference
    #[must_use]
    pub fn is_live(self) -> bool {
        self >= Self::Active
    }
}

bitflags! {
    /// Per-track flag bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct TrackFlags: u8 {
        /// Track is new in this distribution
        const NEW = 0x01;
        /// Visible head of a randomization group
        const RANDOM_HEAD = 0x02;
        /// Member of a randomization group
        const RANDOM_GROUP = 0x04;
        /// Slot aliases another slot
        const ALIAS = 0x08;
        /// Group member without its own cup entry, derived during archive commit
        const HIDDEN = 0x10;
    }
}

impl TrackFlags {
    /// Letters used in text formats, `-` for an unset bit
    #[must_use]
    pub fn to_letters(self) -> String {
        [
            (Self::NEW, 'N'),
            (Self::RANDOM_HEAD, 'H'),
            (Self::RANDOM_GROUP, 'G'),
            (Self::ALIAS, 'A'),
            (Self::HIDDEN, 'x'),
        ]
        .iter()
        .map(|&(flag, c)| if self.contains(flag) { c } else { '-' })
        .collect()
    }

    /// Inverse of [`TrackFlags::to_letters`]; unknown letters and `-` are ignored
    #[must_use]
    pub fn from_letters(letters: &str) -> Self {
        letters.chars().fold(Self::empty(), |acc, c| {
            acc | match c {
                'N' | 'n' => Self::NEW,
                'H' | 'h' => Self::RANDOM_HEAD,
                'G' | 'g' => Self::RANDOM_GROUP,
                'A' | 'a' => Self::ALIAS,
                'x' | 'X' => Self::HIDDEN,
                _ => Self::empty(),
            }
        })
    }
}

/// A SHA1 track checksum
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha1(pub [u8; 20]);

impl Sha1 {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Sha1 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 40 {
            return Err(Error::InvalidSha1(s.to_string()));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for Sha1 {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Sha1> for String {
    fn from(value: Sha1) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1({self})")
    }
}
