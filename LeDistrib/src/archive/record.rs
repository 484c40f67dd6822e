//! Staged records produced while scanning track archives

use std::cmp::Ordering;
use std::path::PathBuf;

use crate::track::layout::{FALLBACK_BATTLE_PROPERTY, FALLBACK_VERSUS_PROPERTY};
use crate::track::standard::standard_music;
use crate::track::{Sha1, Track, TrackFlags, TrackStatus, TrackType};

use super::name::NameParts;

/// Slot information read from a track archive by the scanner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotHints {
    /// Explicit property id
    pub property: Option<u32>,
    /// Explicit music id
    pub music: Option<u32>,
    /// Race slot the track was designed for
    pub race_slot: Option<u32>,
    /// Arena slot the arena was designed for
    pub arena_slot: Option<u32>,
}

/// Everything the archive scanner reports about one file
#[derive(Debug, Clone, Default)]
pub struct ArchiveScan {
    pub path: PathBuf,
    /// Type declared by the archive's game data
    pub track_type: TrackType,
    pub sha1: Option<Sha1>,
    pub hints: SlotHints,
}

/// A track waiting to be committed, plus its ordering keys
#[derive(Debug, Clone)]
pub struct ArchiveRecord {
    pub track: Track,
    pub attr_order: i32,
    pub plus_order: u32,
    pub game_order: u32,
    pub name_order: String,
    /// Randomization group key
    pub group: Option<String>,
    /// Position in the staging list, assigned when staged
    pub(crate) index: usize,
}

impl ArchiveRecord {
    /// Build a record from a scanner report and the decomposed file name
    #[must_use]
    pub fn from_scan(scan: &ArchiveScan) -> Self {
        let parts = NameParts::parse(&scan.path.to_string_lossy());
        Self::from_parts(scan.track_type, &parts, scan.hints, scan.sha1)
    }

    #[must_use]
    pub fn from_parts(
        declared_type: TrackType,
        parts: &NameParts,
        hints: SlotHints,
        sha1: Option<Sha1>,
    ) -> Self {
        let track_type = if parts.has_attribute("battle") || parts.has_attribute("arena") {
            TrackType::Battle
        } else if parts.has_attribute("versus") || parts.has_attribute("race") {
            TrackType::Versus
        } else {
            declared_type
        };

        let property = hints
            .property
            .unwrap_or_else(|| default_property(track_type, hints));
        let music = hints.music.unwrap_or_else(|| standard_music(property));

        let mut track = Track {
            track_type,
            status: TrackStatus::Export,
            property,
            music,
            sha1,
            file: if parts.extension.is_empty() {
                parts.stem.clone()
            } else {
                format!("{}.{}", parts.stem, parts.extension)
            },
            name: parts.name.clone(),
            ident: sha1.map_or_else(|| parts.stem.clone(), |s| s.to_string()),
            ..Track::default()
        };
        let display = parts.display_name();
        if display != parts.name {
            track.xname = display;
        }
        for (key, value) in [
            ("authors", &parts.authors),
            ("editors", &parts.editors),
            ("version", &parts.version),
            ("extra", &parts.extra),
        ] {
            if !value.is_empty() {
                track.strings.insert(key.to_string(), value.clone());
            }
        }
        if !parts.attributes.is_empty() {
            track
                .strings
                .insert("attributes".to_string(), parts.attributes.join(","));
        }

        let mut group = None;
        if let Some(key) = parts.attribute("head") {
            track.flags |= TrackFlags::RANDOM_HEAD;
            group = Some(key.to_string());
        }
        if let Some(key) = parts.attribute("grp") {
            track.flags |= TrackFlags::RANDOM_GROUP;
            group = Some(key.to_string());
        } else if parts.has_attribute("grp") {
            track.flags |= TrackFlags::RANDOM_GROUP;
            group.get_or_insert_with(|| parts.name.clone());
        }
        if parts.has_attribute("new") {
            track.flags |= TrackFlags::NEW;
        }
        if let Some(laps) = parts.attribute("laps").and_then(|v| v.parse().ok()) {
            track.laps = laps;
        }
        if let Some(speed) = parts.attribute("speed").and_then(|v| v.parse().ok()) {
            track.speed = speed;
        }

        Self {
            track,
            attr_order: parts
                .attribute("order")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            plus_order: parts.plus_order(),
            game_order: parts.game_order(),
            name_order: parts.name.clone(),
            group,
            index: 0,
        }
    }

    /// Commit order: race before battle, then attribute order, plus prefix,
    /// case-insensitive name, game prefix and finally staging position
    #[must_use]
    pub fn commit_order(&self, other: &Self) -> Ordering {
        self.track
            .track_type
            .cup_type()
            .cmp(&other.track.track_type.cup_type())
            .then(self.attr_order.cmp(&other.attr_order))
            .then(self.plus_order.cmp(&other.plus_order))
            .then_with(|| cmp_ignore_case(&self.name_order, &other.name_order))
            .then(self.game_order.cmp(&other.game_order))
            .then(self.index.cmp(&other.index))
    }
}

/// Property derived from the slot hints when none is given explicitly
fn default_property(track_type: TrackType, hints: SlotHints) -> u32 {
    match track_type {
        TrackType::Battle => hints
            .arena_slot
            .map_or(FALLBACK_BATTLE_PROPERTY, |s| 0x20 + s % 10),
        TrackType::Versus | TrackType::Random => hints
            .race_slot
            .map_or(FALLBACK_VERSUS_PROPERTY, |s| s % 32),
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> ArchiveRecord {
        ArchiveRecord::from_parts(
            TrackType::Versus,
            &NameParts::parse(name),
            SlotHints::default(),
            None,
        )
    }

    #[test]
    fn test_attributes() {
        let r = record("Koopa Park v1.1 (Someone) [head=KP,order=7,new,laps=5].szs");
        assert_eq!(r.group.as_deref(), Some("KP"));
        assert!(r.track.flags.contains(TrackFlags::RANDOM_HEAD | TrackFlags::NEW));
        assert_eq!(r.attr_order, 7);
        assert_eq!(r.track.laps, 5);
        assert_eq!(r.track.file, "Koopa Park v1.1 (Someone) [head=KP,order=7,new,laps=5].szs");
        assert_eq!(r.track.xname, "Koopa Park v1.1");
        assert_eq!(r.track.strings.get("authors").map(String::as_str), Some("Someone"));
    }

    #[test]
    fn test_bare_grp_uses_name_as_key() {
        let r = record("Big Donut [grp].szs");
        assert_eq!(r.group.as_deref(), Some("Big Donut"));
        assert!(r.track.flags.contains(TrackFlags::RANDOM_GROUP));
    }

    #[test]
    fn test_property_fallbacks() {
        let hints = SlotHints {
            race_slot: Some(0x25),
            ..SlotHints::default()
        };
        let r = ArchiveRecord::from_parts(TrackType::Versus, &NameParts::parse("A.szs"), hints, None);
        assert_eq!(r.track.property, 0x05);
        assert_eq!(r.track.music, standard_music(0x05));

        let hints = SlotHints {
            arena_slot: Some(13),
            music: Some(0xc0),
            ..SlotHints::default()
        };
        let r = ArchiveRecord::from_parts(TrackType::Versus, &NameParts::parse("B [arena].szs"), hints, None);
        assert_eq!(r.track.track_type, TrackType::Battle);
        assert_eq!(r.track.property, 0x23);
        assert_eq!(r.track.music, 0xc0);
    }

    #[test]
    fn test_commit_order_keys() {
        let mut a = record("+Zeta.szs");
        let mut b = record("alpha.szs");
        a.index = 0;
        b.index = 1;
        assert_eq!(a.commit_order(&b), Ordering::Greater);

        let mut c = record("Alpha.szs");
        c.index = 2;
        assert_eq!(b.commit_order(&c), Ordering::Less);

        let mut battle = record("Aaa [battle].szs");
        battle.index = 3;
        assert_eq!(battle.commit_order(&a), Ordering::Greater);
    }
}
