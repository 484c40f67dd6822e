//! Standard Mario Kart Wii tracks and arenas
//!
//! Used as the template for first-touched slots in the conventional ranges
//! and as the source of fallback fill tracks.

use super::types::TrackType;

/// One original track or arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardTrack {
    /// Game id, equal to the conventional slot
    pub property: u32,
    /// Standard music id
    pub music: u32,
    pub name: &'static str,
}

const fn t(property: u32, music: u32, name: &'static str) -> StandardTrack {
    StandardTrack { property, music, name }
}

/// Original tracks and arenas, indexed by property id.
pub static STANDARD_TRACKS: [StandardTrack; 42] = [
    t(0x00, 0x7d, "Mario Circuit"),
    t(0x01, 0x77, "Moo Moo Meadows"),
    t(0x02, 0x79, "Mushroom Gorge"),
    t(0x03, 0x8b, "Grumble Volcano"),
    t(0x04, 0x7b, "Toad's Factory"),
    t(0x05, 0x7f, "Coconut Mall"),
    t(0x06, 0x81, "DK Summit"),
    t(0x07, 0x83, "Wario's Gold Mine"),
    t(0x08, 0x75, "Luigi Circuit"),
    t(0x09, 0x85, "Daisy Circuit"),
    t(0x0a, 0x8f, "Moonview Highway"),
    t(0x0b, 0x89, "Maple Treeway"),
    t(0x0c, 0x91, "Bowser's Castle"),
    t(0x0d, 0x93, "Rainbow Road"),
    t(0x0e, 0x8d, "Dry Dry Ruins"),
    t(0x0f, 0x87, "Koopa Cape"),
    t(0x10, 0x95, "GCN Peach Beach"),
    t(0x11, 0x97, "DS Yoshi Falls"),
    t(0x12, 0x99, "SNES Ghost Valley 2"),
    t(0x13, 0x9b, "N64 Mario Raceway"),
    t(0x14, 0x9d, "N64 Sherbet Land"),
    t(0x15, 0x9f, "GBA Shy Guy Beach"),
    t(0x16, 0xa1, "DS Delfino Square"),
    t(0x17, 0xa3, "GCN Waluigi Stadium"),
    t(0x18, 0xa5, "DS Desert Hills"),
    t(0x19, 0xa7, "GBA Bowser Castle 3"),
    t(0x1a, 0xa9, "N64 DK's Jungle Parkway"),
    t(0x1b, 0xab, "GCN Mario Circuit"),
    t(0x1c, 0xad, "SNES Mario Circuit 3"),
    t(0x1d, 0xaf, "DS Peach Gardens"),
    t(0x1e, 0xb1, "GCN DK Mountain"),
    t(0x1f, 0xb3, "N64 Bowser's Castle"),
    t(0x20, 0xb7, "Delfino Pier"),
    t(0x21, 0xb5, "Block Plaza"),
    t(0x22, 0xbb, "Chain Chomp Roulette"),
    t(0x23, 0xb9, "Funky Stadium"),
    t(0x24, 0xbd, "Thwomp Desert"),
    t(0x25, 0xc5, "GCN Cookie Land"),
    t(0x26, 0xc7, "DS Twilight House"),
    t(0x27, 0xbf, "SNES Battle Course 4"),
    t(0x28, 0xc1, "GBA Battle Course 3"),
    t(0x29, 0xc3, "N64 Skyscraper"),
];

/// Names of the random selector slots, in slot order.
pub static RANDOM_NAMES: [&str; 4] = [
    "Random: All Tracks",
    "Random: Original Tracks",
    "Random: Custom Tracks",
    "Random: New Tracks",
];

/// Nintendo cup layout of the race tracks.
pub static STANDARD_VERSUS_CUPS: [[u32; 4]; 8] = [
    [0x08, 0x01, 0x02, 0x04],
    [0x00, 0x05, 0x06, 0x07],
    [0x09, 0x0f, 0x0b, 0x03],
    [0x0e, 0x0a, 0x0c, 0x0d],
    [0x10, 0x11, 0x12, 0x13],
    [0x14, 0x15, 0x16, 0x17],
    [0x18, 0x19, 0x1a, 0x1b],
    [0x1c, 0x1d, 0x1e, 0x1f],
];

/// Nintendo cup layout of the battle arenas.
pub static STANDARD_BATTLE_CUPS: [[u32; 5]; 2] = [
    [0x21, 0x20, 0x23, 0x22, 0x24],
    [0x27, 0x28, 0x29, 0x25, 0x26],
];

/// Look up an original track or arena by property id
#[must_use]
pub fn standard_track(property: u32) -> Option<&'static StandardTrack> {
    STANDARD_TRACKS.get(property as usize)
}

/// Standard music id for `property`, 0 if it is not an original id
#[must_use]
pub fn standard_music(property: u32) -> u32 {
    standard_track(property).map_or(0, |t| t.music)
}

/// Type of an original property id
#[must_use]
pub fn standard_type(property: u32) -> Option<TrackType> {
    TrackType::for_standard_slot(property as usize)
}
