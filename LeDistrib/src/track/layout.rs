//! Conventional LE-CODE slot layout
//!
//! Slots below [`FIRST_CUSTOM_SLOT`] mirror the original game: 32 race tracks,
//! 10 battle arenas, a block of special slots and the four random selectors.
//! Everything from [`FIRST_CUSTOM_SLOT`] up to [`MAX_SLOTS`] is the extension
//! range used for custom tracks.

use std::ops::Range;

/// Number of addressable slots.
pub const MAX_SLOTS: usize = 0x1000;

/// First slot of the extension range, also the minimum packed table length.
pub const FIRST_CUSTOM_SLOT: usize = 0x44;

/// Original race tracks.
pub const VERSUS_SLOTS: Range<usize> = 0x00..0x20;

/// Original battle arenas.
pub const BATTLE_SLOTS: Range<usize> = 0x20..0x2a;

/// Special slots (menus, award scenes, ...), never handed out automatically.
pub const RESERVED_SLOTS: Range<usize> = 0x2a..0x3f;

/// Random selector slots: all, original, custom and new tracks.
pub const RANDOM_SLOTS: Range<usize> = 0x3f..0x43;

/// Capacity step of the slot table.
pub const SLOT_GROW_STEP: usize = 0x100;

/// Fallback property used when a versus fill track has to be synthesized.
pub const FALLBACK_VERSUS_PROPERTY: u32 = 0x08;

/// Fallback property used when a battle fill track has to be synthesized.
pub const FALLBACK_BATTLE_PROPERTY: u32 = 0x21;

/// Whether `slot` is inside the extension range.
#[must_use]
pub fn is_custom_slot(slot: usize) -> bool {
    (FIRST_CUSTOM_SLOT..MAX_SLOTS).contains(&slot)
}
