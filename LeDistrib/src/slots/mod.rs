//! Slot table: index-addressed storage of every track record
//!
//! Slot numbers are the only handle that survives a call into the table.
//! Storage grows in [`SLOT_GROW_STEP`] steps, so references into the table
//! must not be held across a `define*` call.

use crate::config::DistribConfig;
use crate::error::{Error, Result};
use crate::track::layout::{FIRST_CUSTOM_SLOT, MAX_SLOTS, SLOT_GROW_STEP};
use crate::track::standard::standard_track;
use crate::track::{Track, TrackStatus, TrackType};

/// Growable array of track records indexed by slot number
#[derive(Debug, Clone, Default)]
pub struct SlotTable {
    tracks: Vec<Track>,
    /// Logical length: one past the highest touched slot
    used: usize,
}

impl SlotTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical length of the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.used
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Number of slots with initialized storage
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.tracks.len()
    }

    /// A committed track, `None` for free or out-of-range slots
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Track> {
        self.tracks.get(slot).filter(|t| t.is_live())
    }

    /// Mutable access to a committed track
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Track> {
        self.tracks.get_mut(slot).filter(|t| t.is_live())
    }

    /// Any initialized slot, committed or not
    #[must_use]
    pub fn raw(&self, slot: usize) -> Option<&Track> {
        self.tracks
            .get(slot)
            .filter(|t| t.status != TrackStatus::Invalid)
    }

    /// Status of a slot, `Invalid` beyond the initialized storage
    #[must_use]
    pub fn status(&self, slot: usize) -> TrackStatus {
        self.tracks.get(slot).map_or(TrackStatus::Invalid, |t| t.status)
    }

    /// Committed tracks in ascending slot order
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks[..self.used].iter().filter(|t| t.is_live())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Track> {
        self.tracks[..self.used].iter_mut().filter(|t| t.is_live())
    }

    /// Define `slot`, initializing it on first touch
    ///
    /// A first-touched slot inside a conventional range is populated from the
    /// standard track table when `config` enables auto-setup for that range.
    /// With `mark_export` a free slot is promoted to `Export`; an already
    /// committed slot is returned unchanged.
    pub fn define(
        &mut self,
        slot: usize,
        mark_export: bool,
        config: &DistribConfig,
    ) -> Result<&mut Track> {
        if slot >= MAX_SLOTS {
            return Err(Error::SlotOutOfRange {
                slot,
                max: MAX_SLOTS,
            });
        }
        self.ensure_storage(slot);
        if self.used <= slot {
            self.used = slot + 1;
        }

        let track = &mut self.tracks[slot];
        if track.status == TrackStatus::Invalid {
            *track = Track::new(slot);
            if let Some(track_type) = TrackType::for_standard_slot(slot) {
                if config.auto_setup_for(track_type) {
                    match track_type {
                        TrackType::Random => track.apply_random(),
                        _ => {
                            if let Some(standard) = standard_track(slot as u32) {
                                track.apply_standard(track_type, standard);
                            }
                        }
                    }
                }
            }
        }
        if mark_export && track.status < TrackStatus::Active {
            track.status = TrackStatus::Export;
        }
        Ok(track)
    }

    /// Define the first free slot for `track_type`
    ///
    /// The conventional range of the type is searched first, then the
    /// extension range.
    pub fn define_free(
        &mut self,
        track_type: TrackType,
        mark_export: bool,
        config: &DistribConfig,
    ) -> Result<&mut Track> {
        let slot = track_type
            .standard_slots()
            .chain(FIRST_CUSTOM_SLOT..MAX_SLOTS)
            .find(|&s| !self.status(s).is_live())
            .ok_or(Error::NoFreeSlot { track_type })?;
        self.define(slot, mark_export, config)
    }

    /// Define the first slot beyond the packed high-water mark
    ///
    /// Every slot after the returned one is free, so a randomization group can
    /// be laid out contiguously behind its head.
    pub fn define_group(
        &mut self,
        track_type: TrackType,
        mark_export: bool,
        config: &DistribConfig,
    ) -> Result<&mut Track> {
        let slot = self.high_water();
        if slot >= MAX_SLOTS {
            return Err(Error::NoFreeSlot { track_type });
        }
        self.define(slot, mark_export, config)
    }

    /// Define `count` adjacent free slots inside the conventional range
    pub fn reserve_run(
        &mut self,
        track_type: TrackType,
        count: usize,
        mark_export: bool,
        config: &DistribConfig,
    ) -> Result<&mut [Track]> {
        let range = track_type.standard_slots();
        let start = (range.start..range.end.saturating_sub(count.saturating_sub(1)))
            .find(|&s| (s..s + count).all(|i| !self.status(i).is_live()))
            .filter(|_| count > 0)
            .ok_or(Error::NoFreeRun { track_type, count })?;

        for slot in start..start + count {
            self.define(slot, mark_export, config)?;
        }
        Ok(&mut self.tracks[start..start + count])
    }

    /// One past the highest committed slot of the extension range
    #[must_use]
    pub fn high_water(&self) -> usize {
        (FIRST_CUSTOM_SLOT..self.used)
            .rev()
            .find(|&s| self.tracks[s].is_live())
            .map_or(FIRST_CUSTOM_SLOT, |s| s + 1)
    }

    /// Return a slot to the `Valid` state
    pub fn clear(&mut self, slot: usize) {
        if let Some(track) = self.tracks.get_mut(slot) {
            if track.status != TrackStatus::Invalid {
                track.clear();
            }
        }
    }

    /// Trim trailing uncommitted slots of the extension range
    ///
    /// Returns the new logical length; calling it twice yields the same value.
    pub fn pack(&mut self) -> usize {
        let mut len = self.used;
        while len > FIRST_CUSTOM_SLOT && !self.tracks[len - 1].is_live() {
            self.clear(len - 1);
            len -= 1;
        }
        if len != self.used {
            tracing::debug!("Packed slot table: {} -> {} slots", self.used, len);
        }
        self.used = len;
        len
    }

    /// Fail every committed track whose property does not match its type
    ///
    /// Followed by [`SlotTable::pack`]. Returns the number of failed tracks.
    pub fn check(&mut self) -> usize {
        let mut failed = 0;
        for track in self.iter_mut() {
            if !track.track_type.is_valid_property(track.property) {
                tracing::warn!(
                    "Slot {:#05x}: property {:#04x} is not a valid {} id",
                    track.slot,
                    track.property,
                    track.track_type
                );
                track.status = TrackStatus::Fail;
                failed += 1;
            }
        }
        self.pack();
        failed
    }

    fn ensure_storage(&mut self, slot: usize) {
        if slot < self.tracks.len() {
            return;
        }
        let new_len = (slot / SLOT_GROW_STEP + 1) * SLOT_GROW_STEP;
        let new_len = new_len.min(MAX_SLOTS);
        let start = self.tracks.len();
        self.tracks.reserve_exact(new_len - start);
        self.tracks.extend((start..new_len).map(Track::invalid));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::layout::VERSUS_SLOTS;
    use pretty_assertions::assert_eq;

    fn config() -> DistribConfig {
        DistribConfig::default()
    }

    #[test]
    fn test_define_is_idempotent() {
        let mut table = SlotTable::new();
        table.define(0x50, true, &config()).unwrap().name = "First".into();
        let again = table.define(0x50, true, &config()).unwrap();
        assert_eq!(again.slot, 0x50);
        assert_eq!(again.name, "First");
        assert_eq!(table.len(), 0x51);
    }

    #[test]
    fn test_define_grows_in_steps() {
        let mut table = SlotTable::new();
        table.define(3, false, &config()).unwrap();
        assert_eq!(table.capacity(), SLOT_GROW_STEP);
        table.define(SLOT_GROW_STEP, false, &config()).unwrap();
        assert_eq!(table.capacity(), 2 * SLOT_GROW_STEP);
    }

    #[test]
    fn test_define_out_of_range() {
        let mut table = SlotTable::new();
        assert!(matches!(
            table.define(MAX_SLOTS, true, &config()),
            Err(Error::SlotOutOfRange { .. })
        ));
        assert!(table.get(MAX_SLOTS).is_none());
    }

    #[test]
    fn test_define_without_export_stays_free() {
        let mut table = SlotTable::new();
        table.define(0x60, false, &config()).unwrap();
        assert_eq!(table.status(0x60), TrackStatus::Valid);
        assert!(table.get(0x60).is_none());
        assert!(table.raw(0x60).is_some());
    }

    #[test]
    fn test_auto_setup_applies_template() {
        let mut table = SlotTable::new();
        let config = DistribConfig {
            auto_setup: vec![TrackType::Battle],
            ..DistribConfig::default()
        };
        let arena = table.define(0x21, true, &config).unwrap();
        assert_eq!(arena.name, "Block Plaza");
        assert_eq!(arena.track_type, TrackType::Battle);

        let track = table.define(0x08, true, &config).unwrap();
        assert!(track.name.is_empty());
    }

    #[test]
    fn test_define_free_prefers_standard_range() {
        let mut table = SlotTable::new();
        for slot in VERSUS_SLOTS {
            table.define(slot, true, &config()).unwrap();
        }
        let battle = table.define_free(TrackType::Battle, true, &config()).unwrap();
        assert_eq!(battle.slot, 0x20);
        let versus = table.define_free(TrackType::Versus, true, &config()).unwrap();
        assert_eq!(versus.slot, FIRST_CUSTOM_SLOT);
    }

    #[test]
    fn test_define_group_goes_past_high_water() {
        let mut table = SlotTable::new();
        table.define(0x50, true, &config()).unwrap();
        let head = table.define_group(TrackType::Versus, true, &config()).unwrap();
        assert_eq!(head.slot, 0x51);
        let free = table.define_free(TrackType::Versus, true, &config()).unwrap();
        assert_eq!(free.slot, 0x00);
    }

    #[test]
    fn test_reserve_run() {
        let mut table = SlotTable::new();
        table.define(0x02, true, &config()).unwrap();
        let run = table.reserve_run(TrackType::Versus, 4, true, &config()).unwrap();
        let slots: Vec<usize> = run.iter().map(|t| t.slot).collect();
        assert_eq!(slots, vec![3, 4, 5, 6]);
        assert!(table.reserve_run(TrackType::Battle, 11, true, &config()).is_err());
    }

    #[test]
    fn test_pack_trims_trailing_and_is_idempotent() {
        let mut table = SlotTable::new();
        table.define(0x50, true, &config()).unwrap();
        table.define(0x58, false, &config()).unwrap();
        assert_eq!(table.len(), 0x59);
        assert_eq!(table.pack(), 0x51);
        assert_eq!(table.pack(), 0x51);
        assert_eq!(table.status(0x58), TrackStatus::Valid);
    }

    #[test]
    fn test_pack_stops_at_extension_start() {
        let mut table = SlotTable::new();
        table.define(0x10, false, &config()).unwrap();
        assert_eq!(table.pack(), 0x11);
    }

    #[test]
    fn test_check_fails_bad_property() {
        let mut table = SlotTable::new();
        let track = table.define(0x60, true, &config()).unwrap();
        track.track_type = TrackType::Versus;
        track.property = 0x25;
        let good = table.define(0x50, true, &config()).unwrap();
        good.property = 0x03;

        assert_eq!(table.check(), 1);
        assert!(table.get(0x60).is_none());
        assert_eq!(table.len(), 0x51);
    }
}
