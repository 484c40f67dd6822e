//! The distribution: one slot table, two cup tables and the archive stage
//!
//! [`Distribution`] is the only entry point codecs use. Every mutation that
//! can change cup membership marks both cup tables dirty; queries that need a
//! consistent view run the cup consistency pass first.

mod import;

pub use import::ImportRecord;

use serde::Serialize;

use crate::archive::{ArchiveRecord, ArchiveStage, CommitStats};
use crate::config::DistribConfig;
use crate::cups::{self, CupTable, CupType, CupUpdate, SlotRef};
use crate::error::{Error, Result};
use crate::slots::SlotTable;
use crate::track::standard::{STANDARD_BATTLE_CUPS, STANDARD_VERSUS_CUPS, standard_track};
use crate::track::{Track, TrackStatus, TrackType};

/// Counters reported by [`Distribution::stats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistribStats {
    pub versus: usize,
    pub battle: usize,
    pub random: usize,
    pub exported: usize,
    pub failed: usize,
    pub groups: usize,
    pub versus_cups: usize,
    pub battle_cups: usize,
}

/// An LE-CODE track distribution
#[derive(Debug, Clone)]
pub struct Distribution {
    config: DistribConfig,
    slots: SlotTable,
    versus: CupTable,
    battle: CupTable,
    stage: ArchiveStage,
}

impl Default for Distribution {
    fn default() -> Self {
        Self::new(DistribConfig::default())
    }
}

impl Distribution {
    #[must_use]
    pub fn new(config: DistribConfig) -> Self {
        Self {
            config,
            slots: SlotTable::new(),
            versus: CupTable::new(CupType::Versus),
            battle: CupTable::new(CupType::Battle),
            stage: ArchiveStage::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DistribConfig {
        &self.config
    }

    #[must_use]
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// Committed track in `slot`
    #[must_use]
    pub fn track(&self, slot: usize) -> Option<&Track> {
        self.slots.get(slot)
    }

    #[must_use]
    pub fn cup_table(&self, cup_type: CupType) -> &CupTable {
        match cup_type {
            CupType::Versus => &self.versus,
            CupType::Battle => &self.battle,
        }
    }

    pub fn cup_table_mut(&mut self, cup_type: CupType) -> &mut CupTable {
        match cup_type {
            CupType::Versus => &mut self.versus,
            CupType::Battle => &mut self.battle,
        }
    }

    fn mark_cups_dirty(&mut self) {
        self.versus.mark_dirty();
        self.battle.mark_dirty();
    }

    // ==================== Import ====================

    /// Define a slot and write a codec record into it
    ///
    /// The slot ends at least `Active`, or `Export` when the record asks for it.
    /// A fill track in the target slot is replaced by the imported track.
    pub fn import_record(&mut self, record: ImportRecord) -> Result<&mut Track> {
        self.mark_cups_dirty();
        let track = self.slots.define(record.slot, record.mark_export, &self.config)?;
        if track.status == TrackStatus::Fill {
            track.clear();
            track.status = if record.mark_export {
                TrackStatus::Export
            } else {
                TrackStatus::Active
            };
        }
        track.track_type = record.track_type;
        track.property = record.property;
        track.music = record.music;
        track.flags = record.flags;
        track.group = record.group;
        for field in record.fields {
            track.set_field(field);
        }
        if track.status < TrackStatus::Active {
            track.status = TrackStatus::Active;
        }
        tracing::debug!("Imported slot {:#05x}: {}", track.slot, track.display_name());
        Ok(track)
    }

    /// Stage a track found while scanning an archive
    pub fn import_archive_record(&mut self, record: ArchiveRecord) -> usize {
        self.stage.stage(record)
    }

    /// Number of staged archive records
    #[must_use]
    pub fn staged(&self) -> usize {
        self.stage.len()
    }

    /// Commit all staged archive records
    ///
    /// On exhaustion the records committed so far stay committed and the stage
    /// is emptied anyway.
    pub fn commit_archive(&mut self) -> Result<CommitStats> {
        let result = self.stage.commit(&mut self.slots, &self.config);
        self.mark_cups_dirty();
        result
    }

    // ==================== Export ====================

    /// Committed tracks accepted by `filter`, ascending slot order
    pub fn iter_export<F>(&self, filter: F) -> Vec<&Track>
    where
        F: Fn(&Track) -> bool,
    {
        self.slots.iter().filter(|t| filter(t)).collect()
    }

    /// Like [`Distribution::iter_export`], sorted by type, cup position and slot
    ///
    /// The type key is the cup type, so random tracks sort with versus tracks.
    /// Runs the cup consistency pass first.
    pub fn sort_by_cup<F>(&mut self, filter: F) -> Result<Vec<&Track>>
    where
        F: Fn(&Track) -> bool,
    {
        self.update_all_cups()?;
        let mut tracks = self.iter_export(filter);
        tracks.sort_by_key(|t| (t.track_type.cup_type(), t.cup_slot, t.slot));
        Ok(tracks)
    }

    /// Raw rows of a cup table
    pub fn cup_rows(&self, cup_type: CupType) -> impl Iterator<Item = &[SlotRef]> {
        self.cup_table(cup_type).rows()
    }

    // ==================== Consistency ====================

    /// Run the consistency pass for one cup table if it is stale
    pub fn update_cups(&mut self, cup_type: CupType) -> Result<CupUpdate> {
        if !self.cup_table(cup_type).is_dirty() && !self.versus.is_empty() && !self.battle.is_empty() {
            return Ok(CupUpdate::default());
        }
        let table = match cup_type {
            CupType::Versus => &mut self.versus,
            CupType::Battle => &mut self.battle,
        };
        cups::update_cups(table, &mut self.slots, &self.config)
    }

    /// Run the consistency pass for both cup tables
    pub fn update_all_cups(&mut self) -> Result<()> {
        for cup_type in CupType::ALL {
            self.update_cups(cup_type)?;
        }
        Ok(())
    }

    /// Fail tracks with invalid properties and pack the slot table
    ///
    /// Returns the number of newly failed tracks.
    pub fn check_tracks(&mut self) -> usize {
        let failed = self.slots.check();
        if failed > 0 {
            tracing::warn!("{} tracks failed the property check", failed);
            self.mark_cups_dirty();
        }
        failed
    }

    /// Return a committed slot to `Valid`
    pub fn clear(&mut self, slot: usize) -> Result<()> {
        if self.slots.get(slot).is_none() {
            return Err(Error::InactiveSlot(slot));
        }
        self.slots.clear(slot);
        self.mark_cups_dirty();
        Ok(())
    }

    /// Clear a randomization group head and its hidden members
    ///
    /// Returns the number of cleared slots.
    pub fn clear_group(&mut self, head_slot: usize) -> Result<usize> {
        let group = self
            .slots
            .get(head_slot)
            .map(|t| t.group)
            .ok_or(Error::InactiveSlot(head_slot))?;

        let mut end = head_slot + 1;
        while group != 0
            && self
                .slots
                .get(end)
                .is_some_and(|t| t.is_hidden() && t.group == group)
        {
            end += 1;
        }
        for slot in head_slot..end {
            self.slots.clear(slot);
        }
        self.mark_cups_dirty();
        tracing::info!("Cleared group at slot {:#05x} ({} slots)", head_slot, end - head_slot);
        Ok(end - head_slot)
    }

    /// Append the original Nintendo cups to a cup table
    ///
    /// The referenced original slots are committed from the standard track
    /// table when they are still free.
    pub fn setup_standard_cups(&mut self, cup_type: CupType) -> Result<()> {
        let rows: Vec<&[u32]> = match cup_type {
            CupType::Versus => STANDARD_VERSUS_CUPS.iter().map(|r| r.as_slice()).collect(),
            CupType::Battle => STANDARD_BATTLE_CUPS.iter().map(|r| r.as_slice()).collect(),
        };
        let track_type = cup_type.fill_type();

        for row in rows {
            for &property in row {
                let slot = property as usize;
                let track = self.slots.define(slot, false, &self.config)?;
                if !track.is_live() {
                    if let Some(standard) = standard_track(property) {
                        track.apply_standard(track_type, standard);
                    }
                    track.status = TrackStatus::Active;
                }
                self.cup_table_mut(cup_type).append(slot as SlotRef)?;
            }
            self.cup_table_mut(cup_type).close();
        }
        tracing::debug!("Appended standard {} cups", cup_type);
        Ok(())
    }

    /// Summary counters
    #[must_use]
    pub fn stats(&self) -> DistribStats {
        let mut stats = DistribStats {
            versus_cups: self.versus.n_cups(),
            battle_cups: self.battle.n_cups(),
            ..DistribStats::default()
        };
        let mut groups: Vec<u32> = Vec::new();
        for track in self.slots.iter() {
            match track.track_type {
                TrackType::Versus => stats.versus += 1,
                TrackType::Battle => stats.battle += 1,
                TrackType::Random => stats.random += 1,
            }
            if track.is_exported() {
                stats.exported += 1;
            }
            if track.group != 0 {
                groups.push(track.group);
            }
        }
        groups.sort_unstable();
        groups.dedup();
        stats.groups = groups.len();
        stats.failed = (0..self.slots.len())
            .filter(|&s| self.slots.status(s) == TrackStatus::Fail)
            .count();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Format;
    use crate::track::{TrackField, TrackFlags};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_import_record() {
        let mut distrib = Distribution::default();
        let track = distrib
            .import_record(
                ImportRecord::new(0x50, TrackType::Versus, 0x03, 0x8b)
                    .with_field(TrackField::Name("Lava Lake".into()))
                    .with_field(TrackField::Laps(5)),
            )
            .unwrap();
        assert_eq!(track.status, TrackStatus::Active);
        assert_eq!(track.laps, 5);

        let track = distrib
            .import_record(ImportRecord::new(0x51, TrackType::Versus, 0x04, 0).exported())
            .unwrap();
        assert_eq!(track.status, TrackStatus::Export);
        assert!(distrib.cup_table(CupType::Versus).is_dirty());
    }

    #[test]
    fn test_import_record_replaces_fill_track() {
        let mut distrib = Distribution::default();
        distrib
            .import_record(ImportRecord::new(0x44, TrackType::Versus, 0x03, 0).exported())
            .unwrap();
        let fill_slot = distrib.update_cups(CupType::Versus).unwrap().fill_slot.unwrap();
        assert_eq!(distrib.track(fill_slot).unwrap().status, TrackStatus::Fill);

        let track = distrib
            .import_record(
                ImportRecord::new(fill_slot, TrackType::Versus, 0x05, 0x99)
                    .exported()
                    .with_field(TrackField::Name("Real Import".into())),
            )
            .unwrap();
        assert_eq!(track.status, TrackStatus::Export);
        assert_eq!(track.ident, "");

        let report = distrib.update_cups(CupType::Versus).unwrap();
        assert_ne!(report.fill_slot, Some(fill_slot));
        let track = distrib.track(fill_slot).unwrap();
        assert_eq!(track.status, TrackStatus::Export);
        assert_eq!(track.name, "Real Import");
        assert_eq!(track.property, 0x05);

        let list = String::from_utf8(Format::TrackList.export(&mut distrib).unwrap()).unwrap();
        assert!(list.contains("\"Real Import\""));
    }

    #[test]
    fn test_sort_by_cup() {
        let mut distrib = Distribution::default();
        for (slot, property) in [(0x52, 1), (0x50, 2), (0x51, 3)] {
            distrib
                .import_record(ImportRecord::new(slot, TrackType::Versus, property, 0))
                .unwrap();
        }
        distrib.cup_table_mut(CupType::Versus).append(0x51).unwrap();

        let sorted: Vec<usize> = distrib
            .sort_by_cup(|t| t.status != TrackStatus::Fill)
            .unwrap()
            .iter()
            .map(|t| t.slot)
            .collect();
        assert_eq!(sorted, vec![0x51, 0x50, 0x52]);
        assert_eq!(distrib.track(0x51).unwrap().cup_slot, 11);
    }

    #[test]
    fn test_update_skipped_when_clean() {
        let mut distrib = Distribution::default();
        distrib.update_all_cups().unwrap();
        assert!(!distrib.cup_table(CupType::Versus).is_dirty());
        assert_eq!(distrib.update_cups(CupType::Versus).unwrap(), CupUpdate::default());
    }

    #[test]
    fn test_clear_group() {
        let mut distrib = Distribution::default();
        for (slot, flags) in [
            (0x60, TrackFlags::RANDOM_HEAD | TrackFlags::RANDOM_GROUP),
            (0x61, TrackFlags::RANDOM_GROUP | TrackFlags::HIDDEN),
            (0x62, TrackFlags::RANDOM_GROUP | TrackFlags::HIDDEN),
        ] {
            let mut record = ImportRecord::new(slot, TrackType::Versus, 1, 0).with_flags(flags);
            record.group = 4;
            distrib.import_record(record).unwrap();
        }
        distrib
            .import_record(ImportRecord::new(0x63, TrackType::Versus, 1, 0))
            .unwrap();

        assert_eq!(distrib.clear_group(0x60).unwrap(), 3);
        assert!(distrib.track(0x62).is_none());
        assert!(distrib.track(0x63).is_some());
        assert!(matches!(distrib.clear(0x60), Err(Error::InactiveSlot(0x60))));
    }

    #[test]
    fn test_standard_cups() {
        let mut distrib = Distribution::default();
        distrib.setup_standard_cups(CupType::Versus).unwrap();
        distrib.setup_standard_cups(CupType::Battle).unwrap();
        distrib.update_all_cups().unwrap();

        assert_eq!(distrib.cup_table(CupType::Versus).n_cups(), 8);
        assert_eq!(distrib.cup_table(CupType::Battle).n_cups(), 2);
        assert!(!distrib.cup_table(CupType::Versus).has_invalid());
        assert_eq!(distrib.track(0x08).unwrap().name, "Luigi Circuit");
        assert_eq!(distrib.track(0x08).unwrap().cup_slot, 11);

        let stats = distrib.stats();
        assert_eq!(stats.versus, 32);
        assert_eq!(stats.battle, 10);
        assert_eq!(stats.exported, 0);
    }

    #[test]
    fn test_check_tracks() {
        let mut distrib = Distribution::default();
        distrib
            .import_record(ImportRecord::new(0x50, TrackType::Versus, 0x25, 0))
            .unwrap();
        distrib
            .import_record(ImportRecord::new(0x51, TrackType::Versus, 0x02, 0))
            .unwrap();

        assert_eq!(distrib.check_tracks(), 1);
        assert_eq!(distrib.stats().failed, 1);
        assert!(distrib.iter_export(|_| true).iter().all(|t| t.slot != 0x50));
    }
}
