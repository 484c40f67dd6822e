//! Staging and commit of archive records
//!
//! Records are staged one per scanned file and committed together. The commit
//! lays every randomization group out contiguously: the head goes past the
//! slot table's high-water mark and its hidden members follow directly
//! behind it. The cup consistency pass relies on that layout when it hands
//! the head's cup position to the members.

use indexmap::IndexMap;

use crate::config::DistribConfig;
use crate::error::{Error, Result};
use crate::slots::SlotTable;
use crate::track::layout::MAX_SLOTS;
use crate::track::{TrackFlags, TrackStatus};

use super::record::ArchiveRecord;

/// Group side-table entry: staging indices and flag counts
#[derive(Debug, Clone, Default)]
struct GroupInfo {
    members: Vec<usize>,
    n_head: usize,
    n_group: usize,
}

/// Result of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Records written into the slot table, group members included
    pub committed: usize,
    /// Randomization groups laid out
    pub groups: usize,
    /// Groups dissolved into ordinary tracks
    pub dissolved: usize,
    /// Records dropped without being committed
    pub discarded: usize,
}

/// Records waiting for [`ArchiveStage::commit`]
#[derive(Debug, Clone, Default)]
pub struct ArchiveStage {
    records: Vec<ArchiveRecord>,
    groups: IndexMap<(char, String), GroupInfo>,
}

impl ArchiveStage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stage a record, returning its staging index
    pub fn stage(&mut self, mut record: ArchiveRecord) -> usize {
        let index = self.records.len();
        record.index = index;
        if let Some(key) = &record.group {
            let info = self
                .groups
                .entry((record.track.track_type.tag(), key.clone()))
                .or_default();
            info.members.push(index);
            if record.track.flags.contains(TrackFlags::RANDOM_HEAD) {
                info.n_head += 1;
            }
            if record.track.flags.contains(TrackFlags::RANDOM_GROUP) {
                info.n_group += 1;
            }
        }
        tracing::debug!("Staged archive record {}: {}", index, record.track.display_name());
        self.records.push(record);
        index
    }

    /// Commit every staged record into `slots` and empty the stage
    ///
    /// Stops at the first allocation failure; records committed before it
    /// stay committed.
    pub fn commit(&mut self, slots: &mut SlotTable, config: &DistribConfig) -> Result<CommitStats> {
        let mut records = std::mem::take(&mut self.records);
        let groups = std::mem::take(&mut self.groups);
        let mut stats = CommitStats::default();

        let mut next_group = slots.iter().map(|t| t.group).max().unwrap_or(0) + 1;
        let mut group_of: Vec<Option<usize>> = vec![None; records.len()];
        let mut layouts: Vec<Vec<usize>> = Vec::new();

        for ((_, key), info) in groups {
            if info.n_group == 0 || (info.members.len() == 1 && info.n_head == 0) {
                tracing::debug!("Dissolving randomization group '{}'", key);
                stats.dissolved += 1;
                for &i in &info.members {
                    let record = &mut records[i];
                    record.group = None;
                    if record.track.flags.contains(TrackFlags::RANDOM_GROUP) {
                        record
                            .track
                            .flags
                            .remove(TrackFlags::RANDOM_GROUP | TrackFlags::RANDOM_HEAD);
                    } else {
                        record.track.status = TrackStatus::Valid;
                        stats.discarded += 1;
                    }
                }
                continue;
            }

            let head = info
                .members
                .iter()
                .copied()
                .find(|&i| records[i].track.is_group_head())
                .unwrap_or(info.members[0]);
            let mut layout = vec![head];
            layout.extend(info.members.iter().copied().filter(|&i| i != head));

            for &i in &layout {
                let track = &mut records[i].track;
                track.group = next_group;
                track.flags.insert(TrackFlags::RANDOM_GROUP);
                if i == head {
                    track.flags.insert(TrackFlags::RANDOM_HEAD);
                    track.flags.remove(TrackFlags::HIDDEN);
                } else {
                    track.flags.remove(TrackFlags::RANDOM_HEAD);
                    track.flags.insert(TrackFlags::HIDDEN);
                }
                group_of[i] = Some(layouts.len());
            }
            next_group += 1;
            layouts.push(layout);
        }

        let mut order: Vec<usize> = (0..records.len())
            .filter(|&i| records[i].track.status >= TrackStatus::Export && !records[i].track.is_hidden())
            .collect();
        order.sort_by(|&a, &b| records[a].commit_order(&records[b]));

        for i in order {
            let record = &records[i];
            let track_type = record.track.track_type;
            let allocated = match group_of[i] {
                Some(_) => slots.define_group(track_type, true, config),
                None => slots.define_free(track_type, true, config),
            };
            let track = match allocated {
                Ok(track) => track,
                Err(err) => {
                    tracing::warn!(
                        "Archive commit stopped after {} records: {}",
                        stats.committed,
                        err
                    );
                    return Err(err);
                }
            };
            track.copy_payload_from(&record.track);
            let head_slot = track.slot;
            stats.committed += 1;
            tracing::debug!("Committed '{}' to slot {:#05x}", record.track.display_name(), head_slot);

            if let Some(layout) = group_of[i].map(|g| &layouts[g]) {
                stats.groups += 1;
                for (offset, &member) in layout.iter().skip(1).enumerate() {
                    let slot = head_slot + 1 + offset;
                    if slot >= MAX_SLOTS || slots.status(slot).is_live() {
                        tracing::warn!("No room behind group head {:#05x}", head_slot);
                        return Err(Error::NoFreeSlot { track_type });
                    }
                    let track = slots.define(slot, true, config)?;
                    track.copy_payload_from(&records[member].track);
                    stats.committed += 1;
                }
            }
        }

        tracing::info!(
            "Committed {} archive records ({} groups, {} dissolved, {} discarded)",
            stats.committed,
            stats.groups,
            stats.dissolved,
            stats.discarded
        );
        Ok(stats)
    }
}
