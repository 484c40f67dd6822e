//! Consistency pass reconciling a cup table with the slot table
//!
//! After a pass every cell references a committed track of a matching type,
//! the table holds an even number of complete cups and every referenced track
//! knows its display cup position.

use crate::config::DistribConfig;
use crate::error::Result;
use crate::slots::SlotTable;
use crate::track::standard::standard_track;
use crate::track::{Track, TrackStatus};

use super::{CupTable, CupType, NO_SLOT, SlotRef};

/// Summary of one consistency pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CupUpdate {
    /// Cells dropped because they referenced no usable track
    pub invalidated: usize,
    /// Unreferenced tracks appended to the table
    pub appended: usize,
    /// Cells patched with the fill track
    pub filled: usize,
    /// Slot of the fill track, if one was needed
    pub fill_slot: Option<usize>,
}

/// Run the full consistency pass for one table
pub(crate) fn update_cups(
    cups: &mut CupTable,
    slots: &mut SlotTable,
    config: &DistribConfig,
) -> Result<CupUpdate> {
    let cup_type = cups.cup_type();
    let mut report = CupUpdate::default();

    for track in slots.iter_mut().filter(|t| cup_type.accepts(t.track_type)) {
        track.used = false;
        track.cup_slot = 0;
    }

    // Drop stale references, mark the rest as used
    for cell in cups.cells_mut().iter_mut().filter(|cell| **cell >= 0) {
        match slots.get_mut(*cell as usize) {
            Some(track) if cup_type.accepts(track.track_type) && !track.is_hidden() => {
                track.used = true;
            }
            _ => {
                tracing::debug!("Dropping stale {} cup reference to slot {}", cup_type, cell);
                *cell = NO_SLOT;
                report.invalidated += 1;
            }
        }
    }

    if config.append_unused(cup_type) {
        let unused: Vec<usize> = slots
            .iter()
            .filter(|t| {
                cup_type.accepts(t.track_type)
                    && !t.used
                    && !t.is_hidden()
                    && t.status != TrackStatus::Fill
            })
            .map(|t| t.slot)
            .collect();
        for slot in unused {
            cups.append(slot as SlotRef)?;
            if let Some(track) = slots.get_mut(slot) {
                track.used = true;
            }
            report.appended += 1;
        }
    }

    if !config.keep_cups {
        cups.pack();
    }
    cups.even();

    if cups.has_invalid() {
        let fill_slot = fill_track(cup_type, slots, config)?;
        report.filled = cups.fill(fill_slot as SlotRef);
        report.fill_slot = Some(fill_slot);
    }

    assign_cup_slots(cups, slots);
    cups.mark_clean();

    tracing::debug!(
        "Updated {} cups: {} cups, {} dropped, {} appended, {} filled",
        cup_type,
        cups.n_cups(),
        report.invalidated,
        report.appended,
        report.filled
    );
    Ok(report)
}

/// Find, refresh or create the fill track of a table
///
/// Preference order: reuse the existing fill track, clone a used real track,
/// synthesize one from the original track table.
fn fill_track(cup_type: CupType, slots: &mut SlotTable, config: &DistribConfig) -> Result<usize> {
    let fill_type = cup_type.fill_type();
    let donor: Option<Track> = slots
        .iter()
        .find(|t| t.used && t.status != TrackStatus::Fill && t.track_type == fill_type)
        .cloned();

    let existing = slots
        .iter()
        .find(|t| t.status == TrackStatus::Fill && t.track_type == fill_type)
        .map(|t| t.slot);
    if let Some(slot) = existing {
        if let (Some(donor), Some(track)) = (&donor, slots.get_mut(slot)) {
            copy_fill_payload(track, donor);
        }
        return Ok(slot);
    }

    let track = slots.define_free(fill_type, false, config)?;
    track.clear();
    track.track_type = fill_type;
    match &donor {
        Some(donor) => copy_fill_payload(track, donor),
        None => {
            if let Some(standard) = standard_track(cup_type.fallback_property()) {
                track.apply_standard(fill_type, standard);
            }
        }
    }
    track.ident = "fill".to_string();
    track.status = TrackStatus::Fill;
    track.used = true;

    tracing::info!(
        "Created {} fill track in slot {:#05x} from {}",
        cup_type,
        track.slot,
        donor.as_ref().map_or("the original track table".to_string(), |d| format!(
            "slot {:#05x}",
            d.slot
        ))
    );
    Ok(track.slot)
}

fn copy_fill_payload(fill: &mut Track, donor: &Track) {
    fill.property = donor.property;
    fill.music = donor.music;
    fill.sha1 = donor.sha1;
    fill.sha1_d = donor.sha1_d;
    fill.file.clone_from(&donor.file);
    fill.file_d.clone_from(&donor.file_d);
    fill.name.clone_from(&donor.name);
}

/// Write display cup positions back into the referenced tracks
///
/// The first reference to a track wins. A group head hands its position to
/// the hidden members stored directly behind it.
fn assign_cup_slots(cups: &CupTable, slots: &mut SlotTable) {
    for (index, &cell) in cups.cells().iter().enumerate() {
        if cell < 0 {
            continue;
        }
        let slot = cell as usize;
        let Some(track) = slots.get_mut(slot) else {
            panic!("cup references uncommitted slot {slot}");
        };
        if track.cup_slot == 0 {
            track.cup_slot = cups.cup_slot(index);
        }
        if track.is_group_head() {
            propagate_to_group(slots, slot);
        }
    }
}

/// Copy the head's cup position to the contiguous hidden members after it
fn propagate_to_group(slots: &mut SlotTable, head: usize) {
    let Some(head_track) = slots.get(head) else {
        return;
    };
    let (cup_slot, group) = (head_track.cup_slot, head_track.group);

    let mut slot = head + 1;
    while let Some(member) = slots.get_mut(slot) {
        if !member.is_hidden() || member.group != group {
            break;
        }
        if member.cup_slot == 0 {
            member.cup_slot = cup_slot;
        }
        slot += 1;
    }
}
