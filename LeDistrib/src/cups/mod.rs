//! Cup tables: ordered rows of slot references
//!
//! A distribution carries one table for race cups and one for battle cups.
//! Each row holds [`CupType::tracks_per_cup`] signed slot references, with
//! [`NO_SLOT`] marking an empty cell. The tables own only the references;
//! the [`crate::slots::SlotTable`] owns the tracks.

mod update;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::track::TrackType;
use crate::track::layout::{FALLBACK_BATTLE_PROPERTY, FALLBACK_VERSUS_PROPERTY};

pub(crate) use update::update_cups;
pub use update::CupUpdate;

/// A signed slot reference inside a cup row
pub type SlotRef = i32;

/// Empty cell
pub const NO_SLOT: SlotRef = -1;

/// Every table holds at least this many cups after evening.
pub const MIN_CUPS: usize = 2;

/// Which cup table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CupType {
    Versus,
    Battle,
}

impl CupType {
    pub const ALL: [CupType; 2] = [CupType::Versus, CupType::Battle];

    #[must_use]
    pub fn tracks_per_cup(self) -> usize {
        match self {
            Self::Versus => 4,
            Self::Battle => 5,
        }
    }

    #[must_use]
    pub fn max_cups(self) -> usize {
        match self {
            Self::Versus => 1000,
            Self::Battle => 200,
        }
    }

    /// Whether tracks of `track_type` may sit in this table
    #[must_use]
    pub fn accepts(self, track_type: TrackType) -> bool {
        track_type.cup_type() == self
    }

    /// Type of synthesized fill tracks
    #[must_use]
    pub fn fill_type(self) -> TrackType {
        match self {
            Self::Versus => TrackType::Versus,
            Self::Battle => TrackType::Battle,
        }
    }

    /// Original track used when no real track can be cloned into a fill track
    #[must_use]
    pub fn fallback_property(self) -> u32 {
        match self {
            Self::Versus => FALLBACK_VERSUS_PROPERTY,
            Self::Battle => FALLBACK_BATTLE_PROPERTY,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Versus => "versus",
            Self::Battle => "battle",
        }
    }
}

impl fmt::Display for CupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a cell index as display number `10 * cup + column + 11`
#[must_use]
pub fn cup_slot_for(index: usize, tracks_per_cup: usize) -> u32 {
    (10 * (index / tracks_per_cup) + index % tracks_per_cup + 11) as u32
}

/// Row-major table of cups
#[derive(Debug, Clone)]
pub struct CupTable {
    cup_type: CupType,
    cells: Vec<SlotRef>,
    /// Next column in the last row; `tracks_per_cup` forces a new row
    column: usize,
    dirty: bool,
}

impl CupTable {
    #[must_use]
    pub fn new(cup_type: CupType) -> Self {
        Self {
            cup_type,
            cells: Vec::new(),
            column: cup_type.tracks_per_cup(),
            dirty: false,
        }
    }

    #[must_use]
    pub fn cup_type(&self) -> CupType {
        self.cup_type
    }

    #[must_use]
    pub fn tracks_per_cup(&self) -> usize {
        self.cup_type.tracks_per_cup()
    }

    /// Number of rows in use
    #[must_use]
    pub fn n_cups(&self) -> usize {
        self.cells.len() / self.tracks_per_cup()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// All cells, row-major
    #[must_use]
    pub fn cells(&self) -> &[SlotRef] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [SlotRef] {
        &mut self.cells
    }

    /// All rows
    pub fn rows(&self) -> impl Iterator<Item = &[SlotRef]> {
        self.cells.chunks_exact(self.tracks_per_cup())
    }

    /// Write `slot` at the current column, opening a new row when needed
    pub fn append(&mut self, slot: SlotRef) -> Result<()> {
        let tpc = self.tracks_per_cup();
        if self.column >= tpc {
            if self.n_cups() >= self.cup_type.max_cups() {
                return Err(Error::CupTableFull {
                    cup_type: self.cup_type.as_str(),
                    max: self.cup_type.max_cups(),
                });
            }
            self.cells.resize(self.cells.len() + tpc, NO_SLOT);
            self.column = 0;
        }
        let index = self.cells.len() - tpc + self.column;
        self.cells[index] = slot;
        self.column += 1;
        self.dirty = true;
        Ok(())
    }

    /// Start a new row on the next append, even if the current one is partial
    pub fn close(&mut self) {
        self.column = self.tracks_per_cup();
        self.dirty = true;
    }

    /// Remove every cell
    pub fn clear(&mut self) {
        self.cells.clear();
        self.column = self.tracks_per_cup();
        self.dirty = true;
    }

    /// Left-compact valid references, then pad the last row with [`NO_SLOT`]
    pub fn pack(&mut self) {
        let tpc = self.tracks_per_cup();
        self.cells.retain(|&cell| cell >= 0);
        let rem = self.cells.len() % tpc;
        if rem == 0 {
            self.column = tpc;
        } else {
            self.cells.resize(self.cells.len() + tpc - rem, NO_SLOT);
            self.column = rem;
        }
    }

    /// Grow to an even number of rows, at least [`MIN_CUPS`]
    pub fn even(&mut self) {
        let tpc = self.tracks_per_cup();
        let rows = self.n_cups();
        let target = rows.max(MIN_CUPS);
        let target = target + target % 2;
        if target > rows {
            self.cells.resize(target * tpc, NO_SLOT);
            self.column = tpc;
        }
    }

    #[must_use]
    pub fn has_invalid(&self) -> bool {
        self.cells.iter().any(|&cell| cell < 0)
    }

    /// Replace every empty cell with `value`, returning how many were replaced
    pub fn fill(&mut self, value: SlotRef) -> usize {
        let mut count = 0;
        for cell in self.cells.iter_mut().filter(|cell| **cell < 0) {
            *cell = value;
            count += 1;
        }
        count
    }

    /// Display number of the cell at `index`
    #[must_use]
    pub fn cup_slot(&self, index: usize) -> u32 {
        cup_slot_for(index, self.tracks_per_cup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_with(cup_type: CupType, refs: &[SlotRef]) -> CupTable {
        let mut table = CupTable::new(cup_type);
        for &r in refs {
            table.append(r).unwrap();
        }
        table
    }

    #[test]
    fn test_append_wraps_rows() {
        let table = table_with(CupType::Versus, &[1, 2, 3, 4, 5]);
        assert_eq!(table.n_cups(), 2);
        assert_eq!(table.cells(), &[1, 2, 3, 4, 5, -1, -1, -1]);
        assert!(table.is_dirty());
    }

    #[test]
    fn test_close_starts_new_row() {
        let mut table = table_with(CupType::Versus, &[1, 2]);
        table.close();
        table.append(3).unwrap();
        assert_eq!(table.cells(), &[1, 2, -1, -1, 3, -1, -1, -1]);
    }

    #[test]
    fn test_pack_then_fill() {
        let mut table = table_with(CupType::Versus, &[3, -1, 7, -1]);
        table.pack();
        assert_eq!(table.cells(), &[3, 7, -1, -1]);
        assert_eq!(table.fill(99), 2);
        assert_eq!(table.cells(), &[3, 7, 99, 99]);
        assert!(!table.has_invalid());
    }

    #[test]
    fn test_pack_across_rows() {
        let mut table = table_with(CupType::Versus, &[1, -1, -1, -1, 2, 3, -1, 4]);
        table.pack();
        assert_eq!(table.cells(), &[1, 2, 3, 4]);
        table.append(5).unwrap();
        assert_eq!(table.n_cups(), 2);
    }

    #[test]
    fn test_even() {
        let mut table = CupTable::new(CupType::Battle);
        table.even();
        assert_eq!(table.n_cups(), 2);

        let mut table = table_with(CupType::Versus, &[1; 12]);
        assert_eq!(table.n_cups(), 3);
        table.even();
        assert_eq!(table.n_cups(), 4);
        assert_eq!(&table.cells()[12..], &[-1, -1, -1, -1]);
    }

    #[test]
    fn test_cup_slot_numbers() {
        let table = CupTable::new(CupType::Versus);
        assert_eq!(table.cup_slot(0), 11);
        assert_eq!(table.cup_slot(3), 14);
        assert_eq!(table.cup_slot(4), 21);
        let battle = CupTable::new(CupType::Battle);
        assert_eq!(battle.cup_slot(9), 25);
    }

    #[test]
    fn test_full_table() {
        let mut table = CupTable::new(CupType::Battle);
        for _ in 0..CupType::Battle.max_cups() {
            table.append(0x20).unwrap();
            table.close();
        }
        assert!(matches!(table.append(0x20), Err(Error::CupTableFull { .. })));
    }
}
