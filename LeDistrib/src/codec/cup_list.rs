//! Human readable cup listing
//!
//! ```text
//! V01: 11=0x08 "Luigi Circuit" 12=0x01 "Moo Moo Meadows" ...
//! B01: 11=0x21 "Block Plaza" ...
//! ```

use std::fmt::Write as _;

use crate::cups::{CupType, cup_slot_for};
use crate::distrib::Distribution;
use crate::error::{Error, Result};

use super::{Codec, quote};

#[derive(Debug, Clone, Copy, Default)]
pub struct CupListCodec;

impl Codec for CupListCodec {
    fn import(&self, _distrib: &mut Distribution, _data: &[u8]) -> Result<usize> {
        Err(Error::ExportOnlyFormat("cups"))
    }

    fn export(&self, distrib: &mut Distribution) -> Result<Vec<u8>> {
        distrib.update_all_cups()?;
        let mut out = String::new();
        for cup_type in CupType::ALL {
            let tag = cup_type.fill_type().tag();
            let tpc = distrib.cup_table(cup_type).tracks_per_cup();
            for (cup, row) in distrib.cup_rows(cup_type).enumerate() {
                let _ = write!(out, "{}{:02}:", tag, cup + 1);
                for (column, &cell) in row.iter().enumerate() {
                    let name = distrib
                        .track(cell as usize)
                        .map_or("", |t| t.display_name());
                    let _ = write!(
                        out,
                        " {}={:#04x} {}",
                        cup_slot_for(cup * tpc + column, tpc),
                        cell,
                        quote(name)
                    );
                }
                out.push('\n');
            }
        }
        Ok(out.into_bytes())
    }
}
