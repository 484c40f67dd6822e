//! SHA1 reference list: `sha1 slot name`, one exported track per line

use std::fmt::Write as _;

use crate::distrib::Distribution;
use crate::error::{Error, Result};

use super::{Codec, quote};

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha1ListCodec;

impl Codec for Sha1ListCodec {
    fn import(&self, _distrib: &mut Distribution, _data: &[u8]) -> Result<usize> {
        Err(Error::ExportOnlyFormat("sha1"))
    }

    fn export(&self, distrib: &mut Distribution) -> Result<Vec<u8>> {
        let mut out = String::new();
        for track in distrib.iter_export(|t| t.is_exported() && t.sha1.is_some()) {
            if let Some(sha1) = track.sha1 {
                let _ = writeln!(out, "{} {:#05x} {}", sha1, track.slot, quote(track.display_name()));
            }
        }
        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distrib::ImportRecord;
    use crate::track::{Sha1, TrackField, TrackType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_exported_tracks_with_checksum() {
        let mut distrib = Distribution::default();
        distrib
            .import_record(
                ImportRecord::new(0x45, TrackType::Versus, 1, 0)
                    .exported()
                    .with_field(TrackField::Sha1(Sha1([0x11; 20])))
                    .with_field(TrackField::Name("B".into())),
            )
            .unwrap();
        distrib
            .import_record(
                ImportRecord::new(0x44, TrackType::Versus, 1, 0)
                    .exported()
                    .with_field(TrackField::Sha1(Sha1([0x22; 20])))
                    .with_field(TrackField::Name("A".into())),
            )
            .unwrap();
        distrib
            .import_record(ImportRecord::new(0x46, TrackType::Versus, 1, 0).exported())
            .unwrap();
        distrib
            .import_record(
                ImportRecord::new(0x47, TrackType::Versus, 1, 0)
                    .with_field(TrackField::Sha1(Sha1([0x33; 20]))),
            )
            .unwrap();

        let text = String::from_utf8(Sha1ListCodec.export(&mut distrib).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "2222222222222222222222222222222222222222 0x044 \"A\"",
                "1111111111111111111111111111111111111111 0x045 \"B\"",
            ]
        );
    }
}
