//! Plain text track list
//!
//! ```text
//! # slot  type property music flags sha1|-  "name"  "file"
//! 0x44    V    0x08     0x75  N----  -       "Lava Lake" "Lava Lake.szs"
//! ```
//!
//! Numbers may be decimal or `0x` hex. Blank lines and lines starting with
//! `#` are ignored. Every imported track is marked for export.

use std::fmt::Write as _;

use crate::distrib::{Distribution, ImportRecord};
use crate::error::{Error, Result};
use crate::track::{Sha1, TrackField, TrackFlags, TrackStatus, TrackType};

use super::{Codec, parse_number, quote, split_words};

const HEADER: &str = "# slot  type property music flags sha1|- \"name\" \"file\"\n";

/// Line-oriented track list
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackListCodec;

impl Codec for TrackListCodec {
    fn import(&self, distrib: &mut Distribution, data: &[u8]) -> Result<usize> {
        let text = String::from_utf8(data.to_vec())?;
        let mut count = 0;
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record = parse_line(line).map_err(|message| Error::Parse {
                line: index + 1,
                message,
            })?;
            distrib.import_record(record)?;
            count += 1;
        }
        tracing::debug!("Imported {} tracks from track list", count);
        Ok(count)
    }

    fn export(&self, distrib: &mut Distribution) -> Result<Vec<u8>> {
        let mut out = String::from(HEADER);
        for track in distrib.iter_export(|t| t.status != TrackStatus::Fill) {
            let sha1 = track.sha1.map_or_else(|| "-".to_string(), |s| s.to_string());
            let _ = writeln!(
                out,
                "{:#05x} {} {:#04x} {:#04x} {} {} {} {}",
                track.slot,
                track.track_type.tag(),
                track.property,
                track.music,
                track.flags.to_letters(),
                sha1,
                quote(&track.name),
                quote(&track.file)
            );
        }
        Ok(out.into_bytes())
    }
}

fn parse_line(line: &str) -> std::result::Result<ImportRecord, String> {
    let words = split_words(line)?;
    if words.len() < 8 {
        return Err(format!("expected 8 columns, found {}", words.len()));
    }

    let number = |i: usize, what: &str| {
        parse_number(&words[i]).ok_or_else(|| format!("invalid {what}: {}", words[i]))
    };
    let slot = number(0, "slot")? as usize;
    let track_type = words[1]
        .chars()
        .next()
        .and_then(TrackType::from_tag)
        .filter(|_| words[1].len() == 1)
        .ok_or_else(|| format!("invalid track type: {}", words[1]))?;
    let property = number(2, "property")?;
    let music = number(3, "music")?;
    let flags = TrackFlags::from_letters(&words[4]);

    let mut record = ImportRecord::new(slot, track_type, property, music)
        .with_flags(flags)
        .exported();
    if words[5] != "-" {
        let sha1: Sha1 = words[5].parse().map_err(|e: Error| e.to_string())?;
        record.fields.push(TrackField::Sha1(sha1));
    }
    if !words[6].is_empty() {
        record.fields.push(TrackField::Name(words[6].clone()));
    }
    if !words[7].is_empty() {
        record.fields.push(TrackField::File(words[7].clone()));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LIST: &str = r#"
# custom tracks
0x44 V 0x08 0x75 N---- - "Lava Lake" "Lava Lake.szs"
69   B 0x21 0    -----  0123456789abcdef0123456789abcdef01234567 "Arena" ""
"#;

    #[test]
    fn test_import() {
        let mut distrib = Distribution::default();
        let count = TrackListCodec.import(&mut distrib, LIST.as_bytes()).unwrap();
        assert_eq!(count, 2);

        let lake = distrib.track(0x44).unwrap();
        assert_eq!(lake.status, TrackStatus::Export);
        assert_eq!(lake.name, "Lava Lake");
        assert_eq!(lake.flags, TrackFlags::NEW);

        let arena = distrib.track(69).unwrap();
        assert_eq!(arena.track_type, TrackType::Battle);
        assert_eq!(
            arena.sha1.map(|s| s.to_string()).as_deref(),
            Some("0123456789abcdef0123456789abcdef01234567")
        );
    }

    #[test]
    fn test_export_reimports() {
        let mut source = Distribution::default();
        TrackListCodec.import(&mut source, LIST.as_bytes()).unwrap();
        let text = TrackListCodec.export(&mut source).unwrap();
        assert!(String::from_utf8_lossy(&text).contains(r#"0x044 V 0x08 0x75 N---- - "Lava Lake" "Lava Lake.szs""#));

        let mut target = Distribution::default();
        assert_eq!(TrackListCodec.import(&mut target, &text).unwrap(), 2);
        assert_eq!(target.track(0x45), source.track(0x45));
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let mut distrib = Distribution::default();
        let err = TrackListCodec
            .import(&mut distrib, b"# header\n0x44 Q 1 2 - - \"a\" \"b\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));

        let err = TrackListCodec
            .import(&mut distrib, b"0x44 V 1 2 - abc \"a\" \"b\"\n")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));

        let err = TrackListCodec.import(&mut distrib, b"0x44 V 1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }
}
