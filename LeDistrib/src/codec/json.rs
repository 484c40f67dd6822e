//! JSON dump of the committed tracks and both cup tables

use serde::{Deserialize, Serialize};

use crate::cups::{CupType, NO_SLOT, SlotRef};
use crate::distrib::{Distribution, ImportRecord};
use crate::error::Result;
use crate::track::{Track, TrackField, TrackStatus};

use super::Codec;

#[derive(Debug, Default, Serialize, Deserialize)]
struct JsonDistrib {
    #[serde(default)]
    tracks: Vec<Track>,
    #[serde(default)]
    versus_cups: Vec<Vec<SlotRef>>,
    #[serde(default)]
    battle_cups: Vec<Vec<SlotRef>>,
}

/// JSON dump of the committed tracks and both cup tables
///
/// Fill tracks are not written. Cup cells referencing them are written empty
/// and the importing side synthesizes its own fill track.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn import(&self, distrib: &mut Distribution, data: &[u8]) -> Result<usize> {
        let doc: JsonDistrib = serde_json::from_slice(data)?;
        let count = doc.tracks.len();
        for track in doc.tracks {
            distrib.import_record(import_record(track))?;
        }
        for (cup_type, rows) in [
            (CupType::Versus, doc.versus_cups),
            (CupType::Battle, doc.battle_cups),
        ] {
            let table = distrib.cup_table_mut(cup_type);
            for row in rows {
                for cell in row {
                    table.append(cell)?;
                }
                table.close();
            }
        }
        tracing::debug!("Imported {} tracks from JSON", count);
        Ok(count)
    }

    fn export(&self, distrib: &mut Distribution) -> Result<Vec<u8>> {
        distrib.update_all_cups()?;
        let doc = JsonDistrib {
            tracks: distrib
                .iter_export(|t| t.status != TrackStatus::Fill)
                .into_iter()
                .cloned()
                .collect(),
            versus_cups: cup_rows(distrib, CupType::Versus),
            battle_cups: cup_rows(distrib, CupType::Battle),
        };
        Ok(serde_json::to_vec_pretty(&doc)?)
    }
}

fn cup_rows(distrib: &Distribution, cup_type: CupType) -> Vec<Vec<SlotRef>> {
    let is_fill = |cell: SlotRef| {
        cell >= 0
            && distrib
                .track(cell as usize)
                .is_some_and(|t| t.status == TrackStatus::Fill)
    };
    distrib
        .cup_rows(cup_type)
        .map(|row| {
            row.iter()
                .map(|&cell| if is_fill(cell) { NO_SLOT } else { cell })
                .collect()
        })
        .collect()
}

fn import_record(track: Track) -> ImportRecord {
    let mut record = ImportRecord::new(track.slot, track.track_type, track.property, track.music)
        .with_flags(track.flags);
    record.group = track.group;
    record.mark_export = track.status >= TrackStatus::Export;

    let fields = &mut record.fields;
    fields.extend(track.sha1.map(TrackField::Sha1));
    fields.extend(track.sha1_d.map(TrackField::Sha1D));
    let mut push_text = |value: String, field: fn(String) -> TrackField| {
        if !value.is_empty() {
            fields.push(field(value));
        }
    };
    push_text(track.ident, TrackField::Ident);
    push_text(track.ident_d, TrackField::IdentD);
    push_text(track.file, TrackField::File);
    push_text(track.file_d, TrackField::FileD);
    push_text(track.name, TrackField::Name);
    push_text(track.name_d, TrackField::NameD);
    push_text(track.xname, TrackField::XName);
    push_text(track.xname_d, TrackField::XNameD);
    if track.laps != 0 {
        fields.push(TrackField::Laps(track.laps));
    }
    if track.speed.abs() > f32::EPSILON {
        fields.push(TrackField::Speed(track.speed));
    }
    fields.extend(track.alias.map(TrackField::Alias));
    fields.extend(
        track
            .strings
            .into_iter()
            .map(|(key, value)| TrackField::Custom { key, value }),
    );
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Format;
    use crate::track::{Sha1, TrackFlags, TrackType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_keeps_tracks_and_cups() {
        let mut source = Distribution::default();
        source
            .import_record(
                ImportRecord::new(0x50, TrackType::Versus, 0x03, 0x8b)
                    .exported()
                    .with_flags(TrackFlags::NEW)
                    .with_field(TrackField::Sha1(Sha1([0xab; 20])))
                    .with_field(TrackField::Name("Lava Lake".into()))
                    .with_field(TrackField::Custom {
                        key: "authors".into(),
                        value: "Someone".into(),
                    }),
            )
            .unwrap();
        source.cup_table_mut(CupType::Versus).append(0x50).unwrap();
        let data = JsonCodec.export(&mut source).unwrap();

        let mut target = Distribution::default();
        let count = JsonCodec.import(&mut target, &data).unwrap();
        assert_eq!(count, 1);

        let track = target.track(0x50).unwrap();
        assert_eq!(track.status, TrackStatus::Export);
        assert_eq!(track.flags, TrackFlags::NEW);
        assert_eq!(track.sha1, Some(Sha1([0xab; 20])));
        assert_eq!(track.strings.get("authors").map(String::as_str), Some("Someone"));
        target.update_all_cups().unwrap();
        assert_eq!(
            target.cup_table(CupType::Versus).cells(),
            source.cup_table(CupType::Versus).cells()
        );
    }

    #[test]
    fn test_json_leaves_fill_tracks_to_the_importer() {
        let mut source = Distribution::default();
        source
            .import_record(ImportRecord::new(0x44, TrackType::Versus, 0x03, 0).exported())
            .unwrap();
        let data = JsonCodec.export(&mut source).unwrap();

        let doc: JsonDistrib = serde_json::from_slice(&data).unwrap();
        let slots: Vec<usize> = doc.tracks.iter().map(|t| t.slot).collect();
        assert_eq!(slots, vec![0x44]);
        assert_eq!(doc.versus_cups[0], vec![0x44, NO_SLOT, NO_SLOT, NO_SLOT]);

        let mut target = Distribution::default();
        assert_eq!(JsonCodec.import(&mut target, &data).unwrap(), 1);
        assert_eq!(
            Format::TrackList.export(&mut target).unwrap(),
            Format::TrackList.export(&mut source).unwrap()
        );
        assert_eq!(
            Format::CupList.export(&mut target).unwrap(),
            Format::CupList.export(&mut source).unwrap()
        );
        assert_eq!(target.stats(), source.stats());
    }

    #[test]
    fn test_invalid_json() {
        let mut distrib = Distribution::default();
        assert!(JsonCodec.import(&mut distrib, b"{ not json").is_err());
    }
}
