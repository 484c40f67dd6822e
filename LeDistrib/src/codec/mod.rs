//! Record codecs: serialization formats of a distribution
//!
//! Codecs read and write a [`Distribution`] only through its public
//! operations; they never touch slot or cup storage directly.
//!
//! | Format | Import | Export |
//! |--------|--------|--------|
//! | JSON | yes | yes |
//! | Track list | yes | yes |
//! | SHA1 list | no | yes |
//! | Cup list | no | yes |

mod cup_list;
mod json;
mod sha1_list;
mod track_list;

pub use cup_list::CupListCodec;
pub use json::JsonCodec;
pub use sha1_list::Sha1ListCodec;
pub use track_list::TrackListCodec;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::distrib::Distribution;
use crate::error::{Error, Result};

/// A serialization format of a distribution
pub trait Codec {
    /// Read `data` into `distrib`, returning the number of imported tracks
    fn import(&self, distrib: &mut Distribution, data: &[u8]) -> Result<usize>;

    /// Serialize `distrib`
    fn export(&self, distrib: &mut Distribution) -> Result<Vec<u8>>;
}

/// Selector for the built-in codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    TrackList,
    Sha1List,
    CupList,
}

impl Format {
    pub const ALL: [Format; 4] = [
        Format::Json,
        Format::TrackList,
        Format::Sha1List,
        Format::CupList,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::TrackList => "tracks",
            Self::Sha1List => "sha1",
            Self::CupList => "cups",
        }
    }

    /// Get the file extension for this format
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::TrackList | Self::Sha1List | Self::CupList => "txt",
        }
    }

    #[must_use]
    pub fn can_import(self) -> bool {
        matches!(self, Self::Json | Self::TrackList)
    }

    /// Guess the format from a file extension, falling back to the track list
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::TrackList,
        }
    }

    #[must_use]
    pub fn codec(self) -> &'static dyn Codec {
        match self {
            Self::Json => &JsonCodec,
            Self::TrackList => &TrackListCodec,
            Self::Sha1List => &Sha1ListCodec,
            Self::CupList => &CupListCodec,
        }
    }

    /// Import `data` with this format's codec
    pub fn import(self, distrib: &mut Distribution, data: &[u8]) -> Result<usize> {
        if !self.can_import() {
            return Err(Error::ExportOnlyFormat(self.as_str()));
        }
        tracing::debug!("Importing {} bytes as {}", data.len(), self);
        self.codec().import(distrib, data)
    }

    /// Export with this format's codec
    pub fn export(self, distrib: &mut Distribution) -> Result<Vec<u8>> {
        tracing::debug!("Exporting distribution as {}", self);
        self.codec().export(distrib)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "tracks" | "track-list" | "list" => Ok(Self::TrackList),
            "sha1" | "sha1-list" => Ok(Self::Sha1List),
            "cups" | "cup-list" => Ok(Self::CupList),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Split a text line into whitespace-separated words, keeping `"quoted words"`
/// together and dropping the quotes
pub(crate) fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut word = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(escaped) => word.push(escaped),
                        None => return Err("unterminated escape".to_string()),
                    },
                    Some(c) => word.push(c),
                    None => return Err("unterminated quoted string".to_string()),
                }
            }
            words.push(word);
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            words.push(word);
        }
    }
    Ok(words)
}

/// Quote a string for the text formats
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Parse a decimal or `0x` hexadecimal number
pub(crate) fn parse_number(word: &str) -> Option<u32> {
    match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => word.parse().ok(),
    }
}
