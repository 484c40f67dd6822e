//! Error types for `LeDistrib`

use std::path::PathBuf;

use thiserror::Error;

use crate::track::TrackType;

/// The error type for distribution operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Slot Table Errors ====================
    /// The slot number lies outside the slot table.
    #[error("slot {slot} out of range (max {max})")]
    SlotOutOfRange {
        /// The rejected slot number.
        slot: usize,
        /// The number of addressable slots.
        max: usize,
    },

    /// No unused slot is left for the requested track type.
    #[error("no free slot available for {track_type} tracks")]
    NoFreeSlot {
        /// The type that could not be placed.
        track_type: TrackType,
    },

    /// No run of adjacent unused slots is left in the standard range.
    #[error("no run of {count} free {track_type} slots available")]
    NoFreeRun {
        /// The type whose standard range was searched.
        track_type: TrackType,
        /// The requested run length.
        count: usize,
    },

    /// The slot is not a committed track.
    #[error("slot {0} is not an active track")]
    InactiveSlot(usize),

    // ==================== Cup Table Errors ====================
    /// The cup table reached its maximum number of cups.
    #[error("{cup_type} cup table full ({max} cups)")]
    CupTableFull {
        /// Name of the full table.
        cup_type: &'static str,
        /// Maximum number of cups.
        max: usize,
    },

    // ==================== Codec Errors ====================
    /// A checksum string is not 40 hex digits.
    #[error("invalid SHA1 checksum: {0}")]
    InvalidSha1(String),

    /// A line of a text format could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// The requested format cannot be read, only written.
    #[error("format {0} is export-only")]
    ExportOnlyFormat(&'static str),

    /// Unknown format name.
    #[error("unknown format: {0}")]
    UnknownFormat(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// UTF-8 conversion error.
    #[error("UTF-8 conversion error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),

    // ==================== Config Errors ====================
    /// The TOML configuration could not be parsed.
    #[error("config error: {0}")]
    ConfigError(#[from] toml::de::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidSha1(err.to_string())
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for distribution operations.
pub type Result<T> = std::result::Result<T, Error>;
