//! Track records and the conventional slot layout
//!
//! A [`Track`] is the data of one slot. Its [`TrackStatus`] decides whether the
//! slot is free storage (`Invalid`, `Valid`, `Fail`) or a committed track that
//! cups may reference (`Active`, `Fill`, `Export`).

pub mod layout;
mod record;
pub mod standard;
mod types;

pub use record::{Track, TrackField};
pub use types::{Sha1, TrackFlags, TrackStatus, TrackType};
