//! Codecs
//!
//! Three independent encodings, each a visitor over [`Value`](crate::Value):
//!
//! - [`api`]: locale-invariant text for other processes, round-trip safe
//! - [`display`]: text for people, honoring metadata formats and units
//! - [`binary`]: fixed little-endian layout, round-trip safe
//!
//! The API string and binary formats are the wire contract; their output must
//! stay byte-for-byte stable.

pub mod api;
pub mod array_text;
pub mod binary;
pub mod display;
pub mod text;

pub use api::{ApiStringDecoder, ApiStringEncoder, from_api_string, to_api_string};
pub use binary::{BinaryDecoder, BinaryEncoder, from_binary, to_binary};
pub use display::{
    DisplayFormatter, DisplayLocale, NumberFormat, to_display_string, to_localized_display_string,
};
