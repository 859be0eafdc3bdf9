//! Icon font generation from directories of SVG files, and the runtime
//! representation of the metadata describing the generated fonts.
//!
//! The `svg2font` binary assigns every `.svg` below a directory a successive
//! character (starting at `U+E000` by default), scales it to exactly one em
//! and writes a TrueType font. It can also emit a C++ lookup table and a
//! metadata file describing which file ended up as which character.
//!
//! # Usage
//! ## RON
//! ```
//! # fn test() -> Result<(), ron::error::SpannedError> {
//! // Requires Cargo feature `serde-deserialize` and the `ron` crate:
//! const FONT_METADATA: &str = r#"(
//!     font_name: "Icons",
//!     units_per_em: 1024,
//!     ascent: 819,
//!     descent: 205,
//!     glyphs: [(codepoint: '', path: "arrows/left.svg", advance_width: 1024)],
//! )"#;
//! let font: svg2font::IconFont = ron::from_str(FONT_METADATA)?;
//! assert_eq!(font.codepoint_of("arrows/left.svg"), Some('\u{e000}'));
//! # Ok(())
//! # }
//! # test().unwrap();
//! ```
//!
//! ## JSON
//! ```
//! # fn test() -> Result<(), serde_json::Error> {
//! // Requires Cargo feature `serde-deserialize` and the `serde_json` crate:
//! const FONT_METADATA: &str = r#"{
//!     "font_name": "Icons",
//!     "units_per_em": 1024,
//!     "ascent": 819,
//!     "descent": 205,
//!     "glyphs": [{ "codepoint": "\ue000", "path": "arrows/left.svg", "advance_width": 1024 }]
//! }"#;
//! let font: svg2font::IconFont = serde_json::from_str(FONT_METADATA)?;
//! assert_eq!(font.glyph('\u{e000}').map(|g| g.advance_width), Some(1024));
//! # Ok(())
//! # }
//! # test().unwrap();
//! ```
//!
//! ## RKYV
//! Metadata written with the `.rkyv` extension can be accessed zero-copy with
//! `rkyv::archived_root::<IconFont>`, given the bytes are suitably aligned.
//! Unpacking the archive requires the Cargo feature `rkyv-deserialize`.

#![cfg_attr(docs_rs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]

mod meta;

pub use meta::{IconFont, IconGlyph};

#[cfg(feature = "bin")]
pub mod backend;
#[cfg(feature = "bin")]
mod cli;
#[cfg(feature = "bin")]
pub mod config;
#[cfg(feature = "bin")]
pub mod emit;
#[cfg(feature = "bin")]
mod error;
#[cfg(feature = "bin")]
pub mod font;
#[cfg(feature = "bin")]
pub mod importer;
#[cfg(feature = "bin")]
pub mod outline;
#[cfg(feature = "bin")]
pub mod svg;
#[cfg(feature = "bin")]
pub mod ttf;
#[cfg(feature = "bin")]
pub mod walker;

#[cfg(feature = "bin")]
pub use cli::{Args, svg_to_font};
#[cfg(feature = "bin")]
pub use config::{Config, DirectionPolicy};
#[cfg(feature = "bin")]
pub use error::{Error, Result};
