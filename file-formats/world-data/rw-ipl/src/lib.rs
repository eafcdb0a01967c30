//! Parser and writer for GTA item placement (`.ipl`) tables.
//!
//! Same outer grammar as IDE files: named sections closed by `end`, comma
//! separated rows and `#` comments. Two sections are typed:
//!
//! - `inst` places an object. The field count identifies the game:
//!   12 for GTA III, 13 for Vice City (adds an interior), 11 for San Andreas
//!   (interior and LOD index, no scale).
//! - `zone` declares a named box: `name, type, min, max, level`.
//!
//! Everything else (`cull`, `pick`, `path`, `occl`, `grge`, ...) is kept as raw
//! fields. Positions, scales and rotations are written with six decimals.
//!
//! The binary placement streams San Andreas stores inside IMG archives start
//! with `bnry` and are rejected with [`FormatError::UnsupportedFormatVersion`].

#![forbid(unsafe_code)]

pub mod parser;
pub mod types;
pub mod writer;

pub use parser::{parse, read_placements};
pub use rw_core::{Codec, Decoded, FormatError, Result, Warning};
pub use types::{Instance, InstanceLayout, IplFile, IplRows, IplSection, SectionKind, Zone};
pub use writer::{serialize, validate, write_placements};

impl Codec for IplFile {
    const EXTENSION: &'static str = "ipl";
    const DESCRIPTION: &'static str = "IPL - Item Placement File";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_placements(bytes).map(Decoded::new)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_placements(self)
    }
}
