//! Reader and writer for GTA IMG streaming archives.
//!
//! An archive is a directory of named files whose offsets and sizes are
//! counted in 2048-byte sectors. Two layouts exist:
//!
//! - version 1 (GTA III, Vice City) keeps the directory in a separate `.dir`
//!   file of 32-byte records; see [`read_archive_v1`] and [`write_archive_v1`]
//! - version 2 (San Andreas) starts the `.img` file with `VER2`, an entry
//!   count and the directory
//!
//! The [`Codec`] implementation reads and writes version 2.
//!
//! ```
//! use rw_img::{Codec, ImgArchive};
//!
//! # fn main() -> rw_img::Result<()> {
//! let mut archive = ImgArchive::default();
//! archive.add("player.dff", vec![0xAB; 100]);
//!
//! let loaded = ImgArchive::load(&archive.save()?)?.value;
//! assert_eq!(loaded.get("PLAYER.DFF").map(|entry| entry.data.len()), Some(2048));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod reader;
pub mod types;
pub mod writer;

pub use reader::{read_archive, read_archive_v1};
pub use rw_core::{Codec, Decoded, FormatError, Result, Warning};
pub use types::{ImgArchive, ImgEntry, SECTOR_SIZE};
pub use writer::{validate, write_archive, write_archive_v1};

impl Codec for ImgArchive {
    const EXTENSION: &'static str = "img";
    const DESCRIPTION: &'static str = "IMG - Streaming Archive";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_archive(bytes)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_archive(self)
    }
}
