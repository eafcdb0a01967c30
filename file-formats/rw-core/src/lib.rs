//! Shared building blocks for the RenderWare asset codecs.
//!
//! Every binary format handled by this workspace is built from the same
//! primitive: a tagged, length-prefixed record. RenderWare streams (`.dff`,
//! `.txd`) use a 12-byte chunk header carrying a type id, a payload length and
//! a packed library version. The collision and animation formats (`.col`,
//! `.ifp`) use an 8-byte `fourcc + length` section header. [`ChunkReader`] and
//! [`ChunkWriter`] handle both.
//!
//! ## Reading
//!
//! ```
//! use rw_core::{ChunkReader, ChunkTag, ChunkWriter, RwVersion};
//!
//! # fn main() -> rw_core::Result<()> {
//! let mut writer = ChunkWriter::new(RwVersion::SAN_ANDREAS);
//! {
//!     let mut data = writer.begin_chunk(ChunkTag::STRUCT);
//!     data.write_u32(42);
//! }
//! let bytes = writer.into_bytes();
//!
//! let mut reader = ChunkReader::new(&bytes);
//! let header = reader.expect_chunk(ChunkTag::STRUCT)?;
//! let value = reader.enter_chunk(&header, |payload| payload.read_u32())?;
//! assert_eq!(value, 42);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`chunk`]: chunk and section traversal, scoped writers
//! - [`version`]: RenderWare library id packing
//! - [`codec`]: the [`Codec`] capability trait, [`Decoded`] results and [`Warning`]s
//! - [`tree`]: structural dump of nested chunks
//! - [`text`]: sectioned, comma-delimited text used by the placement and definition tables
//! - [`error`]: the shared [`FormatError`] taxonomy

#![forbid(unsafe_code)]

pub mod chunk;
pub mod codec;
pub mod error;
pub mod text;
pub mod tree;
pub mod version;

pub use chunk::{ChunkHeader, ChunkReader, ChunkScope, ChunkTag, ChunkWriter, SectionHeader};
pub use codec::{Codec, Decoded, Warning};
pub use error::{FormatError, Result};
pub use tree::{ChunkNode, ChunkTree, read_chunk_tree};
pub use version::{Game, RwVersion};
