//! Reader and writer for RenderWare TXD texture dictionaries.
//!
//! Supports PC native textures (Direct3D 8 as used by GTA III and Vice City,
//! Direct3D 9 as used by San Andreas). Pixel data is kept as opaque byte
//! blobs, one per mipmap level; nothing is decompressed.
//!
//! Texture names are compared ASCII case-insensitively. A dictionary holding
//! two textures with the same name loads with a [`Warning::DuplicateName`]
//! but can not be saved.
//!
//! ```
//! use rw_txd::{Codec, Platform, RasterFormat, PixelFormat, TextureDictionary, TextureEntry};
//!
//! # fn main() -> rw_txd::Result<()> {
//! let texture = TextureEntry {
//!     platform: Platform::D3D9,
//!     filter: 6,
//!     address_u: 1,
//!     address_v: 1,
//!     name: "wall01".into(),
//!     mask: String::new(),
//!     raster_format: RasterFormat::empty().with_pixel_format(PixelFormat::C8888),
//!     d3d_format: 21,
//!     width: 1,
//!     height: 1,
//!     depth: 32,
//!     raster_type: 4,
//!     flags: 1,
//!     palette: None,
//!     mipmaps: vec![vec![0xFF, 0x00, 0x00, 0xFF]],
//! };
//! let dictionary = TextureDictionary {
//!     textures: vec![texture],
//!     ..TextureDictionary::default()
//! };
//!
//! let loaded = TextureDictionary::load(&dictionary.save()?)?;
//! assert_eq!(loaded.value, dictionary);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod reader;
pub mod types;
pub mod writer;

pub use reader::read_dictionary;
pub use rw_core::{Codec, Decoded, FormatError, Result, RwVersion, Warning};
pub use types::{
    Compression, PixelFormat, Platform, RasterFormat, TextureDictionary, TextureEntry,
};
pub use writer::{validate, write_dictionary};

impl Codec for TextureDictionary {
    const EXTENSION: &'static str = "txd";
    const DESCRIPTION: &'static str = "TXD - RenderWare Texture Dictionary";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_dictionary(bytes)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_dictionary(self)
    }
}
