//! Texture dictionary data structures

use bitflags::bitflags;
use rw_core::RwVersion;
use std::fmt;

/// Native texture platform id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    /// Direct3D 8 (GTA III, Vice City)
    D3D8,
    /// Direct3D 9 (San Andreas)
    D3D9,
}

impl Platform {
    pub fn id(self) -> u32 {
        match self {
            Self::D3D8 => 8,
            Self::D3D9 => 9,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            8 => Some(Self::D3D8),
            9 => Some(Self::D3D9),
            _ => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::D3D8 => write!(f, "Direct3D 8"),
            Self::D3D9 => write!(f, "Direct3D 9"),
        }
    }
}

bitflags! {
    /// Raster format word.
    ///
    /// Bits 8 to 11 hold the [`PixelFormat`]; the named flags are the high bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct RasterFormat: u32 {
        /// Mipmaps are generated by the engine
        const AUTO_MIPMAP = 0x1000;
        /// 8-bit palette
        const PAL8 = 0x2000;
        /// 4-bit palette
        const PAL4 = 0x4000;
        /// Raster carries mipmaps
        const MIPMAP = 0x8000;
    }
}

const PIXEL_FORMAT_MASK: u32 = 0x0F00;

/// Pixel layout of a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelFormat {
    Default,
    C1555,
    C565,
    C4444,
    Lum8,
    C8888,
    C888,
    D16,
    D24,
    D32,
    C555,
    Unknown(u8),
}

impl PixelFormat {
    pub fn from_code(code: u8) -> Self {
        match code {
            0x0 => Self::Default,
            0x1 => Self::C1555,
            0x2 => Self::C565,
            0x3 => Self::C4444,
            0x4 => Self::Lum8,
            0x5 => Self::C8888,
            0x6 => Self::C888,
            0x7 => Self::D16,
            0x8 => Self::D24,
            0x9 => Self::D32,
            0xA => Self::C555,
            other => Self::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Default => 0x0,
            Self::C1555 => 0x1,
            Self::C565 => 0x2,
            Self::C4444 => 0x3,
            Self::Lum8 => 0x4,
            Self::C8888 => 0x5,
            Self::C888 => 0x6,
            Self::D16 => 0x7,
            Self::D24 => 0x8,
            Self::D32 => 0x9,
            Self::C555 => 0xA,
            Self::Unknown(other) => other & 0x0F,
        }
    }
}

impl RasterFormat {
    pub fn pixel_format(self) -> PixelFormat {
        PixelFormat::from_code(((self.bits() & PIXEL_FORMAT_MASK) >> 8) as u8)
    }

    /// Replace the pixel format bits, keeping the flags
    pub fn with_pixel_format(self, format: PixelFormat) -> Self {
        Self::from_bits_retain(
            (self.bits() & !PIXEL_FORMAT_MASK) | (u32::from(format.code()) << 8),
        )
    }

    /// Palette size in bytes implied by the palette flags
    pub fn palette_len(self) -> Option<usize> {
        if self.contains(Self::PAL8) {
            Some(PALETTE8_LEN)
        } else if self.contains(Self::PAL4) {
            Some(PALETTE4_LEN)
        } else {
            None
        }
    }
}

/// 256 RGBA entries
pub const PALETTE8_LEN: usize = 256 * 4;
/// PC rasters store 32 RGBA entries for 4-bit palettes
pub const PALETTE4_LEN: usize = 32 * 4;

/// Block compression of a native texture's pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compression {
    Dxt1,
    Dxt3,
    Dxt5,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dxt1 => write!(f, "DXT1"),
            Self::Dxt3 => write!(f, "DXT3"),
            Self::Dxt5 => write!(f, "DXT5"),
        }
    }
}

const FOURCC_DXT1: u32 = u32::from_le_bytes(*b"DXT1");
const FOURCC_DXT3: u32 = u32::from_le_bytes(*b"DXT3");
const FOURCC_DXT5: u32 = u32::from_le_bytes(*b"DXT5");

/// One native texture
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureEntry {
    pub platform: Platform,
    pub filter: u8,
    pub address_u: u8,
    pub address_v: u8,
    /// At most 31 bytes
    pub name: String,
    /// Alpha mask name, at most 31 bytes
    pub mask: String,
    pub raster_format: RasterFormat,
    /// `D3DFORMAT` on Direct3D 9; the has-alpha flag on Direct3D 8
    pub d3d_format: u32,
    pub width: u16,
    pub height: u16,
    /// Bits per pixel
    pub depth: u8,
    pub raster_type: u8,
    /// Compression id on Direct3D 8; alpha/cube/compressed bits on Direct3D 9
    pub flags: u8,
    /// Present exactly when the raster format carries a palette flag
    pub palette: Option<Vec<u8>>,
    /// Opaque pixel data, largest level first
    pub mipmaps: Vec<Vec<u8>>,
}

impl TextureEntry {
    /// Block compression, if the pixel data is DXT compressed
    pub fn compression(&self) -> Option<Compression> {
        match self.platform {
            Platform::D3D8 => match self.flags {
                1 => Some(Compression::Dxt1),
                3 => Some(Compression::Dxt3),
                5 => Some(Compression::Dxt5),
                _ => None,
            },
            Platform::D3D9 => match self.d3d_format {
                FOURCC_DXT1 => Some(Compression::Dxt1),
                FOURCC_DXT3 => Some(Compression::Dxt3),
                FOURCC_DXT5 => Some(Compression::Dxt5),
                _ => None,
            },
        }
    }

    /// Total bytes of pixel data over all levels
    pub fn data_len(&self) -> usize {
        self.mipmaps.iter().map(Vec::len).sum()
    }

    pub(crate) fn filter_word(&self) -> u32 {
        u32::from(self.filter)
            | (u32::from(self.address_u & 0x0F) << 8)
            | (u32::from(self.address_v & 0x0F) << 12)
    }
}

/// A named collection of native textures
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureDictionary {
    pub version: RwVersion,
    pub device_id: u16,
    pub textures: Vec<TextureEntry>,
}

impl TextureDictionary {
    /// Look a texture up by name; names compare ASCII case-insensitively
    /// and the first match wins
    pub fn get(&self, name: &str) -> Option<&TextureEntry> {
        self.textures
            .iter()
            .find(|texture| texture.name.eq_ignore_ascii_case(name))
    }

    /// Pairs of `(first, duplicate)` indices of textures sharing a name
    pub fn duplicate_names(&self) -> Vec<(usize, usize)> {
        let mut duplicates = Vec::new();
        for (index, texture) in self.textures.iter().enumerate() {
            if let Some(first) = self.textures[..index]
                .iter()
                .position(|earlier| earlier.name.eq_ignore_ascii_case(&texture.name))
            {
                duplicates.push((first, index));
            }
        }
        duplicates
    }
}
