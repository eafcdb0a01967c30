//! RenderWare library id handling
//!
//! Chunk headers carry a packed 32-bit "library id". Streams written by
//! RenderWare 3.1 and earlier store `version >> 8`; later streams pack the
//! version and a 16-bit build number:
//!
//! ```text
//! bits 30..=14  (version - 0x30000) & 0x3FF00
//! bits 21..=16  version & 0x3F
//! bits 15..=0   build
//! ```

use std::fmt;

use crate::error::{FormatError, Result};

/// Games built on RenderWare 3.x, as identified by the library version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Game {
    Gta3,
    ViceCity,
    SanAndreas,
    LibertyCityStories,
    ViceCityStories,
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gta3 => "GTA III",
            Self::ViceCity => "Vice City",
            Self::SanAndreas => "San Andreas",
            Self::LibertyCityStories => "Liberty City Stories",
            Self::ViceCityStories => "Vice City Stories",
        };
        f.write_str(name)
    }
}

/// Raw library id as stored in a chunk header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RwVersion(u32);

impl RwVersion {
    /// GTA III (PC), RenderWare 3.2.0.0
    pub const GTA3: Self = Self(0x0800_FFFF);
    /// Vice City (PC), RenderWare 3.4.0.3
    pub const VICE_CITY: Self = Self(0x1003_FFFF);
    /// San Andreas (all platforms), RenderWare 3.6.0.3
    pub const SAN_ANDREAS: Self = Self(0x1803_FFFF);

    /// Wrap a raw library id read from a chunk header
    pub const fn from_library_id(library_id: u32) -> Self {
        Self(library_id)
    }

    /// Pack a version number such as `0x36003` together with a build number
    pub const fn from_version(version: u32, build: u16) -> Self {
        if version <= 0x31000 {
            Self(version >> 8)
        } else {
            Self(
                (((version - 0x30000) & 0x3FF00) << 14)
                    | ((version & 0x3F) << 16)
                    | build as u32,
            )
        }
    }

    /// The raw value written to chunk headers
    pub const fn library_id(self) -> u32 {
        self.0
    }

    /// Unpacked version number, e.g. `0x36003` for 3.6.0.3
    pub const fn version(self) -> u32 {
        if self.0 & 0xFFFF_0000 != 0 {
            (((self.0 >> 14) & 0x3FF00) + 0x30000) | ((self.0 >> 16) & 0x3F)
        } else {
            self.0 << 8
        }
    }

    /// Build number (zero for old-style ids)
    pub const fn build(self) -> u16 {
        if self.0 & 0xFFFF_0000 != 0 {
            (self.0 & 0xFFFF) as u16
        } else {
            0
        }
    }

    /// Whether the unpacked version falls inside the RenderWare 3.x range
    pub const fn is_supported(self) -> bool {
        let version = self.version();
        version >= 0x30000 && version <= 0x3FFFF
    }

    /// The game that usually ships assets of this version.
    ///
    /// 3.4.0.3 is reported as Vice City (PC) although some early San Andreas
    /// and mobile GTA III assets carry it too.
    pub const fn game(self) -> Option<Game> {
        match self.version() {
            0x31001 | 0x32000 => Some(Game::Gta3),
            0x33002 | 0x34003 => Some(Game::ViceCity),
            0x35000 => Some(Game::LibertyCityStories),
            0x35002 => Some(Game::ViceCityStories),
            0x36003 => Some(Game::SanAndreas),
            _ => None,
        }
    }

    /// Fail with [`FormatError::UnsupportedFormatVersion`] outside the 3.x range
    pub fn check_supported(self) -> Result<Self> {
        if self.is_supported() {
            Ok(self)
        } else {
            Err(FormatError::UnsupportedFormatVersion(format!(
                "RenderWare library id {:#010x} ({self})",
                self.0
            )))
        }
    }
}

impl Default for RwVersion {
    fn default() -> Self {
        Self::SAN_ANDREAS
    }
}

impl fmt::Display for RwVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version();
        write!(
            f,
            "{}.{}.{}.{}",
            version >> 16,
            (version >> 12) & 0xF,
            (version >> 8) & 0xF,
            version & 0xFF
        )
    }
}
