//! Extension to codec mapping
//!
//! The table of supported formats is fixed at compile time; every lookup is a
//! scan of [`FormatKind::ALL`]. Binary formats can also be recognised from
//! their leading bytes with [`FormatKind::detect`].

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Serialize;
use thiserror::Error;

use rw_col::CollisionFile;
use rw_core::{ChunkReader, ChunkTag, Codec, Decoded, FormatError, RwVersion};
use rw_dff::Clump;
use rw_ide::IdeFile;
use rw_ifp::AnimationPackage;
use rw_img::ImgArchive;
use rw_ipl::IplFile;
use rw_txd::TextureDictionary;

/// One of the supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FormatKind {
    Dff,
    Txd,
    Col,
    Ifp,
    Ide,
    Ipl,
    Img,
}

impl FormatKind {
    pub const ALL: [Self; 7] = [
        Self::Dff,
        Self::Txd,
        Self::Col,
        Self::Ifp,
        Self::Ide,
        Self::Ipl,
        Self::Img,
    ];

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dff => Clump::EXTENSION,
            Self::Txd => TextureDictionary::EXTENSION,
            Self::Col => CollisionFile::EXTENSION,
            Self::Ifp => AnimationPackage::EXTENSION,
            Self::Ide => IdeFile::EXTENSION,
            Self::Ipl => IplFile::EXTENSION,
            Self::Img => ImgArchive::EXTENSION,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Dff => Clump::DESCRIPTION,
            Self::Txd => TextureDictionary::DESCRIPTION,
            Self::Col => CollisionFile::DESCRIPTION,
            Self::Ifp => AnimationPackage::DESCRIPTION,
            Self::Ide => IdeFile::DESCRIPTION,
            Self::Ipl => IplFile::DESCRIPTION,
            Self::Img => ImgArchive::DESCRIPTION,
        }
    }

    /// Case-insensitive lookup; a leading dot is allowed
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(extension))
    }

    /// Kind selected by a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|extension| extension.to_str())
            .and_then(Self::from_extension)
    }

    /// Recognise a binary format from its leading bytes.
    ///
    /// RenderWare streams are matched on the top-level chunk tag and a 3.x
    /// library version; the other binary formats on their signature. The
    /// text tables and version 1 archives have no signature and give `None`.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match bytes.get(..4)? {
            b"COLL" | b"COL2" | b"COL3" | b"COL4" => return Some(Self::Col),
            b"ANPK" | b"ANP3" => return Some(Self::Ifp),
            b"VER2" => return Some(Self::Img),
            _ => {}
        }

        let mut reader = ChunkReader::new(bytes);
        let tag = ChunkTag(reader.read_u32().ok()?);
        reader.read_u32().ok()?;
        let version = RwVersion::from_library_id(reader.read_u32().ok()?);
        if !version.is_supported() {
            return None;
        }
        match tag {
            ChunkTag::CLUMP => Some(Self::Dff),
            ChunkTag::TEXTURE_DICTIONARY => Some(Self::Txd),
            _ => None,
        }
    }

    /// Decode `bytes` with this kind's codec
    pub fn load(self, bytes: &[u8]) -> rw_core::Result<Decoded<Asset>> {
        Ok(match self {
            Self::Dff => Clump::load(bytes)?.map(Asset::Model),
            Self::Txd => TextureDictionary::load(bytes)?.map(Asset::TextureDictionary),
            Self::Col => CollisionFile::load(bytes)?.map(Asset::Collision),
            Self::Ifp => AnimationPackage::load(bytes)?.map(Asset::Animation),
            Self::Ide => IdeFile::load(bytes)?.map(Asset::Definitions),
            Self::Ipl => IplFile::load(bytes)?.map(Asset::Placements),
            Self::Img => ImgArchive::load(bytes)?.map(Asset::Archive),
        })
    }
}

/// Map an extension to its codec
pub fn dispatch(extension: &str) -> Option<FormatKind> {
    FormatKind::from_extension(extension)
}

/// `(extension, description)` for every supported format
pub fn list_supported_formats() -> Vec<(&'static str, &'static str)> {
    FormatKind::ALL
        .into_iter()
        .map(|kind| (kind.extension(), kind.describe()))
        .collect()
}

/// A decoded file of any supported format
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "format", content = "value")]
pub enum Asset {
    Model(Clump),
    TextureDictionary(TextureDictionary),
    Collision(CollisionFile),
    Animation(AnimationPackage),
    Definitions(IdeFile),
    Placements(IplFile),
    Archive(ImgArchive),
}

impl Asset {
    pub fn kind(&self) -> FormatKind {
        match self {
            Self::Model(_) => FormatKind::Dff,
            Self::TextureDictionary(_) => FormatKind::Txd,
            Self::Collision(_) => FormatKind::Col,
            Self::Animation(_) => FormatKind::Ifp,
            Self::Definitions(_) => FormatKind::Ide,
            Self::Placements(_) => FormatKind::Ipl,
            Self::Archive(_) => FormatKind::Img,
        }
    }

    /// Encode with the matching codec
    pub fn save(&self) -> rw_core::Result<Vec<u8>> {
        match self {
            Self::Model(value) => value.save(),
            Self::TextureDictionary(value) => value.save(),
            Self::Collision(value) => value.save(),
            Self::Animation(value) => value.save(),
            Self::Definitions(value) => value.save(),
            Self::Placements(value) => value.save(),
            Self::Archive(value) => value.save(),
        }
    }
}

/// Failures of the path based helpers
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("{}: no codec handles this extension", .0.display())]
    UnknownExtension(PathBuf),

    #[error("{}: a {found:?} asset can not be saved as {expected:?}", path.display())]
    KindMismatch {
        path: PathBuf,
        expected: FormatKind,
        found: FormatKind,
    },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

fn kind_for(path: &Path) -> Result<FormatKind, RegistryError> {
    FormatKind::from_path(path).ok_or_else(|| RegistryError::UnknownExtension(path.to_path_buf()))
}

fn read(path: &Path) -> Result<Vec<u8>, RegistryError> {
    fs::read(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode a file, choosing the codec by extension.
///
/// An `.img` file without the `VER2` signature is read as a version 1
/// archive together with the `.dir` file next to it.
pub fn load_path(path: impl AsRef<Path>) -> Result<Decoded<Asset>, RegistryError> {
    let path = path.as_ref();
    let kind = kind_for(path)?;
    let bytes = read(path)?;
    debug!("loading {} ({} bytes) as {kind:?}", path.display(), bytes.len());

    let decoded = if kind == FormatKind::Img && !bytes.starts_with(b"VER2") {
        let dir_path = path.with_extension("dir");
        let dir = read(&dir_path)?;
        debug!("reading version 1 directory {}", dir_path.display());
        rw_img::read_archive_v1(&dir, &bytes).map(|decoded| decoded.map(Asset::Archive))
    } else {
        kind.load(&bytes)
    };
    decoded.map_err(|source| RegistryError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode an asset and write it to `path`, whose extension must match the asset
pub fn save_path(path: impl AsRef<Path>, asset: &Asset) -> Result<(), RegistryError> {
    let path = path.as_ref();
    let expected = kind_for(path)?;
    if expected != asset.kind() {
        return Err(RegistryError::KindMismatch {
            path: path.to_path_buf(),
            expected,
            found: asset.kind(),
        });
    }
    let bytes = asset.save().map_err(|source| RegistryError::Format {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("writing {} bytes to {}", bytes.len(), path.display());
    fs::write(path, bytes).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })
}
