//! The load/save capability shared by every format

use std::fmt;

use crate::chunk::ChunkTag;
use crate::error::Result;

/// A non-fatal observation made while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Warning {
    /// Two entries share a name; lookups by name resolve to the first
    DuplicateName {
        name: String,
        first: usize,
        duplicate: usize,
    },
    /// A chunk that is not part of the modelled data was skipped
    SkippedChunk { tag: ChunkTag, offset: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName {
                name,
                first,
                duplicate,
            } => write!(
                f,
                "entry {duplicate} reuses the name {name:?} of entry {first}"
            ),
            Self::SkippedChunk { tag, offset } => {
                write!(f, "skipped chunk {tag} at offset {offset:#x}")
            }
        }
    }
}

/// A decoded value together with any warnings raised while decoding it
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Decoded<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    /// Drop the warnings and keep the value
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

/// A file format that can be decoded from and encoded to a byte buffer.
///
/// `save` followed by `load` yields a value equal to the one saved.
pub trait Codec: Sized {
    /// File extension without the leading dot, lower case
    const EXTENSION: &'static str;
    /// One line description of the format
    const DESCRIPTION: &'static str;

    /// Decode a complete file
    fn load(bytes: &[u8]) -> Result<Decoded<Self>>;

    /// Validate and encode
    fn save(&self) -> Result<Vec<u8>>;
}
