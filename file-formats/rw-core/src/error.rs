use thiserror::Error;

/// Errors produced while decoding or encoding any of the supported formats.
///
/// Every variant carries enough context (byte offset, chunk tag or line
/// number) for a caller to produce a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes remain than a chunk or section header needs
    #[error("truncated header at offset {offset:#x}: need {needed} bytes, {available} available")]
    TruncatedHeader {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A declared length or element count runs past the end of its buffer
    #[error("invalid length at offset {offset:#x}: {declared} bytes declared, {available} available")]
    InvalidLength {
        offset: usize,
        declared: u64,
        available: usize,
    },

    /// A chunk payload was not consumed exactly
    #[error(
        "chunk {chunk} at offset {offset:#x} declares {declared} bytes but {consumed} were consumed"
    )]
    ChunkSizeMismatch {
        chunk: String,
        offset: usize,
        declared: u32,
        consumed: usize,
    },

    /// A required chunk was not found where the format expects it
    #[error("unexpected chunk at offset {offset:#x}: expected {expected}, found {found}")]
    UnexpectedChunk {
        offset: usize,
        expected: String,
        found: String,
    },

    /// A fourcc signature did not match
    #[error("invalid magic at offset {offset:#x}: expected {expected}, found {found:?}")]
    InvalidMagic {
        offset: usize,
        expected: String,
        found: String,
    },

    /// An index or structural invariant of the in-memory value is violated
    #[error("invalid model: {0}")]
    InvalidModel(String),

    /// Two entries share a name that must be unique
    #[error("duplicate name: {0:?}")]
    DuplicateName(String),

    /// A shape kind whose record size is unknown
    #[error("unsupported shape kind {kind} at offset {offset:#x}")]
    UnsupportedShape { offset: usize, kind: String },

    /// Keyframe times decrease inside a bone track
    #[error("animation {animation}, track {track}: keyframe {keyframe} is earlier than its predecessor")]
    InvalidKeyframeOrder {
        animation: usize,
        track: usize,
        keyframe: usize,
    },

    /// A table row has the wrong number of fields for its row type
    #[error("line {line}: expected {} fields, found {found}", join_arities(.expected))]
    ArityMismatch {
        line: usize,
        expected: Vec<usize>,
        found: usize,
    },

    /// A table field could not be parsed (field numbers are 1-based)
    #[error("line {line}: field {field} is malformed: {value:?}")]
    MalformedField {
        line: usize,
        field: usize,
        value: String,
    },

    /// The data uses a format revision or platform this crate does not handle
    #[error("unsupported format version: {0}")]
    UnsupportedFormatVersion(String),
}

fn join_arities(expected: &[usize]) -> String {
    match expected {
        [] => "no".to_string(),
        [single] => single.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(ToString::to_string).collect();
            format!("{} or {last}", head.join(", "))
        }
    }
}

/// Result type used by all codecs
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_display() {
        let error = FormatError::ArityMismatch {
            line: 4,
            expected: vec![9],
            found: 8,
        };
        assert_eq!(error.to_string(), "line 4: expected 9 fields, found 8");

        let error = FormatError::ArityMismatch {
            line: 2,
            expected: vec![11, 12, 13],
            found: 10,
        };
        assert_eq!(
            error.to_string(),
            "line 2: expected 11, 12 or 13 fields, found 10"
        );
    }

    #[test]
    fn test_offsets_render_as_hex() {
        let error = FormatError::TruncatedHeader {
            offset: 0x20,
            needed: 12,
            available: 3,
        };
        assert_eq!(
            error.to_string(),
            "truncated header at offset 0x20: need 12 bytes, 3 available"
        );
    }
}
