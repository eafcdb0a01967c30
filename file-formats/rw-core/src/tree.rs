//! Structural dump of a RenderWare chunk stream
//!
//! RenderWare chunks do not say whether their payload holds nested chunks.
//! A payload is treated as a container when it splits exactly into
//! well-formed chunks carrying supported library versions; anything else is
//! a leaf. Struct and String payloads are always leaves.

use crate::chunk::{ChunkHeader, ChunkReader, ChunkTag};
use crate::error::Result;
use crate::version::RwVersion;

/// Nesting beyond this depth is reported as leaves
pub const MAX_DEPTH: usize = 64;

/// One chunk and the chunks nested in its payload
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkNode {
    pub tag: ChunkTag,
    /// Absolute offset of the chunk header
    pub offset: usize,
    /// Payload length in bytes
    pub length: u32,
    pub version: RwVersion,
    pub children: Vec<ChunkNode>,
}

impl ChunkNode {
    /// This node and every node below it
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// First node in depth-first order with `tag`
    pub fn find(&self, tag: ChunkTag) -> Option<&Self> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(tag))
    }
}

/// Every top-level chunk of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkTree {
    pub roots: Vec<ChunkNode>,
    /// Bytes after the last top-level chunk that do not form a chunk
    pub trailing: usize,
}

/// Walk a chunk stream.
///
/// The first chunk must be well formed with a supported version; later
/// top-level data that is not a chunk ends the walk and is counted in
/// [`ChunkTree::trailing`].
pub fn read_chunk_tree(bytes: &[u8]) -> Result<ChunkTree> {
    let mut reader = ChunkReader::new(bytes);
    let first = reader.read_chunk_header()?;
    first.version.check_supported()?;
    let payload = reader.chunk_payload(&first)?;
    let mut roots = vec![node(&first, payload, 0, 0)];

    while !reader.is_empty() {
        let mark = reader.clone();
        match reader.read_chunk_header() {
            Ok(header) if header.version.is_supported() => {
                let payload = reader.chunk_payload(&header)?;
                roots.push(node(&header, payload, 0, 0));
            }
            _ => {
                reader = mark;
                break;
            }
        }
    }

    Ok(ChunkTree {
        roots,
        trailing: reader.remaining(),
    })
}

/// `base` is the absolute offset of the buffer the header was read from
fn node(header: &ChunkHeader, payload: &[u8], base: usize, depth: usize) -> ChunkNode {
    let payload_at = base + header.offset;
    let children = match header.tag {
        ChunkTag::STRUCT | ChunkTag::STRING => Vec::new(),
        _ => children(payload, payload_at, depth + 1).unwrap_or_default(),
    };
    ChunkNode {
        tag: header.tag,
        offset: payload_at - ChunkHeader::SIZE,
        length: header.length,
        version: header.version,
        children,
    }
}

fn children(payload: &[u8], base: usize, depth: usize) -> Option<Vec<ChunkNode>> {
    if payload.len() < ChunkHeader::SIZE || depth >= MAX_DEPTH {
        return None;
    }
    let mut reader = ChunkReader::new(payload);
    let mut nodes = Vec::new();
    while !reader.is_empty() {
        let header = reader.read_chunk_header().ok()?;
        if !header.version.is_supported() {
            return None;
        }
        let body = reader.chunk_payload(&header).ok()?;
        nodes.push(node(&header, body, base, depth));
    }
    Some(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkWriter;
    use crate::error::FormatError;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<u8> {
        let mut writer = ChunkWriter::new(RwVersion::SAN_ANDREAS);
        {
            let mut dictionary = writer.begin_chunk(ChunkTag::TEXTURE_DICTIONARY);
            {
                let mut data = dictionary.begin_chunk(ChunkTag::STRUCT);
                // a struct payload that happens to look like a chunk header
                data.write_u32(ChunkTag::STRING.0);
                data.write_u32(0);
                data.write_u32(RwVersion::SAN_ANDREAS.library_id());
            }
            {
                let mut native = dictionary.begin_chunk(ChunkTag::TEXTURE_NATIVE);
                native.write_bytes(&[0xEE; 20]);
            }
            dictionary.write_empty_chunk(ChunkTag::EXTENSION);
        }
        writer.into_bytes()
    }

    #[test]
    fn test_nested_chunks() {
        let tree = read_chunk_tree(&sample()).unwrap();
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.trailing, 0);

        let root = &tree.roots[0];
        assert_eq!(root.tag, ChunkTag::TEXTURE_DICTIONARY);
        assert_eq!(root.offset, 0);
        assert_eq!(root.count(), 4);

        let tags: Vec<ChunkTag> = root.children.iter().map(|child| child.tag).collect();
        assert_eq!(
            tags,
            vec![ChunkTag::STRUCT, ChunkTag::TEXTURE_NATIVE, ChunkTag::EXTENSION]
        );
        // struct payloads are never split
        assert!(root.children[0].children.is_empty());
        assert_eq!(root.children[1].offset, 12 + 24);
        assert_eq!(root.children[1].length, 20);
        assert!(root.children[1].children.is_empty());
        assert_eq!(root.find(ChunkTag::EXTENSION).unwrap().offset, 12 + 24 + 32);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = sample();
        bytes.extend_from_slice(&[0; 5]);
        let tree = read_chunk_tree(&bytes).unwrap();
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.trailing, 5);
    }

    #[test]
    fn test_unsupported_first_chunk() {
        let mut bytes = sample();
        bytes[8..12].copy_from_slice(&1u32.to_le_bytes());
        assert!(matches!(
            read_chunk_tree(&bytes),
            Err(FormatError::UnsupportedFormatVersion(_))
        ));
        assert!(matches!(
            read_chunk_tree(&bytes[..7]),
            Err(FormatError::TruncatedHeader { .. })
        ));
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let mut bytes = Vec::new();
        for _ in 0..(MAX_DEPTH + 10) {
            let mut outer = Vec::new();
            outer.extend_from_slice(&ChunkTag::EXTENSION.0.to_le_bytes());
            outer.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
            outer.extend_from_slice(&RwVersion::SAN_ANDREAS.library_id().to_le_bytes());
            outer.extend_from_slice(&bytes);
            bytes = outer;
        }
        let tree = read_chunk_tree(&bytes).unwrap();
        assert_eq!(tree.roots[0].count(), MAX_DEPTH);
    }
}
