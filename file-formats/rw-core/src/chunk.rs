//! Chunk and section traversal
//!
//! [`ChunkReader`] is a bounds-checked cursor over an in-memory buffer.
//! Entering a chunk hands a closure a sub-cursor limited to the chunk payload;
//! when the closure returns, the payload must have been consumed exactly.
//! [`ChunkWriter`] mirrors this: [`ChunkWriter::begin_chunk`] returns a
//! [`ChunkScope`] that back-patches the length field when dropped.

use byteorder::{ByteOrder, LittleEndian};
use glam::{Mat3, Quat, Vec2, Vec3};
use log::{debug, trace};
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::{FormatError, Result};
use crate::version::RwVersion;

/// RenderWare chunk type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChunkTag(pub u32);

impl ChunkTag {
    pub const STRUCT: Self = Self(0x01);
    pub const STRING: Self = Self(0x02);
    pub const EXTENSION: Self = Self(0x03);
    pub const CAMERA: Self = Self(0x05);
    pub const TEXTURE: Self = Self(0x06);
    pub const MATERIAL: Self = Self(0x07);
    pub const MATERIAL_LIST: Self = Self(0x08);
    pub const FRAME_LIST: Self = Self(0x0E);
    pub const GEOMETRY: Self = Self(0x0F);
    pub const CLUMP: Self = Self(0x10);
    pub const LIGHT: Self = Self(0x12);
    pub const ATOMIC: Self = Self(0x14);
    pub const TEXTURE_NATIVE: Self = Self(0x15);
    pub const TEXTURE_DICTIONARY: Self = Self(0x16);
    pub const GEOMETRY_LIST: Self = Self(0x1A);
    pub const MORPH_PLG: Self = Self(0x105);
    pub const SKIN_PLG: Self = Self(0x116);
    pub const HANIM_PLG: Self = Self(0x11E);
    pub const MATERIAL_EFFECTS_PLG: Self = Self(0x120);
    pub const BIN_MESH_PLG: Self = Self(0x50E);
    pub const NATIVE_DATA_PLG: Self = Self(0x510);
    pub const FRAME_NAME: Self = Self(0x0253_F2FE);

    /// Human readable name for well-known tags
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::STRUCT => "Struct",
            Self::STRING => "String",
            Self::EXTENSION => "Extension",
            Self::CAMERA => "Camera",
            Self::TEXTURE => "Texture",
            Self::MATERIAL => "Material",
            Self::MATERIAL_LIST => "Material List",
            Self::FRAME_LIST => "Frame List",
            Self::GEOMETRY => "Geometry",
            Self::CLUMP => "Clump",
            Self::LIGHT => "Light",
            Self::ATOMIC => "Atomic",
            Self::TEXTURE_NATIVE => "Texture Native",
            Self::TEXTURE_DICTIONARY => "Texture Dictionary",
            Self::GEOMETRY_LIST => "Geometry List",
            Self::MORPH_PLG => "Morph PLG",
            Self::SKIN_PLG => "Skin PLG",
            Self::HANIM_PLG => "HAnim PLG",
            Self::MATERIAL_EFFECTS_PLG => "Material Effects PLG",
            Self::BIN_MESH_PLG => "Bin Mesh PLG",
            Self::NATIVE_DATA_PLG => "Native Data PLG",
            Self::FRAME_NAME => "Frame Name",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({:#x})", self.0),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

/// Header of a RenderWare chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: ChunkTag,
    /// Payload length in bytes, excluding this header
    pub length: u32,
    pub version: RwVersion,
    /// Absolute offset of the payload
    pub offset: usize,
}

impl ChunkHeader {
    /// Size of a chunk header in bytes
    pub const SIZE: usize = 12;

    /// Absolute offset one past the end of the payload
    pub fn end(&self) -> usize {
        self.offset + self.length as usize
    }
}

/// Header of a `fourcc + length` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionHeader {
    pub magic: [u8; 4],
    pub length: u32,
    /// Absolute offset of the payload
    pub offset: usize,
}

impl SectionHeader {
    /// Size of a section header in bytes
    pub const SIZE: usize = 8;

    /// The fourcc as text
    pub fn magic_str(&self) -> String {
        decode_latin1(&self.magic)
    }
}

/// Decode single-byte text as used by every string field in these formats
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode text to single bytes; characters outside Latin-1 become `?`
pub fn encode_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Bounds-checked cursor over a byte buffer
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    /// Absolute offset of `data[0]` in the original buffer
    base: usize,
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    /// Open a buffer for reading
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            base: 0,
            pos: 0,
        }
    }

    /// Absolute position in the original buffer
    pub fn position(&self) -> usize {
        self.base + self.pos
    }

    /// Bytes left in the current scope
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread bytes of the current scope
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(FormatError::InvalidLength {
                offset: self.position(),
                declared: n as u64,
                available: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Fail unless `count` records of `size` bytes fit in the current scope.
    ///
    /// Call this before allocating for a count read from the file.
    pub fn ensure_available(&self, count: usize, size: usize) -> Result<()> {
        let needed = (count as u64).saturating_mul(size as u64);
        if needed > self.remaining() as u64 {
            return Err(FormatError::InvalidLength {
                offset: self.position(),
                declared: needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Read a 12-byte RenderWare chunk header
    pub fn read_chunk_header(&mut self) -> Result<ChunkHeader> {
        let start = self.position();
        if self.remaining() < ChunkHeader::SIZE {
            return Err(FormatError::TruncatedHeader {
                offset: start,
                needed: ChunkHeader::SIZE,
                available: self.remaining(),
            });
        }
        let bytes = self.take(ChunkHeader::SIZE)?;
        let tag = ChunkTag(LittleEndian::read_u32(&bytes[0..4]));
        let length = LittleEndian::read_u32(&bytes[4..8]);
        let version = RwVersion::from_library_id(LittleEndian::read_u32(&bytes[8..12]));

        if length as usize > self.remaining() {
            return Err(FormatError::InvalidLength {
                offset: start,
                declared: u64::from(length),
                available: self.remaining(),
            });
        }

        trace!("chunk {tag} at {start:#x}, {length} bytes, version {version}");
        Ok(ChunkHeader {
            tag,
            length,
            version,
            offset: self.position(),
        })
    }

    /// Read a chunk header and require a specific tag
    pub fn expect_chunk(&mut self, tag: ChunkTag) -> Result<ChunkHeader> {
        let header = self.read_chunk_header()?;
        if header.tag != tag {
            return Err(FormatError::UnexpectedChunk {
                offset: header.offset - ChunkHeader::SIZE,
                expected: tag.to_string(),
                found: header.tag.to_string(),
            });
        }
        Ok(header)
    }

    /// Read chunk headers until one carries `tag`, skipping any other chunk.
    ///
    /// Fails with [`FormatError::UnexpectedChunk`] when the scope ends first.
    pub fn find_chunk(&mut self, tag: ChunkTag) -> Result<ChunkHeader> {
        while !self.is_empty() {
            let header = self.read_chunk_header()?;
            if header.tag == tag {
                return Ok(header);
            }
            self.skip_chunk(&header)?;
        }
        Err(FormatError::UnexpectedChunk {
            offset: self.position(),
            expected: tag.to_string(),
            found: "end of chunk".to_string(),
        })
    }

    /// Run `f` over the payload of a chunk whose header was just read.
    ///
    /// The payload must be consumed exactly.
    pub fn enter_chunk<T, F>(&mut self, header: &ChunkHeader, f: F) -> Result<T>
    where
        F: FnOnce(&mut ChunkReader<'a>) -> Result<T>,
    {
        self.enter(header.offset, header.length, || header.tag.to_string(), f)
    }

    /// Read a Struct chunk and run `f` over its payload
    pub fn read_struct<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ChunkReader<'a>) -> Result<T>,
    {
        let header = self.expect_chunk(ChunkTag::STRUCT)?;
        self.enter_chunk(&header, f)
    }

    /// Read a String chunk. The text ends at the first NUL.
    pub fn read_string_chunk(&mut self) -> Result<String> {
        let header = self.expect_chunk(ChunkTag::STRING)?;
        let payload = self.take(header.length as usize)?;
        Ok(decode_c_string(payload))
    }

    /// Skip a chunk payload without interpreting it
    pub fn skip_chunk(&mut self, header: &ChunkHeader) -> Result<()> {
        debug!(
            "skipping chunk {} at {:#x} ({} bytes)",
            header.tag, header.offset, header.length
        );
        self.take(header.length as usize).map(|_| ())
    }

    /// Raw payload of a chunk
    pub fn chunk_payload(&mut self, header: &ChunkHeader) -> Result<&'a [u8]> {
        self.take(header.length as usize)
    }

    /// Skip an Extension chunk, logging the plugins it carries
    pub fn skip_extension(&mut self, header: &ChunkHeader) -> Result<()> {
        self.enter_chunk(header, |plugins| {
            while !plugins.is_empty() {
                let plugin = plugins.read_chunk_header()?;
                plugins.skip_chunk(&plugin)?;
            }
            Ok(())
        })
    }

    /// Skip every chunk left in the current scope
    pub fn skip_remaining_chunks(&mut self) -> Result<()> {
        while !self.is_empty() {
            let header = self.read_chunk_header()?;
            self.skip_chunk(&header)?;
        }
        Ok(())
    }

    /// Read an 8-byte `fourcc + length` section header
    pub fn read_section_header(&mut self) -> Result<SectionHeader> {
        let start = self.position();
        if self.remaining() < SectionHeader::SIZE {
            return Err(FormatError::TruncatedHeader {
                offset: start,
                needed: SectionHeader::SIZE,
                available: self.remaining(),
            });
        }
        let bytes = self.take(SectionHeader::SIZE)?;
        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        let length = LittleEndian::read_u32(&bytes[4..8]);

        if length as usize > self.remaining() {
            return Err(FormatError::InvalidLength {
                offset: start,
                declared: u64::from(length),
                available: self.remaining(),
            });
        }

        trace!(
            "section {} at {start:#x}, {length} bytes",
            decode_latin1(&magic)
        );
        Ok(SectionHeader {
            magic,
            length,
            offset: self.position(),
        })
    }

    /// Read a section header and require a specific fourcc
    pub fn expect_section(&mut self, magic: &[u8; 4]) -> Result<SectionHeader> {
        let header = self.read_section_header()?;
        if &header.magic != magic {
            return Err(FormatError::InvalidMagic {
                offset: header.offset - SectionHeader::SIZE,
                expected: decode_latin1(magic),
                found: header.magic_str(),
            });
        }
        Ok(header)
    }

    /// Run `f` over the payload of a section whose header was just read
    pub fn enter_section<T, F>(&mut self, header: &SectionHeader, f: F) -> Result<T>
    where
        F: FnOnce(&mut ChunkReader<'a>) -> Result<T>,
    {
        self.enter(header.offset, header.length, || header.magic_str(), f)
    }

    fn enter<T, F, L>(&mut self, offset: usize, length: u32, label: L, f: F) -> Result<T>
    where
        F: FnOnce(&mut ChunkReader<'a>) -> Result<T>,
        L: FnOnce() -> String,
    {
        debug_assert_eq!(
            offset,
            self.position(),
            "entered a chunk away from its payload start"
        );
        let payload = self.take(length as usize)?;
        let mut scope = ChunkReader {
            data: payload,
            base: offset,
            pos: 0,
        };
        let value = f(&mut scope)?;
        if !scope.is_empty() {
            return Err(FormatError::ChunkSizeMismatch {
                chunk: label(),
                offset,
                declared: length,
                consumed: scope.pos,
            });
        }
        Ok(value)
    }

    /// Skip up to `alignment - 1` bytes so the absolute position is aligned.
    ///
    /// Stops early at the end of the scope.
    pub fn align_to(&mut self, alignment: usize) {
        let misalignment = self.position() % alignment;
        if misalignment != 0 {
            let skip = (alignment - misalignment).min(self.remaining());
            self.pos += skip;
        }
    }

    /// Consume the rest of the scope if it is all zero bytes
    pub fn skip_zero_padding(&mut self) -> bool {
        if self.rest().iter().all(|&b| b == 0) {
            self.pos = self.data.len();
            true
        } else {
            false
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.take(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_vec2(&mut self) -> Result<Vec2> {
        Ok(Vec2::new(self.read_f32()?, self.read_f32()?))
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.read_f32()?, self.read_f32()?, self.read_f32()?))
    }

    /// Quaternion stored as `x, y, z, w`
    pub fn read_quat(&mut self) -> Result<Quat> {
        Ok(Quat::from_xyzw(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    /// 3x3 matrix stored as three column vectors (right, up, at)
    pub fn read_mat3(&mut self) -> Result<Mat3> {
        Ok(Mat3::from_cols(
            self.read_vec3()?,
            self.read_vec3()?,
            self.read_vec3()?,
        ))
    }

    /// Fixed-width string field, NUL terminated or NUL padded
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
        Ok(decode_c_string(self.take(width)?))
    }
}

fn decode_c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    decode_latin1(&bytes[..end])
}

/// Growable output buffer with scoped chunk and section headers
#[derive(Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
    version: RwVersion,
}

impl ChunkWriter {
    /// Open a new buffer; `version` is stamped into every chunk header
    pub fn new(version: RwVersion) -> Self {
        Self {
            buf: Vec::new(),
            version,
        }
    }

    pub fn version(&self) -> RwVersion {
        self.version
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Start a RenderWare chunk. The length is patched when the scope drops.
    pub fn begin_chunk(&mut self, tag: ChunkTag) -> ChunkScope<'_> {
        let start = self.buf.len();
        let library_id = self.version.library_id();
        self.write_u32(tag.0);
        self.write_u32(0);
        self.write_u32(library_id);
        ChunkScope {
            writer: self,
            length_at: start + 4,
            payload_at: start + ChunkHeader::SIZE,
        }
    }

    /// Start a `fourcc + length` section. The length is patched when the scope drops.
    pub fn begin_section(&mut self, magic: [u8; 4]) -> ChunkScope<'_> {
        let start = self.buf.len();
        self.write_bytes(&magic);
        self.write_u32(0);
        ChunkScope {
            writer: self,
            length_at: start + 4,
            payload_at: start + SectionHeader::SIZE,
        }
    }

    /// Write a chunk with no payload
    pub fn write_empty_chunk(&mut self, tag: ChunkTag) {
        drop(self.begin_chunk(tag));
    }

    /// Write a String chunk: NUL terminated, padded to four bytes
    pub fn write_string_chunk(&mut self, text: &str) {
        let mut chunk = self.begin_chunk(ChunkTag::STRING);
        chunk.write_padded_string(text);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_vec2(&mut self, value: Vec2) {
        self.write_f32(value.x);
        self.write_f32(value.y);
    }

    pub fn write_vec3(&mut self, value: Vec3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    pub fn write_quat(&mut self, value: Quat) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
        self.write_f32(value.w);
    }

    pub fn write_mat3(&mut self, value: Mat3) {
        self.write_vec3(value.x_axis);
        self.write_vec3(value.y_axis);
        self.write_vec3(value.z_axis);
    }

    /// Fixed-width string field. Callers validate that the text fits with a terminator.
    pub fn write_fixed_string(&mut self, text: &str, width: usize) {
        let mut bytes = encode_latin1(text);
        bytes.resize(width, 0);
        bytes[width - 1] = 0;
        self.write_bytes(&bytes);
    }

    /// NUL terminated string padded with zeros to a multiple of four bytes
    pub fn write_padded_string(&mut self, text: &str) {
        let mut bytes = encode_latin1(text);
        bytes.push(0);
        bytes.resize(bytes.len().next_multiple_of(4), 0);
        self.write_bytes(&bytes);
    }

    /// Finish writing and take the buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// An open chunk or section; closes (and records its length) on drop
#[derive(Debug)]
pub struct ChunkScope<'w> {
    writer: &'w mut ChunkWriter,
    length_at: usize,
    payload_at: usize,
}

impl ChunkScope<'_> {
    /// Payload bytes written into this scope so far
    pub fn payload_len(&self) -> usize {
        self.writer.buf.len() - self.payload_at
    }
}

impl Deref for ChunkScope<'_> {
    type Target = ChunkWriter;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl DerefMut for ChunkScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl Drop for ChunkScope<'_> {
    fn drop(&mut self) {
        let length = self.payload_len() as u32;
        LittleEndian::write_u32(
            &mut self.writer.buf[self.length_at..self.length_at + 4],
            length,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested_stream() -> Vec<u8> {
        let mut writer = ChunkWriter::new(RwVersion::VICE_CITY);
        {
            let mut outer = writer.begin_chunk(ChunkTag::CLUMP);
            {
                let mut data = outer.begin_chunk(ChunkTag::STRUCT);
                data.write_u32(7);
            }
            outer.write_string_chunk("abc");
        }
        writer.into_bytes()
    }

    #[test]
    fn test_scopes_patch_lengths() {
        let bytes = nested_stream();
        // clump header + struct (12 + 4) + string (12 + 4)
        assert_eq!(bytes.len(), 12 + 16 + 16);
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]), 32);
        assert_eq!(LittleEndian::read_u32(&bytes[16..20]), 4);
        assert_eq!(LittleEndian::read_u32(&bytes[32..36]), 4);
        assert_eq!(
            LittleEndian::read_u32(&bytes[8..12]),
            RwVersion::VICE_CITY.library_id()
        );
    }

    #[test]
    fn test_scope_closes_on_early_return() {
        fn write_then_bail(writer: &mut ChunkWriter) -> Result<()> {
            let mut chunk = writer.begin_chunk(ChunkTag::STRUCT);
            chunk.write_u32(1);
            chunk.write_u32(2);
            Err(FormatError::InvalidModel("bail".into()))
        }

        let mut writer = ChunkWriter::new(RwVersion::SAN_ANDREAS);
        assert!(write_then_bail(&mut writer).is_err());
        let bytes = writer.into_bytes();
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]), 8);
    }

    #[test]
    fn test_nested_read() {
        let bytes = nested_stream();
        let mut reader = ChunkReader::new(&bytes);
        let clump = reader.expect_chunk(ChunkTag::CLUMP).unwrap();
        assert_eq!(clump.version, RwVersion::VICE_CITY);
        let (value, text) = reader
            .enter_chunk(&clump, |r| {
                let value = r.read_struct(|s| s.read_u32())?;
                let text = r.read_string_chunk()?;
                Ok((value, text))
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(text, "abc");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_unconsumed_payload_is_a_size_mismatch() {
        let bytes = nested_stream();
        let mut reader = ChunkReader::new(&bytes);
        let clump = reader.expect_chunk(ChunkTag::CLUMP).unwrap();
        let err = reader
            .enter_chunk(&clump, |r| r.read_struct(|s| s.read_u32()))
            .unwrap_err();
        assert!(matches!(
            err,
            FormatError::ChunkSizeMismatch {
                declared: 32,
                consumed: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_find_chunk_skips_other_tags() {
        let mut writer = ChunkWriter::default();
        {
            let mut unknown = writer.begin_chunk(ChunkTag(0xCAFE));
            unknown.write_u32(1);
        }
        writer.write_string_chunk("abc");
        let bytes = writer.into_bytes();

        let mut reader = ChunkReader::new(&bytes);
        let header = reader.find_chunk(ChunkTag::STRING).unwrap();
        assert_eq!(header.offset, 16 + 12);
        reader.skip_chunk(&header).unwrap();
        assert!(matches!(
            reader.find_chunk(ChunkTag::STRING),
            Err(FormatError::UnexpectedChunk { offset: 32, .. })
        ));
    }

    #[test]
    fn test_short_header() {
        let mut reader = ChunkReader::new(&[1, 0, 0, 0, 4]);
        assert!(matches!(
            reader.read_chunk_header(),
            Err(FormatError::TruncatedHeader {
                offset: 0,
                needed: 12,
                available: 5
            })
        ));
    }

    #[test]
    fn test_length_past_end() {
        let bytes = nested_stream();
        let truncated = &bytes[..bytes.len() - 1];
        let mut reader = ChunkReader::new(truncated);
        assert!(matches!(
            reader.read_chunk_header(),
            Err(FormatError::InvalidLength {
                offset: 0,
                declared: 32,
                available: 31
            })
        ));
    }

    #[test]
    fn test_reads_stop_at_scope_end() {
        let mut writer = ChunkWriter::default();
        {
            let mut data = writer.begin_chunk(ChunkTag::STRUCT);
            data.write_u16(5);
        }
        writer.write_u32(0xDEAD_BEEF);
        let bytes = writer.into_bytes();

        let mut reader = ChunkReader::new(&bytes);
        let header = reader.expect_chunk(ChunkTag::STRUCT).unwrap();
        let err = reader
            .enter_chunk(&header, |r| r.read_u32())
            .unwrap_err();
        assert!(matches!(err, FormatError::InvalidLength { offset: 12, .. }));
    }

    #[test]
    fn test_sections() {
        let mut writer = ChunkWriter::default();
        {
            let mut section = writer.begin_section(*b"NAME");
            section.write_padded_string("walk");
        }
        let bytes = writer.into_bytes();
        assert_eq!(&bytes[..4], b"NAME");
        assert_eq!(LittleEndian::read_u32(&bytes[4..8]), 8);

        let mut reader = ChunkReader::new(&bytes);
        let header = reader.expect_section(b"NAME").unwrap();
        let name = reader
            .enter_section(&header, |r| r.read_fixed_string(r.remaining()))
            .unwrap();
        assert_eq!(name, "walk");

        let mut reader = ChunkReader::new(&bytes);
        assert!(matches!(
            reader.expect_section(b"INFO"),
            Err(FormatError::InvalidMagic { offset: 0, .. })
        ));
    }

    #[test]
    fn test_ensure_available_guards_huge_counts() {
        let reader = ChunkReader::new(&[0u8; 16]);
        assert!(reader.ensure_available(4, 4).is_ok());
        assert!(reader.ensure_available(usize::MAX, 12).is_err());
    }

    #[test]
    fn test_fixed_strings() {
        let mut writer = ChunkWriter::default();
        writer.write_fixed_string("wall01", 8);
        let bytes = writer.into_bytes();
        assert_eq!(&bytes, b"wall01\0\0");
        let mut reader = ChunkReader::new(&bytes);
        assert_eq!(reader.read_fixed_string(8).unwrap(), "wall01");
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(ChunkTag::CLUMP.to_string(), "Clump (0x10)");
        assert_eq!(ChunkTag(0xDEAD).to_string(), "0xdead");
    }
}
