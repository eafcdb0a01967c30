//! Texture dictionary decoding

use log::{debug, warn};
use rw_core::{ChunkReader, ChunkTag, Decoded, FormatError, Result, Warning};

use crate::types::{Platform, RasterFormat, TextureDictionary, TextureEntry};

/// Name and mask field width, including the terminator
pub const NAME_FIELD_LEN: usize = 32;

/// Decode a TXD file
pub fn read_dictionary(bytes: &[u8]) -> Result<Decoded<TextureDictionary>> {
    let mut reader = ChunkReader::new(bytes);
    let header = reader.expect_chunk(ChunkTag::TEXTURE_DICTIONARY)?;
    let version = header.version.check_supported()?;

    let (device_id, textures) = reader.enter_chunk(&header, |r| {
        let (count, device_id) = r.read_struct(|s| Ok((s.read_u16()?, s.read_u16()?)))?;
        debug!("texture dictionary version {version}: {count} textures, device {device_id}");

        let count = usize::from(count);
        r.ensure_available(count, rw_core::ChunkHeader::SIZE)?;
        let mut textures = Vec::with_capacity(count);
        for _ in 0..count {
            let native = r.find_chunk(ChunkTag::TEXTURE_NATIVE)?;
            textures.push(r.enter_chunk(&native, read_texture_native)?);
        }
        r.skip_remaining_chunks()?;
        Ok((device_id, textures))
    })?;

    let dictionary = TextureDictionary {
        version,
        device_id,
        textures,
    };

    let warnings = dictionary
        .duplicate_names()
        .into_iter()
        .map(|(first, duplicate)| {
            let name = dictionary.textures[duplicate].name.clone();
            warn!("texture {duplicate} reuses the name {name:?} of texture {first}");
            Warning::DuplicateName {
                name,
                first,
                duplicate,
            }
        })
        .collect();

    Ok(Decoded::with_warnings(dictionary, warnings))
}

fn read_texture_native(r: &mut ChunkReader<'_>) -> Result<TextureEntry> {
    let texture = r.read_struct(|s| {
        let offset = s.position();
        let platform_id = s.read_u32()?;
        let platform = Platform::from_id(platform_id).ok_or_else(|| {
            FormatError::UnsupportedFormatVersion(format!(
                "texture platform {platform_id} at offset {offset:#x}"
            ))
        })?;

        let filter_word = s.read_u32()?;
        let name = s.read_fixed_string(NAME_FIELD_LEN)?;
        let mask = s.read_fixed_string(NAME_FIELD_LEN)?;
        let raster_format = RasterFormat::from_bits_retain(s.read_u32()?);
        let d3d_format = s.read_u32()?;
        let width = s.read_u16()?;
        let height = s.read_u16()?;
        let depth = s.read_u8()?;
        let levels = s.read_u8()?;
        let raster_type = s.read_u8()?;
        let flags = s.read_u8()?;

        let palette = match raster_format.palette_len() {
            Some(len) => Some(s.read_bytes(len)?.to_vec()),
            None => None,
        };

        let mut mipmaps = Vec::with_capacity(usize::from(levels));
        for _ in 0..levels {
            let size = s.read_u32()? as usize;
            mipmaps.push(s.read_bytes(size)?.to_vec());
        }

        Ok(TextureEntry {
            platform,
            filter: (filter_word & 0xFF) as u8,
            address_u: ((filter_word >> 8) & 0x0F) as u8,
            address_v: ((filter_word >> 12) & 0x0F) as u8,
            name,
            mask,
            raster_format,
            d3d_format,
            width,
            height,
            depth,
            raster_type,
            flags,
            palette,
            mipmaps,
        })
    })?;

    // Anisotropy and other plugins
    r.skip_remaining_chunks()?;
    Ok(texture)
}
