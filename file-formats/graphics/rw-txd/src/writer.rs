//! Texture dictionary validation and encoding

use log::debug;
use rw_core::{ChunkTag, ChunkWriter, FormatError, Result};

use crate::reader::NAME_FIELD_LEN;
use crate::types::{RasterFormat, TextureDictionary, TextureEntry};

/// Check that a dictionary can be written and read back unchanged
pub fn validate(dictionary: &TextureDictionary) -> Result<()> {
    dictionary.version.check_supported()?;

    if let Some(&(_, duplicate)) = dictionary.duplicate_names().first() {
        return Err(FormatError::DuplicateName(
            dictionary.textures[duplicate].name.clone(),
        ));
    }

    if u16::try_from(dictionary.textures.len()).is_err() {
        return Err(FormatError::InvalidModel(format!(
            "{} textures do not fit a dictionary",
            dictionary.textures.len()
        )));
    }

    for (index, texture) in dictionary.textures.iter().enumerate() {
        validate_texture(index, texture)?;
    }
    Ok(())
}

fn validate_texture(index: usize, texture: &TextureEntry) -> Result<()> {
    let invalid = |message: String| -> Result<()> {
        Err(FormatError::InvalidModel(format!(
            "texture {index} ({:?}): {message}",
            texture.name
        )))
    };

    for (field, value) in [("name", &texture.name), ("mask", &texture.mask)] {
        if value.chars().count() >= NAME_FIELD_LEN
            || value.chars().any(|c| c == '\0' || u32::from(c) > 0xFF)
        {
            return invalid(format!(
                "{field} must be at most {} Latin-1 characters without NUL",
                NAME_FIELD_LEN - 1
            ));
        }
    }

    if texture.address_u > 0x0F || texture.address_v > 0x0F {
        return invalid("addressing modes are 4-bit values".to_string());
    }

    if texture.mipmaps.is_empty() || texture.mipmaps.len() > usize::from(u8::MAX) {
        return invalid(format!(
            "{} mipmap levels, expected 1 to 255",
            texture.mipmaps.len()
        ));
    }

    if texture
        .raster_format
        .contains(RasterFormat::PAL8 | RasterFormat::PAL4)
    {
        return invalid("raster format sets both palette flags".to_string());
    }

    match (texture.raster_format.palette_len(), &texture.palette) {
        (None, None) => {}
        (Some(expected), Some(palette)) if palette.len() == expected => {}
        (Some(expected), Some(palette)) => {
            return invalid(format!(
                "palette has {} bytes, the raster format needs {expected}",
                palette.len()
            ));
        }
        (Some(_), None) => return invalid("raster format needs a palette".to_string()),
        (None, Some(_)) => {
            return invalid("palette present without a palette raster format".to_string());
        }
    }

    if texture
        .mipmaps
        .iter()
        .any(|level| u32::try_from(level.len()).is_err())
    {
        return invalid("mipmap level larger than 4 GiB".to_string());
    }

    Ok(())
}

/// Validate and encode a dictionary. Nothing is produced if validation fails.
pub fn write_dictionary(dictionary: &TextureDictionary) -> Result<Vec<u8>> {
    validate(dictionary)?;

    let mut writer = ChunkWriter::new(dictionary.version);
    {
        let mut chunk = writer.begin_chunk(ChunkTag::TEXTURE_DICTIONARY);
        {
            let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
            data.write_u16(dictionary.textures.len() as u16);
            data.write_u16(dictionary.device_id);
        }
        for texture in &dictionary.textures {
            write_texture_native(&mut chunk, texture);
        }
        chunk.write_empty_chunk(ChunkTag::EXTENSION);
    }

    let bytes = writer.into_bytes();
    debug!(
        "wrote texture dictionary: {} textures, {} bytes",
        dictionary.textures.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_texture_native(writer: &mut ChunkWriter, texture: &TextureEntry) {
    let mut chunk = writer.begin_chunk(ChunkTag::TEXTURE_NATIVE);
    {
        let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(texture.platform.id());
        data.write_u32(texture.filter_word());
        data.write_fixed_string(&texture.name, NAME_FIELD_LEN);
        data.write_fixed_string(&texture.mask, NAME_FIELD_LEN);
        data.write_u32(texture.raster_format.bits());
        data.write_u32(texture.d3d_format);
        data.write_u16(texture.width);
        data.write_u16(texture.height);
        data.write_u8(texture.depth);
        data.write_u8(texture.mipmaps.len() as u8);
        data.write_u8(texture.raster_type);
        data.write_u8(texture.flags);
        if let Some(palette) = &texture.palette {
            data.write_bytes(palette);
        }
        for level in &texture.mipmaps {
            data.write_u32(level.len() as u32);
            data.write_bytes(level);
        }
    }
    chunk.write_empty_chunk(ChunkTag::EXTENSION);
}
