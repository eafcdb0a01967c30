//! Clump decoding

use glam::Vec2;
use log::{debug, warn};
use rw_core::chunk::decode_latin1;
use rw_core::{ChunkHeader, ChunkReader, ChunkTag, Decoded, FormatError, Result, RwVersion, Warning};

use crate::types::{
    Atomic, BoundingSphere, Clump, Frame, Geometry, GeometryFlags, Lighting, Material,
    MorphTarget, Rgba, SurfaceProperties, TEX_SET_COUNT_MASK, Texture, Triangle,
};
use crate::validator::validate_indices;

/// Bytes per frame record in the frame list struct
const FRAME_RECORD_SIZE: usize = 56;

/// Decode a DFF file
pub fn read_clump(bytes: &[u8]) -> Result<Decoded<Clump>> {
    let mut reader = ChunkReader::new(bytes);
    let header = reader.expect_chunk(ChunkTag::CLUMP)?;
    let version = header.version.check_supported()?;
    debug!("clump version {version}, {} bytes", header.length);

    let mut warnings = Vec::new();
    let clump = reader.enter_chunk(&header, |r| read_clump_body(r, version, &mut warnings))?;

    if !reader.is_empty() {
        debug!(
            "ignoring {} bytes after the clump",
            reader.remaining()
        );
    }

    validate_indices(&clump)?;
    Ok(Decoded::with_warnings(clump, warnings))
}

fn read_clump_body(
    r: &mut ChunkReader<'_>,
    version: RwVersion,
    warnings: &mut Vec<Warning>,
) -> Result<Clump> {
    let mut clump = Clump {
        version,
        ..Clump::default()
    };
    let has_light_counts = clump.has_light_counts();

    let atomic_count = r.read_struct(|s| {
        let atomics = s.read_i32()?;
        if has_light_counts {
            let lights = s.read_i32()?;
            let cameras = s.read_i32()?;
            debug!("clump declares {lights} lights and {cameras} cameras");
        }
        Ok(atomics)
    })?;

    let mut frames = None;
    let mut geometries = None;

    while !r.is_empty() {
        let child = r.read_chunk_header()?;
        match child.tag {
            ChunkTag::FRAME_LIST => {
                frames = Some(r.enter_chunk(&child, read_frame_list)?);
            }
            ChunkTag::GEOMETRY_LIST => {
                let context = GeometryContext::new(&clump);
                geometries = Some(r.enter_chunk(&child, |g| read_geometry_list(g, &context))?);
            }
            ChunkTag::ATOMIC => {
                let atomic = r.enter_chunk(&child, read_atomic)?;
                clump.atomics.push(atomic);
            }
            ChunkTag::EXTENSION => r.skip_extension(&child)?,
            _ => {
                let offset = child.offset - ChunkHeader::SIZE;
                warn!("skipping chunk {} inside clump at {offset:#x}", child.tag);
                warnings.push(Warning::SkippedChunk {
                    tag: child.tag,
                    offset,
                });
                r.skip_chunk(&child)?;
            }
        }
    }

    clump.frames = frames.ok_or_else(|| missing_chunk(r, ChunkTag::FRAME_LIST))?;
    clump.geometries = geometries.ok_or_else(|| missing_chunk(r, ChunkTag::GEOMETRY_LIST))?;

    if usize::try_from(atomic_count).ok() != Some(clump.atomics.len()) {
        return Err(FormatError::InvalidModel(format!(
            "clump declares {atomic_count} atomics but contains {}",
            clump.atomics.len()
        )));
    }

    Ok(clump)
}

fn missing_chunk(r: &ChunkReader<'_>, tag: ChunkTag) -> FormatError {
    FormatError::UnexpectedChunk {
        offset: r.position(),
        expected: tag.to_string(),
        found: "end of clump".to_string(),
    }
}

fn read_frame_list(r: &mut ChunkReader<'_>) -> Result<Vec<Frame>> {
    let mut frames = r.read_struct(|s| {
        let count = s.read_u32()? as usize;
        s.ensure_available(count, FRAME_RECORD_SIZE)?;
        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            let rotation = s.read_mat3()?;
            let position = s.read_vec3()?;
            let parent = s.read_i32()?;
            let flags = s.read_u32()?;
            let parent = match parent {
                -1 => None,
                p if p >= 0 => Some(p as usize),
                p => {
                    return Err(FormatError::InvalidModel(format!(
                        "frame {index} has parent index {p}"
                    )));
                }
            };
            frames.push(Frame {
                name: None,
                rotation,
                position,
                parent,
                flags,
            });
        }
        Ok(frames)
    })?;

    // One extension per frame, in frame order
    let mut index = 0;
    while !r.is_empty() {
        let header = r.read_chunk_header()?;
        match frames.get_mut(index) {
            Some(frame) if header.tag == ChunkTag::EXTENSION => {
                frame.name = r.enter_chunk(&header, read_frame_extension)?;
                index += 1;
            }
            _ => r.skip_chunk(&header)?,
        }
    }

    Ok(frames)
}

fn read_frame_extension(r: &mut ChunkReader<'_>) -> Result<Option<String>> {
    let mut name = None;
    while !r.is_empty() {
        let plugin = r.read_chunk_header()?;
        if plugin.tag == ChunkTag::FRAME_NAME {
            let bytes = r.chunk_payload(&plugin)?;
            let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
            name = Some(decode_latin1(&bytes[..end]));
        } else {
            r.skip_chunk(&plugin)?;
        }
    }
    Ok(name)
}

/// Version gates needed while decoding geometries
struct GeometryContext {
    lighting: bool,
    surface: bool,
}

impl GeometryContext {
    fn new(clump: &Clump) -> Self {
        Self {
            lighting: clump.has_geometry_lighting(),
            surface: clump.has_surface_properties(),
        }
    }
}

fn read_geometry_list(r: &mut ChunkReader<'_>, context: &GeometryContext) -> Result<Vec<Geometry>> {
    let count = r.read_struct(|s| s.read_u32())? as usize;
    r.ensure_available(count, ChunkHeader::SIZE)?;
    let mut geometries = Vec::with_capacity(count);
    for _ in 0..count {
        let header = r.find_chunk(ChunkTag::GEOMETRY)?;
        geometries.push(r.enter_chunk(&header, |g| read_geometry(g, context))?);
    }
    r.skip_remaining_chunks()?;
    Ok(geometries)
}

fn read_geometry(r: &mut ChunkReader<'_>, context: &GeometryContext) -> Result<Geometry> {
    let mut geometry = r.read_struct(|s| read_geometry_struct(s, context))?;

    let header = r.find_chunk(ChunkTag::MATERIAL_LIST)?;
    geometry.materials = r.enter_chunk(&header, |m| read_material_list(m, context))?;

    // Extension carries the bin mesh and skinning plugins; the triangle list is authoritative
    r.skip_remaining_chunks()?;
    Ok(geometry)
}

fn read_geometry_struct(s: &mut ChunkReader<'_>, context: &GeometryContext) -> Result<Geometry> {
    let offset = s.position();
    let raw_flags = s.read_u32()?;
    let flags = GeometryFlags::from_bits_retain(raw_flags & !TEX_SET_COUNT_MASK);
    let triangle_count = read_count(s, "triangle")?;
    let vertex_count = read_count(s, "vertex")?;
    let morph_count = read_count(s, "morph target")?;

    if flags.contains(GeometryFlags::NATIVE) {
        return Err(FormatError::UnsupportedFormatVersion(format!(
            "native (platform-specific) geometry at offset {offset:#x}"
        )));
    }

    let tex_sets = match ((raw_flags & TEX_SET_COUNT_MASK) >> 16) as usize {
        0 if flags.contains(GeometryFlags::TEXTURED2) => 2,
        0 if flags.contains(GeometryFlags::TEXTURED) => 1,
        n => n,
    };

    let lighting = if context.lighting {
        Some(Lighting {
            ambient: s.read_f32()?,
            specular: s.read_f32()?,
            diffuse: s.read_f32()?,
        })
    } else {
        None
    };

    let prelit = if flags.contains(GeometryFlags::PRELIT) {
        s.ensure_available(vertex_count, 4)?;
        let mut colors = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            let [r, g, b, a] = s.read_array::<4>()?;
            colors.push(Rgba { r, g, b, a });
        }
        Some(colors)
    } else {
        None
    };

    let mut tex_coords = Vec::with_capacity(tex_sets.min(8));
    for _ in 0..tex_sets {
        s.ensure_available(vertex_count, 8)?;
        let set: Vec<Vec2> = (0..vertex_count)
            .map(|_| s.read_vec2())
            .collect::<Result<_>>()?;
        tex_coords.push(set);
    }

    s.ensure_available(triangle_count, 8)?;
    let mut triangles = Vec::with_capacity(triangle_count);
    for _ in 0..triangle_count {
        let v1 = s.read_u16()?;
        let v0 = s.read_u16()?;
        let material = s.read_u16()?;
        let v2 = s.read_u16()?;
        triangles.push(Triangle {
            vertices: [v0, v1, v2],
            material,
        });
    }

    // sphere + two presence flags
    s.ensure_available(morph_count, 24)?;
    let mut morph_targets = Vec::with_capacity(morph_count);
    for _ in 0..morph_count {
        let center = s.read_vec3()?;
        let radius = s.read_f32()?;
        let has_positions = s.read_u32()? != 0;
        let has_normals = s.read_u32()? != 0;
        let positions = if has_positions {
            Some(read_vec3_array(s, vertex_count)?)
        } else {
            None
        };
        let normals = if has_normals {
            Some(read_vec3_array(s, vertex_count)?)
        } else {
            None
        };
        morph_targets.push(MorphTarget {
            bounding_sphere: BoundingSphere { center, radius },
            positions,
            normals,
        });
    }

    Ok(Geometry {
        flags,
        vertex_count: vertex_count as u32,
        lighting,
        prelit,
        tex_coords,
        triangles,
        morph_targets,
        materials: Vec::new(),
    })
}

fn read_count(s: &mut ChunkReader<'_>, what: &str) -> Result<usize> {
    let offset = s.position();
    let count = s.read_i32()?;
    usize::try_from(count).map_err(|_| {
        FormatError::InvalidModel(format!("negative {what} count {count} at offset {offset:#x}"))
    })
}

fn read_vec3_array(s: &mut ChunkReader<'_>, count: usize) -> Result<Vec<glam::Vec3>> {
    s.ensure_available(count, 12)?;
    (0..count).map(|_| s.read_vec3()).collect()
}

fn read_material_list(r: &mut ChunkReader<'_>, context: &GeometryContext) -> Result<Vec<Material>> {
    let slots = r.read_struct(|s| {
        let count = s.read_u32()? as usize;
        s.ensure_available(count, 4)?;
        (0..count).map(|_| s.read_i32()).collect::<Result<Vec<_>>>()
    })?;

    let mut materials: Vec<Material> = Vec::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        let material = match *slot {
            -1 => {
                let header = r.find_chunk(ChunkTag::MATERIAL)?;
                r.enter_chunk(&header, |m| read_material(m, context))?
            }
            instance => usize::try_from(instance)
                .ok()
                .and_then(|source| materials.get(source))
                .cloned()
                .ok_or_else(|| {
                    FormatError::InvalidModel(format!(
                        "material {index} instances unknown material {instance}"
                    ))
                })?,
        };
        materials.push(material);
    }

    r.skip_remaining_chunks()?;
    Ok(materials)
}

fn read_material(r: &mut ChunkReader<'_>, context: &GeometryContext) -> Result<Material> {
    let (flags, color, textured, surface) = r.read_struct(|s| {
        let flags = s.read_u32()?;
        let [red, green, blue, alpha] = s.read_array::<4>()?;
        let _unused = s.read_i32()?;
        let textured = s.read_u32()? != 0;
        let surface = if context.surface {
            Some(SurfaceProperties {
                ambient: s.read_f32()?,
                specular: s.read_f32()?,
                diffuse: s.read_f32()?,
            })
        } else {
            None
        };
        Ok((flags, Rgba::new(red, green, blue, alpha), textured, surface))
    })?;

    let texture = if textured {
        let header = r.find_chunk(ChunkTag::TEXTURE)?;
        Some(r.enter_chunk(&header, read_texture)?)
    } else {
        None
    };

    // Material effects, reflection and specular plugins
    r.skip_remaining_chunks()?;

    Ok(Material {
        flags,
        color,
        texture,
        surface,
    })
}

fn read_texture(r: &mut ChunkReader<'_>) -> Result<Texture> {
    let mut texture = Texture::default();
    let word = r.read_struct(|s| s.read_u32())?;
    texture.set_filter_word(word);
    texture.name = r.read_string_chunk()?;
    texture.mask = r.read_string_chunk()?;
    r.skip_remaining_chunks()?;
    Ok(texture)
}

fn read_atomic(r: &mut ChunkReader<'_>) -> Result<Atomic> {
    let atomic = r.read_struct(|s| {
        let frame = s.read_u32()? as usize;
        let geometry = s.read_u32()? as usize;
        let flags = s.read_u32()?;
        let _unused = s.read_u32()?;
        Ok(Atomic {
            frame,
            geometry,
            flags,
        })
    })?;
    // Extension: right-to-render, material effects, pipeline set
    r.skip_remaining_chunks()?;
    Ok(atomic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_core::ChunkWriter;

    #[test]
    fn test_wrong_top_chunk() {
        let mut writer = ChunkWriter::new(RwVersion::SAN_ANDREAS);
        writer.write_empty_chunk(ChunkTag::TEXTURE_DICTIONARY);
        let err = read_clump(&writer.into_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::UnexpectedChunk { offset: 0, .. }));
    }

    #[test]
    fn test_native_geometry_rejected() {
        let mut writer = ChunkWriter::new(RwVersion::SAN_ANDREAS);
        {
            let mut clump = writer.begin_chunk(ChunkTag::CLUMP);
            {
                let mut data = clump.begin_chunk(ChunkTag::STRUCT);
                data.write_i32(0);
                data.write_i32(0);
                data.write_i32(0);
            }
            {
                let mut frames = clump.begin_chunk(ChunkTag::FRAME_LIST);
                let mut data = frames.begin_chunk(ChunkTag::STRUCT);
                data.write_u32(0);
            }
            let mut list = clump.begin_chunk(ChunkTag::GEOMETRY_LIST);
            {
                let mut data = list.begin_chunk(ChunkTag::STRUCT);
                data.write_u32(1);
            }
            let mut geometry = list.begin_chunk(ChunkTag::GEOMETRY);
            let mut data = geometry.begin_chunk(ChunkTag::STRUCT);
            data.write_u32(GeometryFlags::NATIVE.bits());
            data.write_i32(0);
            data.write_i32(0);
            data.write_i32(1);
        }
        let err = read_clump(&writer.into_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedFormatVersion(_)));
    }
}
