//! Collision archive decoding

use log::{debug, trace};
use rw_core::{ChunkReader, Decoded, FormatError, Result, SectionHeader};

use crate::types::{
    Bounds, CollisionBox, CollisionFile, CollisionModel, Face, Mesh, Shape, Sphere, Surface,
};

/// Version 1 signature
pub const COLL: [u8; 4] = *b"COLL";
/// Width of the name field, including the terminator
pub const NAME_LEN: usize = 22;

const SPHERE_SIZE: usize = 20;
const BOX_SIZE: usize = 28;
const VERTEX_SIZE: usize = 12;
const FACE_SIZE: usize = 16;

/// Decode a COL archive
pub fn read_collision_file(bytes: &[u8]) -> Result<Decoded<CollisionFile>> {
    let mut reader = ChunkReader::new(bytes);
    let mut models = Vec::new();

    loop {
        let header = reader.read_section_header()?;
        match &header.magic {
            b"COLL" => {
                let model = reader.enter_section(&header, read_model)?;
                trace!(
                    "model {:?} ({}) with {} shapes",
                    model.name,
                    model.model_id,
                    model.shapes.len()
                );
                models.push(model);
            }
            b"COL2" | b"COL3" | b"COL4" => {
                return Err(FormatError::UnsupportedFormatVersion(format!(
                    "collision {} at offset {:#x}",
                    header.magic_str(),
                    header.offset - SectionHeader::SIZE
                )));
            }
            _ => {
                return Err(FormatError::InvalidMagic {
                    offset: header.offset - SectionHeader::SIZE,
                    expected: "COLL".to_string(),
                    found: header.magic_str(),
                });
            }
        }

        if reader.skip_zero_padding() {
            break;
        }
    }

    debug!("read {} collision models", models.len());
    Ok(Decoded::new(CollisionFile { models }))
}

fn read_surface(r: &mut ChunkReader<'_>) -> Result<Surface> {
    let [material, flag, brightness, light] = r.read_array::<4>()?;
    Ok(Surface {
        material,
        flag,
        brightness,
        light,
    })
}

fn read_count(r: &mut ChunkReader<'_>, record_size: usize) -> Result<usize> {
    let count = r.read_u32()? as usize;
    r.ensure_available(count, record_size)?;
    Ok(count)
}

fn read_model(r: &mut ChunkReader<'_>) -> Result<CollisionModel> {
    let name = r.read_fixed_string(NAME_LEN)?;
    let model_id = r.read_u16()?;
    let bounds = Bounds {
        radius: r.read_f32()?,
        center: r.read_vec3()?,
        min: r.read_vec3()?,
        max: r.read_vec3()?,
    };

    let mut shapes = Vec::new();

    let sphere_count = read_count(r, SPHERE_SIZE)?;
    for _ in 0..sphere_count {
        shapes.push(Shape::Sphere(Sphere {
            radius: r.read_f32()?,
            center: r.read_vec3()?,
            surface: read_surface(r)?,
        }));
    }

    let line_offset = r.position();
    let line_count = r.read_u32()?;
    if line_count != 0 {
        return Err(FormatError::UnsupportedShape {
            offset: line_offset,
            kind: format!("line ({line_count} records)"),
        });
    }

    let box_count = read_count(r, BOX_SIZE)?;
    for _ in 0..box_count {
        shapes.push(Shape::Box(CollisionBox {
            min: r.read_vec3()?,
            max: r.read_vec3()?,
            surface: read_surface(r)?,
        }));
    }

    let vertex_count = read_count(r, VERTEX_SIZE)?;
    let vertices = (0..vertex_count)
        .map(|_| r.read_vec3())
        .collect::<Result<Vec<_>>>()?;

    let faces_offset = r.position();
    let face_count = read_count(r, FACE_SIZE)?;
    let mut faces = Vec::with_capacity(face_count);
    for index in 0..face_count {
        let indices = [r.read_u32()?, r.read_u32()?, r.read_u32()?];
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(FormatError::InvalidModel(format!(
                "face {index} at offset {faces_offset:#x} references vertex {bad} of {vertex_count}"
            )));
        }
        faces.push(Face {
            indices,
            surface: read_surface(r)?,
        });
    }

    let mesh = Mesh { vertices, faces };
    if !mesh.is_empty() {
        shapes.push(Shape::Mesh(mesh));
    }

    Ok(CollisionModel {
        name: (!name.is_empty()).then_some(name),
        model_id,
        bounds,
        shapes,
    })
}
