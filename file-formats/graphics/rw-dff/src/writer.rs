//! Clump encoding

use log::debug;
use rw_core::{ChunkTag, ChunkWriter, Result};

use crate::types::{Clump, Frame, Geometry, Material, Texture};
use crate::validator::validate_for_save;

/// Validate and encode a clump. Nothing is produced if validation fails.
pub fn write_clump(clump: &Clump) -> Result<Vec<u8>> {
    validate_for_save(clump)?;

    let mut writer = ChunkWriter::new(clump.version);
    {
        let mut chunk = writer.begin_chunk(ChunkTag::CLUMP);
        {
            let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
            data.write_i32(clump.atomics.len() as i32);
            if clump.has_light_counts() {
                data.write_i32(0);
                data.write_i32(0);
            }
        }

        write_frame_list(&mut chunk, &clump.frames);
        write_geometry_list(&mut chunk, clump);

        for atomic in &clump.atomics {
            let mut atomic_chunk = chunk.begin_chunk(ChunkTag::ATOMIC);
            {
                let mut data = atomic_chunk.begin_chunk(ChunkTag::STRUCT);
                data.write_u32(atomic.frame as u32);
                data.write_u32(atomic.geometry as u32);
                data.write_u32(atomic.flags);
                data.write_u32(0);
            }
            atomic_chunk.write_empty_chunk(ChunkTag::EXTENSION);
        }

        chunk.write_empty_chunk(ChunkTag::EXTENSION);
    }

    let bytes = writer.into_bytes();
    debug!(
        "wrote clump: {} frames, {} geometries, {} atomics, {} bytes",
        clump.frames.len(),
        clump.geometries.len(),
        clump.atomics.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_frame_list(writer: &mut ChunkWriter, frames: &[Frame]) {
    let mut list = writer.begin_chunk(ChunkTag::FRAME_LIST);
    {
        let mut data = list.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(frames.len() as u32);
        for frame in frames {
            data.write_mat3(frame.rotation);
            data.write_vec3(frame.position);
            data.write_i32(frame.parent.map_or(-1, |p| p as i32));
            data.write_u32(frame.flags);
        }
    }

    for frame in frames {
        let mut extension = list.begin_chunk(ChunkTag::EXTENSION);
        if let Some(name) = &frame.name {
            let mut plugin = extension.begin_chunk(ChunkTag::FRAME_NAME);
            plugin.write_bytes(&rw_core::chunk::encode_latin1(name));
        }
    }
}

fn write_geometry_list(writer: &mut ChunkWriter, clump: &Clump) {
    let mut list = writer.begin_chunk(ChunkTag::GEOMETRY_LIST);
    {
        let mut data = list.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(clump.geometries.len() as u32);
    }
    for geometry in &clump.geometries {
        write_geometry(&mut list, geometry);
    }
}

fn write_geometry(writer: &mut ChunkWriter, geometry: &Geometry) {
    let mut chunk = writer.begin_chunk(ChunkTag::GEOMETRY);
    {
        let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
        let flags = geometry.flags.bits() | ((geometry.tex_coords.len() as u32) << 16);
        data.write_u32(flags);
        data.write_i32(geometry.triangles.len() as i32);
        data.write_i32(geometry.vertex_count as i32);
        data.write_i32(geometry.morph_targets.len() as i32);

        if let Some(lighting) = &geometry.lighting {
            data.write_f32(lighting.ambient);
            data.write_f32(lighting.specular);
            data.write_f32(lighting.diffuse);
        }

        if let Some(prelit) = &geometry.prelit {
            for color in prelit {
                data.write_bytes(&[color.r, color.g, color.b, color.a]);
            }
        }

        for set in &geometry.tex_coords {
            for uv in set {
                data.write_vec2(*uv);
            }
        }

        for triangle in &geometry.triangles {
            let [v0, v1, v2] = triangle.vertices;
            data.write_u16(v1);
            data.write_u16(v0);
            data.write_u16(triangle.material);
            data.write_u16(v2);
        }

        for target in &geometry.morph_targets {
            data.write_vec3(target.bounding_sphere.center);
            data.write_f32(target.bounding_sphere.radius);
            data.write_u32(u32::from(target.positions.is_some()));
            data.write_u32(u32::from(target.normals.is_some()));
            for position in target.positions.iter().flatten() {
                data.write_vec3(*position);
            }
            for normal in target.normals.iter().flatten() {
                data.write_vec3(*normal);
            }
        }
    }

    write_material_list(&mut chunk, &geometry.materials);

    let mut extension = chunk.begin_chunk(ChunkTag::EXTENSION);
    write_bin_mesh(&mut extension, geometry);
}

fn write_material_list(writer: &mut ChunkWriter, materials: &[Material]) {
    let mut list = writer.begin_chunk(ChunkTag::MATERIAL_LIST);
    {
        let mut data = list.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(materials.len() as u32);
        for _ in materials {
            data.write_i32(-1);
        }
    }
    for material in materials {
        write_material(&mut list, material);
    }
}

fn write_material(writer: &mut ChunkWriter, material: &Material) {
    let mut chunk = writer.begin_chunk(ChunkTag::MATERIAL);
    {
        let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(material.flags);
        let color = material.color;
        data.write_bytes(&[color.r, color.g, color.b, color.a]);
        data.write_i32(0);
        data.write_u32(u32::from(material.texture.is_some()));
        if let Some(surface) = &material.surface {
            data.write_f32(surface.ambient);
            data.write_f32(surface.specular);
            data.write_f32(surface.diffuse);
        }
    }
    if let Some(texture) = &material.texture {
        write_texture(&mut chunk, texture);
    }
    chunk.write_empty_chunk(ChunkTag::EXTENSION);
}

fn write_texture(writer: &mut ChunkWriter, texture: &Texture) {
    let mut chunk = writer.begin_chunk(ChunkTag::TEXTURE);
    {
        let mut data = chunk.begin_chunk(ChunkTag::STRUCT);
        data.write_u32(texture.filter_word());
    }
    chunk.write_string_chunk(&texture.name);
    chunk.write_string_chunk(&texture.mask);
    chunk.write_empty_chunk(ChunkTag::EXTENSION);
}

/// Triangle list split by material, in material order
fn write_bin_mesh(writer: &mut ChunkWriter, geometry: &Geometry) {
    let meshes: Vec<(usize, Vec<u32>)> = (0..geometry.materials.len())
        .map(|material| {
            let indices: Vec<u32> = geometry
                .triangles
                .iter()
                .filter(|t| usize::from(t.material) == material)
                .flat_map(|t| t.vertices.map(u32::from))
                .collect();
            (material, indices)
        })
        .filter(|(_, indices)| !indices.is_empty())
        .collect();
    let total: usize = meshes.iter().map(|(_, indices)| indices.len()).sum();

    let mut plugin = writer.begin_chunk(ChunkTag::BIN_MESH_PLG);
    // triangle lists
    plugin.write_u32(0);
    plugin.write_u32(meshes.len() as u32);
    plugin.write_u32(total as u32);
    for (material, indices) in &meshes {
        plugin.write_u32(indices.len() as u32);
        plugin.write_u32(*material as u32);
        for index in indices {
            plugin.write_u32(*index);
        }
    }
}
