//! Collision archive validation and encoding

use log::debug;
use rw_core::{ChunkWriter, FormatError, Result};

use crate::reader::{COLL, NAME_LEN};
use crate::types::{CollisionFile, CollisionModel, Shape, Surface};

/// Check that every model can be written and read back unchanged
pub fn validate(file: &CollisionFile) -> Result<()> {
    if file.models.is_empty() {
        return Err(FormatError::InvalidModel(
            "a collision archive holds at least one model".to_string(),
        ));
    }
    for (index, model) in file.models.iter().enumerate() {
        validate_model(index, model)?;
    }
    Ok(())
}

fn validate_model(index: usize, model: &CollisionModel) -> Result<()> {
    let invalid = |message: String| -> Result<()> {
        Err(FormatError::InvalidModel(format!(
            "collision model {index}: {message}"
        )))
    };

    if let Some(name) = &model.name {
        if name.is_empty()
            || name.chars().count() >= NAME_LEN
            || name.chars().any(|c| c == '\0' || u32::from(c) > 0xFF)
        {
            return invalid(format!(
                "name {name:?} must be 1 to {} Latin-1 characters",
                NAME_LEN - 1
            ));
        }
    }

    // spheres < boxes < mesh
    let rank = |shape: &Shape| match shape {
        Shape::Sphere(_) => 0,
        Shape::Box(_) => 1,
        Shape::Mesh(_) => 2,
    };
    let mut previous = 0;
    let mut meshes = 0;
    for (position, shape) in model.shapes.iter().enumerate() {
        let current = rank(shape);
        if current < previous {
            return invalid(format!(
                "shape {position} ({}) is out of order; store spheres, then boxes, then the mesh",
                shape.kind()
            ));
        }
        previous = current;

        if let Shape::Mesh(mesh) = shape {
            meshes += 1;
            if meshes > 1 {
                return invalid("more than one mesh".to_string());
            }
            if mesh.is_empty() {
                return invalid("mesh has no vertices and no faces".to_string());
            }
            for (f, face) in mesh.faces.iter().enumerate() {
                if let Some(&bad) = face
                    .indices
                    .iter()
                    .find(|&&i| i as usize >= mesh.vertices.len())
                {
                    return invalid(format!(
                        "face {f} references vertex {bad} of {}",
                        mesh.vertices.len()
                    ));
                }
            }
        }
    }

    Ok(())
}

/// Validate and encode an archive. Nothing is produced if validation fails.
pub fn write_collision_file(file: &CollisionFile) -> Result<Vec<u8>> {
    validate(file)?;

    let mut writer = ChunkWriter::default();
    for model in &file.models {
        write_model(&mut writer, model);
    }

    let bytes = writer.into_bytes();
    debug!(
        "wrote {} collision models, {} bytes",
        file.models.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_surface(writer: &mut ChunkWriter, surface: Surface) {
    writer.write_bytes(&[
        surface.material,
        surface.flag,
        surface.brightness,
        surface.light,
    ]);
}

fn write_model(writer: &mut ChunkWriter, model: &CollisionModel) {
    let mut section = writer.begin_section(COLL);
    section.write_fixed_string(model.name.as_deref().unwrap_or_default(), NAME_LEN);
    section.write_u16(model.model_id);

    let bounds = model.bounds;
    section.write_f32(bounds.radius);
    section.write_vec3(bounds.center);
    section.write_vec3(bounds.min);
    section.write_vec3(bounds.max);

    let spheres: Vec<_> = model.spheres().collect();
    section.write_u32(spheres.len() as u32);
    for sphere in spheres {
        section.write_f32(sphere.radius);
        section.write_vec3(sphere.center);
        write_surface(&mut section, sphere.surface);
    }

    // line shapes
    section.write_u32(0);

    let boxes: Vec<_> = model.boxes().collect();
    section.write_u32(boxes.len() as u32);
    for b in boxes {
        section.write_vec3(b.min);
        section.write_vec3(b.max);
        write_surface(&mut section, b.surface);
    }

    let (vertices, faces) = model
        .mesh()
        .map_or((&[][..], &[][..]), |mesh| (&mesh.vertices[..], &mesh.faces[..]));
    section.write_u32(vertices.len() as u32);
    for vertex in vertices {
        section.write_vec3(*vertex);
    }
    section.write_u32(faces.len() as u32);
    for face in faces {
        for index in face.indices {
            section.write_u32(index);
        }
        write_surface(&mut section, face.surface);
    }
}
