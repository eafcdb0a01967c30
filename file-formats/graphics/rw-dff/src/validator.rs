//! Structural checks on a [`Clump`]
//!
//! Index invariants are checked both after loading and before saving. Saving
//! additionally requires the version-dependent optional fields and the
//! geometry flags to agree with the data, so that a saved clump loads back
//! unchanged.

use rw_core::{FormatError, Result};

use crate::types::{Clump, Geometry, GeometryFlags};

/// Highest number of texture coordinate sets a geometry can carry
pub const MAX_TEX_SETS: usize = 8;

fn invalid(message: String) -> FormatError {
    FormatError::InvalidModel(message)
}

/// Check frame, triangle, material and atomic indices
pub fn validate_indices(clump: &Clump) -> Result<()> {
    for (index, frame) in clump.frames.iter().enumerate() {
        if let Some(parent) = frame.parent {
            if parent >= index {
                return Err(invalid(format!(
                    "frame {index} has parent {parent}, which does not precede it"
                )));
            }
        }
    }

    for (index, geometry) in clump.geometries.iter().enumerate() {
        validate_geometry(index, geometry)?;
    }

    for (index, atomic) in clump.atomics.iter().enumerate() {
        if atomic.frame >= clump.frames.len() {
            return Err(invalid(format!(
                "atomic {index} references frame {} of {}",
                atomic.frame,
                clump.frames.len()
            )));
        }
        if atomic.geometry >= clump.geometries.len() {
            return Err(invalid(format!(
                "atomic {index} references geometry {} of {}",
                atomic.geometry,
                clump.geometries.len()
            )));
        }
    }

    Ok(())
}

fn validate_geometry(index: usize, geometry: &Geometry) -> Result<()> {
    let vertex_count = geometry.vertex_count as usize;

    for (t, triangle) in geometry.triangles.iter().enumerate() {
        if let Some(&vertex) = triangle
            .vertices
            .iter()
            .find(|&&v| usize::from(v) >= vertex_count)
        {
            return Err(invalid(format!(
                "geometry {index}, triangle {t}: vertex index {vertex} out of range for {vertex_count} vertices"
            )));
        }
        if usize::from(triangle.material) >= geometry.materials.len() {
            return Err(invalid(format!(
                "geometry {index}, triangle {t}: material {} out of range for {} materials",
                triangle.material,
                geometry.materials.len()
            )));
        }
    }

    let check_len = |what: &str, len: usize| {
        if len == vertex_count {
            Ok(())
        } else {
            Err(invalid(format!(
                "geometry {index}: {what} has {len} entries, expected {vertex_count}"
            )))
        }
    };

    if let Some(prelit) = &geometry.prelit {
        check_len("prelit color array", prelit.len())?;
    }
    for (set, coords) in geometry.tex_coords.iter().enumerate() {
        check_len(&format!("texture coordinate set {set}"), coords.len())?;
    }
    for (m, target) in geometry.morph_targets.iter().enumerate() {
        if let Some(positions) = &target.positions {
            check_len(&format!("morph target {m} positions"), positions.len())?;
        }
        if let Some(normals) = &target.normals {
            check_len(&format!("morph target {m} normals"), normals.len())?;
        }
    }

    Ok(())
}

/// Names are stored as Latin-1 and read back up to the first NUL
fn check_storable(what: String, value: &str) -> Result<()> {
    match value.chars().find(|&c| c == '\0' || u32::from(c) > 0xFF) {
        None => Ok(()),
        Some(c) => Err(invalid(format!(
            "{what} {value:?} holds {c:?}, which is NUL or outside Latin-1"
        ))),
    }
}

/// Everything [`validate_indices`] checks, plus agreement between flags,
/// version and optional data
pub fn validate_for_save(clump: &Clump) -> Result<()> {
    clump.version.check_supported()?;
    validate_indices(clump)?;

    let lighting_expected = clump.has_geometry_lighting();
    let surface_expected = clump.has_surface_properties();

    for (index, frame) in clump.frames.iter().enumerate() {
        if let Some(name) = &frame.name {
            check_storable(format!("frame {index} name"), name)?;
        }
    }

    for (index, geometry) in clump.geometries.iter().enumerate() {
        if geometry.flags.contains(GeometryFlags::NATIVE) {
            return Err(invalid(format!(
                "geometry {index}: native geometry can not be written"
            )));
        }
        if geometry.flags.bits() & crate::types::TEX_SET_COUNT_MASK != 0 {
            return Err(invalid(format!(
                "geometry {index}: flags carry a texture set count; use tex_coords instead"
            )));
        }
        if geometry.prelit.is_some() != geometry.flags.contains(GeometryFlags::PRELIT) {
            return Err(invalid(format!(
                "geometry {index}: PRELIT flag does not match prelit color presence"
            )));
        }

        let textured = geometry
            .flags
            .intersects(GeometryFlags::TEXTURED | GeometryFlags::TEXTURED2);
        if textured == geometry.tex_coords.is_empty() {
            return Err(invalid(format!(
                "geometry {index}: texture flags do not match {} texture coordinate sets",
                geometry.tex_coords.len()
            )));
        }
        if geometry.tex_coords.len() > MAX_TEX_SETS {
            return Err(invalid(format!(
                "geometry {index}: {} texture coordinate sets, at most {MAX_TEX_SETS} allowed",
                geometry.tex_coords.len()
            )));
        }
        if i32::try_from(geometry.vertex_count).is_err()
            || i32::try_from(geometry.triangles.len()).is_err()
        {
            return Err(invalid(format!("geometry {index}: too many vertices or triangles")));
        }

        if geometry.lighting.is_some() != lighting_expected {
            return Err(invalid(format!(
                "geometry {index}: lighting must be {} for version {}",
                if lighting_expected { "present" } else { "absent" },
                clump.version
            )));
        }

        for (m, material) in geometry.materials.iter().enumerate() {
            if material.surface.is_some() != surface_expected {
                return Err(invalid(format!(
                    "geometry {index}, material {m}: surface properties must be {} for version {}",
                    if surface_expected { "present" } else { "absent" },
                    clump.version
                )));
            }
            if let Some(texture) = &material.texture {
                let what = |field: &str| format!("geometry {index}, material {m}: texture {field}");
                check_storable(what("name"), &texture.name)?;
                check_storable(what("mask"), &texture.mask)?;
                if texture.address_u > 0x0F || texture.address_v > 0x0F {
                    return Err(invalid(format!(
                        "geometry {index}, material {m}: addressing modes are 4-bit values"
                    )));
                }
            }
        }
    }

    Ok(())
}
