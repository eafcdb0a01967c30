//! In-memory representation of a clump

use bitflags::bitflags;
use glam::{Mat3, Vec2, Vec3};
use rw_core::RwVersion;

bitflags! {
    /// Geometry format flags.
    ///
    /// Bits 16 to 23 of the on-disk word hold the texture coordinate set count;
    /// that count is carried by [`Geometry::tex_coords`] instead.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct GeometryFlags: u32 {
        /// Triangles form a strip
        const TRISTRIP = 0x0000_0001;
        /// Morph targets carry vertex positions
        const POSITIONS = 0x0000_0002;
        /// One texture coordinate set
        const TEXTURED = 0x0000_0004;
        /// Prelit vertex colors are present
        const PRELIT = 0x0000_0008;
        /// Morph targets carry normals
        const NORMALS = 0x0000_0010;
        /// Geometry is lit
        const LIGHT = 0x0000_0020;
        /// Modulate material color
        const MODULATE_MATERIAL_COLOR = 0x0000_0040;
        /// Two texture coordinate sets
        const TEXTURED2 = 0x0000_0080;
        /// Vertex data lives in a platform-specific plugin
        const NATIVE = 0x0100_0000;
    }
}

/// Mask of the texture coordinate set count inside the geometry flags word
pub const TEX_SET_COUNT_MASK: u32 = 0x00FF_0000;

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A transform node in the frame hierarchy
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Name from the frame name plugin
    pub name: Option<String>,
    /// Parent-relative orientation (right, up, at columns)
    pub rotation: Mat3,
    /// Parent-relative position
    pub position: Vec3,
    /// Index of the parent frame; always less than this frame's own index
    pub parent: Option<usize>,
    /// Matrix creation flags
    pub flags: u32,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            name: None,
            rotation: Mat3::IDENTITY,
            position: Vec3::ZERO,
            parent: None,
            flags: 0,
        }
    }
}

/// Legacy per-geometry lighting coefficients, present before RenderWare 3.4
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lighting {
    pub ambient: f32,
    pub specular: f32,
    pub diffuse: f32,
}

/// Material surface properties, present after RenderWare 3.4.0.0
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceProperties {
    pub ambient: f32,
    pub specular: f32,
    pub diffuse: f32,
}

impl Default for SurfaceProperties {
    fn default() -> Self {
        Self {
            ambient: 1.0,
            specular: 1.0,
            diffuse: 1.0,
        }
    }
}

/// A texture reference inside a material
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Texture {
    pub name: String,
    pub mask: String,
    /// Filter mode (low byte of the filter word)
    pub filter: u8,
    /// U addressing mode (4 bits)
    pub address_u: u8,
    /// V addressing mode (4 bits)
    pub address_v: u8,
    /// Upper half of the filter word
    pub mip_flags: u16,
}

impl Texture {
    pub(crate) fn filter_word(&self) -> u32 {
        u32::from(self.filter)
            | (u32::from(self.address_u & 0x0F) << 8)
            | (u32::from(self.address_v & 0x0F) << 12)
            | (u32::from(self.mip_flags) << 16)
    }

    pub(crate) fn set_filter_word(&mut self, word: u32) {
        self.filter = (word & 0xFF) as u8;
        self.address_u = ((word >> 8) & 0x0F) as u8;
        self.address_v = ((word >> 12) & 0x0F) as u8;
        self.mip_flags = (word >> 16) as u16;
    }
}

/// Surface appearance of a group of triangles
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub flags: u32,
    pub color: Rgba,
    pub texture: Option<Texture>,
    pub surface: Option<SurfaceProperties>,
}

/// A triangle referencing three vertices and a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub vertices: [u16; 3],
    pub material: u16,
}

/// Bounding sphere of a morph target
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Smallest sphere around the box enclosing `points`
    pub fn enclosing(points: &[Vec3]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max);
        Self { center, radius }
    }
}

/// One key shape of a geometry
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphTarget {
    pub bounding_sphere: BoundingSphere,
    pub positions: Option<Vec<Vec3>>,
    pub normals: Option<Vec<Vec3>>,
}

/// Mesh data: vertices, triangles and materials
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub flags: GeometryFlags,
    pub vertex_count: u32,
    /// Present exactly when the clump version is below 3.4
    pub lighting: Option<Lighting>,
    /// Per-vertex colors; present exactly when [`GeometryFlags::PRELIT`] is set
    pub prelit: Option<Vec<Rgba>>,
    /// Texture coordinate sets, each with one entry per vertex
    pub tex_coords: Vec<Vec<Vec2>>,
    pub triangles: Vec<Triangle>,
    pub morph_targets: Vec<MorphTarget>,
    pub materials: Vec<Material>,
}

/// Binds a geometry to a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atomic {
    pub frame: usize,
    pub geometry: usize,
    pub flags: u32,
}

/// Root object of a DFF file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clump {
    /// Library id written to every chunk header
    pub version: RwVersion,
    pub frames: Vec<Frame>,
    pub geometries: Vec<Geometry>,
    pub atomics: Vec<Atomic>,
}

impl Clump {
    /// Whether geometry structs carry [`Lighting`] at this version
    pub fn has_geometry_lighting(&self) -> bool {
        self.version.version() < 0x34000
    }

    /// Whether material structs carry [`SurfaceProperties`] at this version
    pub fn has_surface_properties(&self) -> bool {
        self.version.version() > 0x30400
    }

    /// Whether the clump struct carries light and camera counts at this version
    pub fn has_light_counts(&self) -> bool {
        self.version.version() > 0x33000
    }

    /// Total triangle count across all geometries
    pub fn triangle_count(&self) -> usize {
        self.geometries.iter().map(|g| g.triangles.len()).sum()
    }

    /// Find a frame by name
    pub fn frame_by_name(&self, name: &str) -> Option<(usize, &Frame)> {
        self.frames
            .iter()
            .enumerate()
            .find(|(_, frame)| frame.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_word_split() {
        let mut texture = Texture::default();
        texture.set_filter_word(0x0001_1206);
        assert_eq!(texture.filter, 6);
        assert_eq!(texture.address_u, 2);
        assert_eq!(texture.address_v, 1);
        assert_eq!(texture.mip_flags, 1);
        assert_eq!(texture.filter_word(), 0x0001_1206);
    }

    #[test]
    fn test_version_gates() {
        let mut clump = Clump {
            version: RwVersion::GTA3,
            ..Clump::default()
        };
        assert!(clump.has_geometry_lighting());
        assert!(!clump.has_light_counts());
        assert!(clump.has_surface_properties());

        clump.version = RwVersion::SAN_ANDREAS;
        assert!(!clump.has_geometry_lighting());
        assert!(clump.has_light_counts());
    }

    #[test]
    fn test_enclosing_sphere() {
        let sphere = BoundingSphere::enclosing(&[Vec3::new(-1.0, 0.0, 0.0), Vec3::X]);
        assert_eq!(sphere.center, Vec3::ZERO);
        assert_eq!(sphere.radius, 1.0);
    }
}
