//! Reader and writer for RenderWare DFF model files.
//!
//! A DFF file holds one clump: a frame hierarchy, a list of geometries with
//! their materials, and atomics binding geometries to frames. Files written by
//! GTA III, Vice City and San Andreas (PC) are supported. Platform-native
//! geometry is rejected.
//!
//! Loading validates every index in the clump. Saving additionally checks that
//! the optional, version-dependent data matches [`Clump::version`], so that a
//! saved clump always loads back equal.
//!
//! # Examples
//!
//! ```
//! use rw_dff::{Atomic, Clump, Codec, Frame, Geometry, Material, SurfaceProperties, Triangle};
//! use rw_dff::{MorphTarget, BoundingSphere};
//! use glam::Vec3;
//!
//! # fn main() -> rw_dff::Result<()> {
//! let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
//! let clump = Clump {
//!     frames: vec![Frame::default()],
//!     geometries: vec![Geometry {
//!         vertex_count: 3,
//!         triangles: vec![Triangle { vertices: [0, 1, 2], material: 0 }],
//!         morph_targets: vec![MorphTarget {
//!             bounding_sphere: BoundingSphere::enclosing(&positions),
//!             positions: Some(positions),
//!             normals: None,
//!         }],
//!         materials: vec![Material {
//!             surface: Some(SurfaceProperties::default()),
//!             ..Material::default()
//!         }],
//!         ..Geometry::default()
//!     }],
//!     atomics: vec![Atomic::default()],
//!     ..Clump::default()
//! };
//!
//! let bytes = clump.save()?;
//! let loaded = Clump::load(&bytes)?;
//! assert_eq!(loaded.value, clump);
//! assert!(loaded.warnings.is_empty());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod reader;
pub mod types;
pub mod validator;
pub mod writer;

pub use reader::read_clump;
pub use rw_core::{Codec, Decoded, FormatError, Result, RwVersion, Warning};
pub use types::{
    Atomic, BoundingSphere, Clump, Frame, Geometry, GeometryFlags, Lighting, Material,
    MorphTarget, Rgba, SurfaceProperties, Texture, Triangle,
};
pub use writer::write_clump;

impl Codec for Clump {
    const EXTENSION: &'static str = "dff";
    const DESCRIPTION: &'static str = "DFF - RenderWare 3D Model Format";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_clump(bytes)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_clump(self)
    }
}
