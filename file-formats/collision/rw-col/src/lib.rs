//! Reader and writer for GTA collision archives.
//!
//! A `.col` file is a sequence of collision models stored back to back, each
//! introduced by a `COLL` section header. Version 1 models (GTA III, Vice
//! City) are supported; the later `COL2`/`COL3`/`COL4` layouts are reported
//! as [`FormatError::UnsupportedFormatVersion`].
//!
//! Each model holds spheres, boxes and a triangle mesh. Version 1 also has a
//! "line" shape list whose record layout is not defined; a model that uses it
//! fails with [`FormatError::UnsupportedShape`] since the remainder of the
//! model can not be located without knowing the record size.

#![forbid(unsafe_code)]

pub mod reader;
pub mod types;
pub mod writer;

pub use reader::read_collision_file;
pub use rw_core::{Codec, Decoded, FormatError, Result, Warning};
pub use types::{
    Bounds, CollisionBox, CollisionFile, CollisionModel, Face, Mesh, Shape, Sphere, Surface,
};
pub use writer::{validate, write_collision_file};

impl Codec for CollisionFile {
    const EXTENSION: &'static str = "col";
    const DESCRIPTION: &'static str = "COL - Collision Data Format";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_collision_file(bytes)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_collision_file(self)
    }
}
