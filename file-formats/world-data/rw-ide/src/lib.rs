//! Parser and writer for GTA item definition (`.ide`) tables.
//!
//! An IDE file is a list of sections. Each section starts with its name on a
//! line of its own and ends with `end`; every line in between is a row of
//! comma separated fields. `#` starts a comment.
//!
//! | Section | Fields |
//! |---------|--------|
//! | `objs` | `id, model, txd, distance, flags` or `id, model, txd, meshes, distance x meshes, flags` |
//! | `tobj` | an `objs` row followed by `time on, time off` |
//! | `hier` | `id, model, txd` |
//! | `anim` | `id, model, txd, animation, distance, flags` |
//! | `weap` | `id, model, txd, animation, meshes, distance, flags` |
//! | `txdp` | `txd, parent txd` |
//!
//! Rows of any other section (`cars`, `peds`, `path`, `2dfx`, ...) are kept
//! as raw field lists and written back unchanged.
//!
//! # Examples
//!
//! ```
//! use rw_ide::{DrawDistance, IdeRows, parse, serialize};
//!
//! # fn main() -> rw_ide::Result<()> {
//! let file = parse("objs\n1000, wall01, generic, 299, 0 # a wall\nend\n")?;
//! let IdeRows::Objects(objects) = &file.sections[0].rows else { unreachable!() };
//! assert_eq!(objects[0].draw_distance, DrawDistance::Single(299.0));
//! assert_eq!(serialize(&file)?, "objs\n1000, wall01, generic, 299, 0\nend\n");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod parser;
pub mod types;
pub mod writer;

pub use parser::{parse, read_definitions};
pub use rw_core::{Codec, Decoded, FormatError, Result, Warning};
pub use types::{
    AnimatedDef, DrawDistance, HierarchyDef, IdeFile, IdeRows, IdeSection, ObjectDef,
    SectionKind, TextureParent, TimedObjectDef, WeaponDef,
};
pub use writer::{serialize, validate, write_definitions};

impl Codec for IdeFile {
    const EXTENSION: &'static str = "ide";
    const DESCRIPTION: &'static str = "IDE - Item Definition File";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_definitions(bytes).map(Decoded::new)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_definitions(self)
    }
}
