//! rw-suite library
//!
//! Maps file extensions to the RenderWare era codecs and offers path based
//! load and save helpers on top of them.
//!
//! ```
//! use rw_suite::registry::{FormatKind, dispatch, list_supported_formats};
//!
//! assert_eq!(dispatch(".DFF"), Some(FormatKind::Dff));
//! assert_eq!(list_supported_formats().len(), 7);
//! assert_eq!(FormatKind::detect(b"VER2\0\0\0\0"), Some(FormatKind::Img));
//! ```

pub mod registry;
pub mod summary;
pub mod tree;

pub use registry::{
    Asset, FormatKind, RegistryError, dispatch, list_supported_formats, load_path, save_path,
};
pub use summary::{Stat, Summary};
