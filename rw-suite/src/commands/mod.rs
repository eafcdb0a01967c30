//! Command implementations

pub mod convert;
pub mod formats;
pub mod info;
pub mod tree;
pub mod validate;
