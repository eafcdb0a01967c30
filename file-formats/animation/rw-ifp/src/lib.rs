//! Reader and writer for GTA IFP animation packages.
//!
//! Two container layouts exist:
//!
//! - `ANPK` (GTA III, Vice City): nested fourcc sections with float keyframes
//!   carrying a rotation plus optional translation and scale.
//! - `ANP3` (San Andreas): fixed-size headers; keyframes are either floats or
//!   quantized 16-bit integers.
//!
//! Keyframe times inside a track must never decrease. Loading reports
//! [`FormatError::InvalidKeyframeOrder`] for the first offending keyframe.
//!
//! # Examples
//!
//! ```
//! use glam::{Quat, Vec3};
//! use rw_ifp::{Animation, AnimationPackage, BoneTrack, Codec, Keyframe, PackageFormat};
//!
//! # fn main() -> rw_ifp::Result<()> {
//! let package = AnimationPackage {
//!     name: "ped".into(),
//!     format: PackageFormat::Anpk,
//!     animations: vec![Animation {
//!         name: "idle".into(),
//!         compressed: false,
//!         tracks: vec![BoneTrack {
//!             name: "Root".into(),
//!             bone_id: None,
//!             keyframes: vec![Keyframe {
//!                 time: 0.0,
//!                 rotation: Quat::IDENTITY,
//!                 translation: Some(Vec3::ZERO),
//!                 scale: None,
//!             }],
//!         }],
//!     }],
//! };
//!
//! let loaded = AnimationPackage::load(&package.save()?)?;
//! assert_eq!(loaded.value, package);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod anp3;
mod anpk;
pub mod types;
pub mod validator;

use log::debug;
use rw_core::{ChunkReader, ChunkWriter};

pub use rw_core::{Codec, Decoded, FormatError, Result, Warning};
pub use types::{Animation, AnimationPackage, BoneTrack, Keyframe, KeyframeShape, PackageFormat};
pub use validator::{check_keyframe_order, validate_for_save};

/// Decode an IFP file in either layout
pub fn read_package(bytes: &[u8]) -> Result<Decoded<AnimationPackage>> {
    let mut reader = ChunkReader::new(bytes);
    let header = reader.read_section_header()?;

    let package = match &header.magic {
        b"ANPK" => reader.enter_section(&header, anpk::read_body)?,
        b"ANP3" => reader.enter_section(&header, anp3::read_body)?,
        _ => {
            return Err(FormatError::InvalidMagic {
                offset: 0,
                expected: "ANPK or ANP3".to_string(),
                found: header.magic_str(),
            });
        }
    };
    debug!(
        "{} package {:?}: {} animations",
        package.format,
        package.name,
        package.animations.len()
    );

    if !reader.is_empty() {
        debug!("ignoring {} bytes after the package", reader.remaining());
    }

    check_keyframe_order(&package)?;
    Ok(Decoded::new(package))
}

/// Encode a package in the layout named by [`AnimationPackage::format`]
pub fn write_package(package: &AnimationPackage) -> Result<Vec<u8>> {
    validate_for_save(package)?;

    let mut writer = ChunkWriter::default();
    match package.format {
        PackageFormat::Anpk => anpk::write_package(&mut writer, package),
        PackageFormat::Anp3 => anp3::write_package(&mut writer, package),
    }
    Ok(writer.into_bytes())
}

impl Codec for AnimationPackage {
    const EXTENSION: &'static str = "ifp";
    const DESCRIPTION: &'static str = "IFP - Animation Package Format";

    fn load(bytes: &[u8]) -> Result<Decoded<Self>> {
        read_package(bytes)
    }

    fn save(&self) -> Result<Vec<u8>> {
        write_package(self)
    }
}
