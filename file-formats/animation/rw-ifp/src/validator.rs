//! Keyframe ordering and per-layout constraints

use std::cmp::Ordering;

use rw_core::{FormatError, Result};

use crate::anp3::{ROTATION_SCALE, TIME_SCALE, TRANSLATION_SCALE};
use crate::types::{AnimationPackage, KeyframeShape, PackageFormat};

/// ANPK track names are stored in 28 bytes
pub const ANPK_TRACK_NAME_LEN: usize = 28;
/// Every ANP3 name field is 24 bytes
pub const ANP3_NAME_LEN: usize = 24;

/// Fail with [`FormatError::InvalidKeyframeOrder`] on the first keyframe
/// whose time precedes (or can not be compared with) the previous one
pub fn check_keyframe_order(package: &AnimationPackage) -> Result<()> {
    for (a, animation) in package.animations.iter().enumerate() {
        for (t, track) in animation.tracks.iter().enumerate() {
            for (k, pair) in track.keyframes.windows(2).enumerate() {
                match pair[1].time.partial_cmp(&pair[0].time) {
                    Some(Ordering::Equal | Ordering::Greater) => {}
                    Some(Ordering::Less) | None => {
                        return Err(FormatError::InvalidKeyframeOrder {
                            animation: a,
                            track: t,
                            keyframe: k + 1,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Whether `value` is a multiple of `1 / scale` that fits an `i16` once scaled
fn on_i16_grid(value: f32, scale: f32) -> bool {
    let scaled = (value * scale).round();
    scaled.is_finite()
        && scaled >= f32::from(i16::MIN)
        && scaled <= f32::from(i16::MAX)
        && scaled / scale == value
}

fn name_fits(name: &str, width: usize) -> bool {
    name.chars().count() < width && name.chars().all(|c| c != '\0' && u32::from(c) <= 0xFF)
}

/// Check that a package can be written in its format and read back unchanged
pub fn validate_for_save(package: &AnimationPackage) -> Result<()> {
    check_keyframe_order(package)?;

    let anp3 = package.format == PackageFormat::Anp3;
    // ANPK package and animation names are variable length
    let name_width = if anp3 { ANP3_NAME_LEN } else { usize::MAX };

    if !name_fits(&package.name, name_width) {
        return Err(FormatError::InvalidModel(format!(
            "package name {:?} is not storable in {}",
            package.name, package.format
        )));
    }

    for (a, animation) in package.animations.iter().enumerate() {
        let invalid = |message: String| -> Result<()> {
            Err(FormatError::InvalidModel(format!(
                "animation {a} ({:?}): {message}",
                animation.name
            )))
        };

        if !name_fits(&animation.name, name_width) {
            return invalid(format!("name is not storable in {}", package.format));
        }
        if !anp3 && animation.compressed {
            return invalid("ANPK packages can not store compressed keyframes".to_string());
        }

        for (t, track) in animation.tracks.iter().enumerate() {
            let width = if anp3 {
                ANP3_NAME_LEN
            } else {
                ANPK_TRACK_NAME_LEN
            };
            if !name_fits(&track.name, width) {
                return invalid(format!(
                    "track {t} name {:?} does not fit {width} bytes",
                    track.name
                ));
            }

            let shape = track.shape();
            if !track.keyframes.is_empty() && shape.is_none() {
                return invalid(format!("track {t} has scale without translation"));
            }
            if track.keyframes.iter().any(|k| k.shape() != shape) {
                return invalid(format!("track {t} mixes keyframe shapes"));
            }

            if !anp3 {
                continue;
            }

            if track.bone_id.is_none() {
                return invalid(format!("track {t} needs a bone id in ANP3"));
            }
            if shape == Some(KeyframeShape::RotationTranslationScale) {
                return invalid(format!("track {t} has scale, which ANP3 can not store"));
            }
            if animation.compressed {
                for (k, keyframe) in track.keyframes.iter().enumerate() {
                    let rotation = keyframe.rotation.to_array();
                    let translation = keyframe.translation.map_or([0.0; 3], |v| v.to_array());
                    let fits = on_i16_grid(keyframe.time, TIME_SCALE)
                        && rotation.iter().all(|&v| on_i16_grid(v, ROTATION_SCALE))
                        && translation.iter().all(|&v| on_i16_grid(v, TRANSLATION_SCALE));
                    if !fits {
                        return invalid(format!(
                            "track {t}, keyframe {k} is off the fixed-point grid or out of range for compressed storage"
                        ));
                    }
                }
            }
        }
    }

    Ok(())
}
