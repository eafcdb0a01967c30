//! ANP3 layout
//!
//! ```text
//! ANP3 u32 size
//! name[24], u32 animation count
//! per animation: name[24], u32 track count, u32 frame data size, u32 compressed
//! per track:     name[24], u32 frame type, u32 frame count, i32 bone id, frames
//! ```
//!
//! | type | contents | bytes |
//! |------|----------|-------|
//! | 1 | `f32` rotation, time | 20 |
//! | 2 | `f32` rotation, time, translation | 32 |
//! | 3 | `i16` rotation, time | 10 |
//! | 4 | `i16` rotation, time, translation | 16 |
//!
//! Quantized rotations are scaled by 4096, times by 60 and translations by 1024.

use glam::{Quat, Vec3};
use log::{debug, trace};
use rw_core::{ChunkReader, ChunkWriter, FormatError, Result};

use crate::types::{Animation, AnimationPackage, BoneTrack, Keyframe, PackageFormat};
use crate::validator::ANP3_NAME_LEN;

pub(crate) const ROTATION_SCALE: f32 = 4096.0;
pub(crate) const TIME_SCALE: f32 = 60.0;
pub(crate) const TRANSLATION_SCALE: f32 = 1024.0;

/// name + three u32 fields
const HEADER_LEN: usize = ANP3_NAME_LEN + 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameType {
    compressed: bool,
    translation: bool,
}

impl FrameType {
    fn from_id(id: u32) -> Option<Self> {
        let (compressed, translation) = match id {
            1 => (false, false),
            2 => (false, true),
            3 => (true, false),
            4 => (true, true),
            _ => return None,
        };
        Some(Self {
            compressed,
            translation,
        })
    }

    fn id(self) -> u32 {
        match (self.compressed, self.translation) {
            (false, false) => 1,
            (false, true) => 2,
            (true, false) => 3,
            (true, true) => 4,
        }
    }

    fn record_size(self) -> usize {
        match (self.compressed, self.translation) {
            (false, false) => 20,
            (false, true) => 32,
            (true, false) => 10,
            (true, true) => 16,
        }
    }

    fn read(self, r: &mut ChunkReader<'_>) -> Result<Keyframe> {
        let (rotation, time, translation) = if self.compressed {
            let mut rotation = [0.0; 4];
            for component in &mut rotation {
                *component = f32::from(r.read_i16()?) / ROTATION_SCALE;
            }
            let time = f32::from(r.read_i16()?) / TIME_SCALE;
            let translation = if self.translation {
                Some(Vec3::new(
                    f32::from(r.read_i16()?) / TRANSLATION_SCALE,
                    f32::from(r.read_i16()?) / TRANSLATION_SCALE,
                    f32::from(r.read_i16()?) / TRANSLATION_SCALE,
                ))
            } else {
                None
            };
            (Quat::from_array(rotation), time, translation)
        } else {
            let rotation = r.read_quat()?;
            let time = r.read_f32()?;
            let translation = if self.translation {
                Some(r.read_vec3()?)
            } else {
                None
            };
            (rotation, time, translation)
        };

        Ok(Keyframe {
            time,
            rotation,
            translation,
            scale: None,
        })
    }

    fn write(self, w: &mut ChunkWriter, keyframe: &Keyframe) {
        let quantize = |value: f32, scale: f32| (value * scale).round() as i16;
        let translation = keyframe.translation.unwrap_or(Vec3::ZERO);
        if self.compressed {
            for component in keyframe.rotation.to_array() {
                w.write_i16(quantize(component, ROTATION_SCALE));
            }
            w.write_i16(quantize(keyframe.time, TIME_SCALE));
            if self.translation {
                for component in translation.to_array() {
                    w.write_i16(quantize(component, TRANSLATION_SCALE));
                }
            }
        } else {
            w.write_quat(keyframe.rotation);
            w.write_f32(keyframe.time);
            if self.translation {
                w.write_vec3(translation);
            }
        }
    }
}

/// Read the payload of an `ANP3` section
pub(crate) fn read_body(r: &mut ChunkReader<'_>) -> Result<AnimationPackage> {
    let name = r.read_fixed_string(ANP3_NAME_LEN)?;
    let count = r.read_u32()? as usize;
    r.ensure_available(count, HEADER_LEN)?;

    let mut animations = Vec::with_capacity(count);
    for _ in 0..count {
        animations.push(read_animation(r)?);
    }

    if !r.is_empty() && r.skip_zero_padding() {
        debug!("skipped zero padding at the end of the package");
    }

    Ok(AnimationPackage {
        name,
        format: PackageFormat::Anp3,
        animations,
    })
}

fn read_animation(r: &mut ChunkReader<'_>) -> Result<Animation> {
    let name = r.read_fixed_string(ANP3_NAME_LEN)?;
    let track_count = r.read_u32()? as usize;
    let frame_data_size = r.read_u32()?;
    let compressed = r.read_u32()? != 0;
    r.ensure_available(track_count, HEADER_LEN)?;
    trace!(
        "animation {name:?}: {track_count} tracks, {frame_data_size} bytes of frames, compressed: {compressed}"
    );

    let mut tracks = Vec::with_capacity(track_count);
    for _ in 0..track_count {
        let track_name = r.read_fixed_string(ANP3_NAME_LEN)?;
        let offset = r.position();
        let type_id = r.read_u32()?;
        let frames = r.read_u32()? as usize;
        let bone_id = r.read_i32()?;

        let frame_type = FrameType::from_id(type_id).ok_or_else(|| {
            FormatError::UnsupportedFormatVersion(format!(
                "ANP3 frame type {type_id} at offset {offset:#x}"
            ))
        })?;
        r.ensure_available(frames, frame_type.record_size())?;
        let keyframes = (0..frames)
            .map(|_| frame_type.read(r))
            .collect::<Result<Vec<_>>>()?;

        tracks.push(BoneTrack {
            name: track_name,
            bone_id: Some(bone_id),
            keyframes,
        });
    }

    Ok(Animation {
        name,
        compressed,
        tracks,
    })
}

fn frame_type(animation: &Animation, track: &BoneTrack) -> FrameType {
    FrameType {
        compressed: animation.compressed,
        translation: track.keyframes.first().is_some_and(|k| k.translation.is_some()),
    }
}

/// Write a complete `ANP3` section. The package must already be validated.
pub(crate) fn write_package(writer: &mut ChunkWriter, package: &AnimationPackage) {
    let mut root = writer.begin_section(*b"ANP3");
    root.write_fixed_string(&package.name, ANP3_NAME_LEN);
    root.write_u32(package.animations.len() as u32);

    for animation in &package.animations {
        let frame_data_size: usize = animation
            .tracks
            .iter()
            .map(|track| frame_type(animation, track).record_size() * track.keyframes.len())
            .sum();

        root.write_fixed_string(&animation.name, ANP3_NAME_LEN);
        root.write_u32(animation.tracks.len() as u32);
        root.write_u32(frame_data_size as u32);
        root.write_u32(u32::from(animation.compressed));

        for track in &animation.tracks {
            let frame_type = frame_type(animation, track);
            root.write_fixed_string(&track.name, ANP3_NAME_LEN);
            root.write_u32(frame_type.id());
            root.write_u32(track.keyframes.len() as u32);
            root.write_i32(track.bone_id.unwrap_or_default());
            for keyframe in &track.keyframes {
                frame_type.write(&mut root, keyframe);
            }
        }
    }
}
