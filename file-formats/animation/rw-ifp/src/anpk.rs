//! ANPK layout
//!
//! ```text
//! ANPK
//!   INFO  i32 animation count, package name
//!   NAME  animation name                      (repeated per animation)
//!   DGAN
//!     INFO  i32 track count, i32 0
//!     CPAN                                    (repeated per track)
//!       ANIM  name[28], i32 frames, i32 0, i32 next, i32 prev [, i32 bone id]
//!             (44 bytes, or 48 with a bone id)
//!       KR00 | KRT0 | KRTS  keyframes
//! ```
//!
//! Section payloads are followed by padding to a four byte boundary.

use log::trace;
use rw_core::{ChunkReader, ChunkWriter, FormatError, Result, SectionHeader};

use crate::types::{Animation, AnimationPackage, BoneTrack, Keyframe, KeyframeShape, PackageFormat};
use crate::validator::ANPK_TRACK_NAME_LEN;

impl KeyframeShape {
    fn anpk_magic(self) -> [u8; 4] {
        match self {
            Self::Rotation => *b"KR00",
            Self::RotationTranslation => *b"KRT0",
            Self::RotationTranslationScale => *b"KRTS",
        }
    }

    fn from_anpk_magic(magic: &[u8; 4]) -> Option<Self> {
        match magic {
            b"KR00" => Some(Self::Rotation),
            b"KRT0" => Some(Self::RotationTranslation),
            b"KRTS" => Some(Self::RotationTranslationScale),
            _ => None,
        }
    }

    fn anpk_record_size(self) -> usize {
        match self {
            Self::Rotation => 20,
            Self::RotationTranslation => 32,
            Self::RotationTranslationScale => 44,
        }
    }
}

fn read_count(r: &mut ChunkReader<'_>, what: &str, min_record: usize) -> Result<usize> {
    let offset = r.position();
    let count = r.read_i32()?;
    let count = usize::try_from(count).map_err(|_| {
        FormatError::InvalidModel(format!("negative {what} count {count} at offset {offset:#x}"))
    })?;
    r.ensure_available(count, min_record)?;
    Ok(count)
}

/// Read the payload of an `ANPK` section
pub(crate) fn read_body(r: &mut ChunkReader<'_>) -> Result<AnimationPackage> {
    let info = r.expect_section(b"INFO")?;
    let (count, name) = r.enter_section(&info, |s| {
        let count = read_count(s, "animation", 0)?;
        let name = s.read_fixed_string(s.remaining())?;
        Ok((count, name))
    })?;
    r.align_to(4);
    // NAME and DGAN headers
    r.ensure_available(count, 2 * SectionHeader::SIZE)?;

    let mut animations = Vec::with_capacity(count);
    for _ in 0..count {
        animations.push(read_animation(r)?);
    }

    Ok(AnimationPackage {
        name,
        format: PackageFormat::Anpk,
        animations,
    })
}

fn read_animation(r: &mut ChunkReader<'_>) -> Result<Animation> {
    let header = r.expect_section(b"NAME")?;
    let name = r.enter_section(&header, |s| s.read_fixed_string(s.remaining()))?;
    r.align_to(4);

    let header = r.expect_section(b"DGAN")?;
    let tracks = r.enter_section(&header, read_tracks)?;
    r.align_to(4);
    trace!("animation {name:?}: {} tracks", tracks.len());

    Ok(Animation {
        name,
        compressed: false,
        tracks,
    })
}

fn read_tracks(r: &mut ChunkReader<'_>) -> Result<Vec<BoneTrack>> {
    let info = r.expect_section(b"INFO")?;
    let count = r.enter_section(&info, |s| {
        let count = s.read_i32()?;
        let _unknown = s.read_i32()?;
        Ok(count)
    })?;
    let count = usize::try_from(count).map_err(|_| {
        FormatError::InvalidModel(format!("negative track count {count}"))
    })?;
    r.ensure_available(count, SectionHeader::SIZE)?;

    let mut tracks = Vec::with_capacity(count);
    for _ in 0..count {
        let header = r.expect_section(b"CPAN")?;
        tracks.push(r.enter_section(&header, read_track)?);
    }
    Ok(tracks)
}

fn read_track(r: &mut ChunkReader<'_>) -> Result<BoneTrack> {
    let header = r.expect_section(b"ANIM")?;
    let (name, frames, bone_id) = r.enter_section(&header, |s| {
        let name = s.read_fixed_string(ANPK_TRACK_NAME_LEN)?;
        let frames = read_count(s, "keyframe", 0)?;
        let _unknown = s.read_i32()?;
        let _next = s.read_i32()?;
        let _prev = s.read_i32()?;
        let bone_id = if s.is_empty() {
            None
        } else {
            Some(s.read_i32()?)
        };
        Ok((name, frames, bone_id))
    })?;

    let keyframes = if frames == 0 && r.is_empty() {
        Vec::new()
    } else {
        let header = r.read_section_header()?;
        let shape = KeyframeShape::from_anpk_magic(&header.magic).ok_or_else(|| {
            FormatError::InvalidMagic {
                offset: header.offset - SectionHeader::SIZE,
                expected: "KR00, KRT0 or KRTS".to_string(),
                found: header.magic_str(),
            }
        })?;
        r.enter_section(&header, |s| read_keyframes(s, shape, frames))?
    };

    Ok(BoneTrack {
        name,
        bone_id,
        keyframes,
    })
}

fn read_keyframes(r: &mut ChunkReader<'_>, shape: KeyframeShape, frames: usize) -> Result<Vec<Keyframe>> {
    r.ensure_available(frames, shape.anpk_record_size())?;
    let mut keyframes = Vec::with_capacity(frames);
    for _ in 0..frames {
        let rotation = r.read_quat()?;
        let translation = match shape {
            KeyframeShape::Rotation => None,
            _ => Some(r.read_vec3()?),
        };
        let scale = match shape {
            KeyframeShape::RotationTranslationScale => Some(r.read_vec3()?),
            _ => None,
        };
        let time = r.read_f32()?;
        keyframes.push(Keyframe {
            time,
            rotation,
            translation,
            scale,
        });
    }
    Ok(keyframes)
}

/// Write a complete `ANPK` section. The package must already be validated.
pub(crate) fn write_package(writer: &mut ChunkWriter, package: &AnimationPackage) {
    let mut root = writer.begin_section(*b"ANPK");
    {
        let mut info = root.begin_section(*b"INFO");
        info.write_i32(package.animations.len() as i32);
        info.write_padded_string(&package.name);
    }

    for animation in &package.animations {
        {
            let mut name = root.begin_section(*b"NAME");
            name.write_padded_string(&animation.name);
        }

        let mut dgan = root.begin_section(*b"DGAN");
        {
            let mut info = dgan.begin_section(*b"INFO");
            info.write_i32(animation.tracks.len() as i32);
            info.write_i32(0);
        }
        for track in &animation.tracks {
            write_track(&mut dgan, track);
        }
    }
}

fn write_track(writer: &mut ChunkWriter, track: &BoneTrack) {
    let mut cpan = writer.begin_section(*b"CPAN");
    {
        let mut anim = cpan.begin_section(*b"ANIM");
        anim.write_fixed_string(&track.name, ANPK_TRACK_NAME_LEN);
        anim.write_i32(track.keyframes.len() as i32);
        anim.write_i32(0);
        anim.write_i32(0);
        anim.write_i32(0);
        if let Some(bone_id) = track.bone_id {
            anim.write_i32(bone_id);
        }
    }

    let Some(shape) = track.shape() else {
        return;
    };
    let mut frames = cpan.begin_section(shape.anpk_magic());
    for keyframe in &track.keyframes {
        frames.write_quat(keyframe.rotation);
        if let Some(translation) = keyframe.translation {
            frames.write_vec3(translation);
        }
        if let Some(scale) = keyframe.scale {
            frames.write_vec3(scale);
        }
        frames.write_f32(keyframe.time);
    }
}
