//! Animation package data structures

use glam::{Quat, Vec3};
use std::fmt;

/// Container layout of an animation package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackageFormat {
    /// Nested sections with float keyframes (GTA III, Vice City)
    #[default]
    Anpk,
    /// Fixed headers, optionally quantized keyframes (San Andreas)
    Anp3,
}

impl PackageFormat {
    pub fn magic(self) -> [u8; 4] {
        match self {
            Self::Anpk => *b"ANPK",
            Self::Anp3 => *b"ANP3",
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anpk => write!(f, "ANPK"),
            Self::Anp3 => write!(f, "ANP3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe {
    /// Seconds from the start of the animation
    pub time: f32,
    pub rotation: Quat,
    pub translation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

/// What every keyframe of a track carries besides the rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyframeShape {
    Rotation,
    RotationTranslation,
    RotationTranslationScale,
}

impl Keyframe {
    /// `None` when a scale is present without a translation
    pub fn shape(&self) -> Option<KeyframeShape> {
        match (self.translation.is_some(), self.scale.is_some()) {
            (false, false) => Some(KeyframeShape::Rotation),
            (true, false) => Some(KeyframeShape::RotationTranslation),
            (true, true) => Some(KeyframeShape::RotationTranslationScale),
            (false, true) => None,
        }
    }
}

/// Keyframes driving one bone
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoneTrack {
    pub name: String,
    /// Bone id; always present in ANP3, optional in ANPK
    pub bone_id: Option<i32>,
    /// Times never decrease
    pub keyframes: Vec<Keyframe>,
}

impl BoneTrack {
    /// Shape shared by all keyframes; `None` for an empty track
    pub fn shape(&self) -> Option<KeyframeShape> {
        self.keyframes.first().and_then(Keyframe::shape)
    }

    /// Time of the last keyframe
    pub fn duration(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Animation {
    pub name: String,
    /// Keyframes are stored quantized (ANP3 only)
    pub compressed: bool,
    pub tracks: Vec<BoneTrack>,
}

impl Animation {
    pub fn duration(&self) -> f32 {
        self.tracks
            .iter()
            .map(BoneTrack::duration)
            .fold(0.0, f32::max)
    }
}

/// Root object of an `.ifp` file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationPackage {
    pub name: String,
    pub format: PackageFormat,
    pub animations: Vec<Animation>,
}

impl AnimationPackage {
    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations
            .iter()
            .find(|animation| animation.name.eq_ignore_ascii_case(name))
    }
}
