//! Item placement records

use glam::{Quat, Vec3};

/// Field layout of an `inst` row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InstanceLayout {
    /// `id, model, position, scale, rotation` (12 fields)
    Gta3,
    /// `id, model, interior, position, scale, rotation` (13 fields)
    ViceCity,
    /// `id, model, interior, position, rotation, lod` (11 fields)
    SanAndreas,
}

impl InstanceLayout {
    pub fn field_count(self) -> usize {
        match self {
            Self::Gta3 => 12,
            Self::ViceCity => 13,
            Self::SanAndreas => 11,
        }
    }

    pub fn from_field_count(count: usize) -> Option<Self> {
        match count {
            12 => Some(Self::Gta3),
            13 => Some(Self::ViceCity),
            11 => Some(Self::SanAndreas),
            _ => None,
        }
    }
}

/// One placed object
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// Object id from an IDE file
    pub id: i32,
    pub model: String,
    /// Vice City and San Andreas
    pub interior: Option<i32>,
    pub position: Vec3,
    /// GTA III and Vice City
    pub scale: Option<Vec3>,
    pub rotation: Quat,
    /// Index of the LOD instance in the same file, -1 for none (San Andreas)
    pub lod: Option<i32>,
}

impl Instance {
    /// Layout implied by the optional fields, `None` for a combination no
    /// game writes
    pub fn layout(&self) -> Option<InstanceLayout> {
        match (self.interior.is_some(), self.scale.is_some(), self.lod.is_some()) {
            (false, true, false) => Some(InstanceLayout::Gta3),
            (true, true, false) => Some(InstanceLayout::ViceCity),
            (true, false, true) => Some(InstanceLayout::SanAndreas),
            _ => None,
        }
    }
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            id: 0,
            model: String::new(),
            interior: None,
            position: Vec3::ZERO,
            scale: Some(Vec3::ONE),
            rotation: Quat::IDENTITY,
            lod: None,
        }
    }
}

/// A named box used for map zones, population and audio
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Zone {
    pub name: String,
    pub kind: i32,
    pub min: Vec3,
    pub max: Vec3,
    /// Island or level the zone belongs to
    pub level: i32,
}

/// Row layout selected by a section name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Instances,
    Zones,
    Other,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("inst") {
            Self::Instances
        } else if name.eq_ignore_ascii_case("zone") {
            Self::Zones
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IplRows {
    Instances(Vec<Instance>),
    Zones(Vec<Zone>),
    Raw(Vec<Vec<String>>),
}

impl IplRows {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Instances(_) => SectionKind::Instances,
            Self::Zones(_) => SectionKind::Zones,
            Self::Raw(_) => SectionKind::Other,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Instances(rows) => rows.len(),
            Self::Zones(rows) => rows.len(),
            Self::Raw(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IplSection {
    /// Name as written in the file
    pub name: String,
    pub rows: IplRows,
}

impl IplSection {
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_name(&self.name)
    }
}

/// Root object of an `.ipl` file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IplFile {
    pub sections: Vec<IplSection>,
}

impl IplFile {
    /// Every `inst` row in file order
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.sections.iter().flat_map(|section| match &section.rows {
            IplRows::Instances(rows) => rows.as_slice(),
            _ => &[],
        })
    }

    /// Every `zone` row in file order
    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.sections.iter().flat_map(|section| match &section.rows {
            IplRows::Zones(rows) => rows.as_slice(),
            _ => &[],
        })
    }
}
