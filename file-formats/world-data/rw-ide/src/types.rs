//! Item definition records

/// Row layout selected by a section name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    /// `objs`: static objects
    Objects,
    /// `tobj`: objects visible only during certain hours
    TimedObjects,
    /// `hier`: cutscene hierarchies
    Hierarchy,
    /// `anim`: objects with an animation file (San Andreas)
    Animated,
    /// `weap`: weapon models (Vice City, San Andreas)
    Weapons,
    /// `txdp`: texture dictionary parents (San Andreas)
    TextureParents,
    /// Any other section; rows are kept as raw fields
    Other,
}

impl SectionKind {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "objs" => Self::Objects,
            "tobj" => Self::TimedObjects,
            "hier" => Self::Hierarchy,
            "anim" => Self::Animated,
            "weap" => Self::Weapons,
            "txdp" => Self::TextureParents,
            _ => Self::Other,
        }
    }

    /// Canonical section name, `None` for [`SectionKind::Other`]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Objects => Some("objs"),
            Self::TimedObjects => Some("tobj"),
            Self::Hierarchy => Some("hier"),
            Self::Animated => Some("anim"),
            Self::Weapons => Some("weap"),
            Self::TextureParents => Some("txdp"),
            Self::Other => None,
        }
    }
}

/// Draw distance of an object definition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DrawDistance {
    /// `id, model, txd, distance, flags`
    Single(f32),
    /// `id, model, txd, mesh count, distance..., flags` with one to three meshes
    PerMesh(Vec<f32>),
}

impl DrawDistance {
    /// Largest distance at which any mesh is drawn
    pub fn max(&self) -> f32 {
        match self {
            Self::Single(distance) => *distance,
            Self::PerMesh(distances) => distances.iter().copied().fold(0.0, f32::max),
        }
    }
}

impl Default for DrawDistance {
    fn default() -> Self {
        Self::Single(100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectDef {
    pub id: i32,
    pub model: String,
    pub txd: String,
    pub draw_distance: DrawDistance,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedObjectDef {
    pub object: ObjectDef,
    /// Hour the object appears
    pub time_on: u8,
    /// Hour the object disappears
    pub time_off: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchyDef {
    pub id: i32,
    pub model: String,
    pub txd: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimatedDef {
    pub id: i32,
    pub model: String,
    pub txd: String,
    /// IFP package holding the object's animations
    pub animation: String,
    pub draw_distance: f32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeaponDef {
    pub id: i32,
    pub model: String,
    pub txd: String,
    pub animation: String,
    pub mesh_count: u32,
    pub draw_distance: f32,
    pub flags: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextureParent {
    pub txd: String,
    pub parent: String,
}

/// Rows of one section, typed by the section's layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IdeRows {
    Objects(Vec<ObjectDef>),
    TimedObjects(Vec<TimedObjectDef>),
    Hierarchy(Vec<HierarchyDef>),
    Animated(Vec<AnimatedDef>),
    Weapons(Vec<WeaponDef>),
    TextureParents(Vec<TextureParent>),
    Raw(Vec<Vec<String>>),
}

impl IdeRows {
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::Objects(_) => SectionKind::Objects,
            Self::TimedObjects(_) => SectionKind::TimedObjects,
            Self::Hierarchy(_) => SectionKind::Hierarchy,
            Self::Animated(_) => SectionKind::Animated,
            Self::Weapons(_) => SectionKind::Weapons,
            Self::TextureParents(_) => SectionKind::TextureParents,
            Self::Raw(_) => SectionKind::Other,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Objects(rows) => rows.len(),
            Self::TimedObjects(rows) => rows.len(),
            Self::Hierarchy(rows) => rows.len(),
            Self::Animated(rows) => rows.len(),
            Self::Weapons(rows) => rows.len(),
            Self::TextureParents(rows) => rows.len(),
            Self::Raw(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdeSection {
    /// Name as written in the file
    pub name: String,
    pub rows: IdeRows,
}

impl IdeSection {
    pub fn kind(&self) -> SectionKind {
        SectionKind::from_name(&self.name)
    }
}

/// Root object of an `.ide` file
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdeFile {
    pub sections: Vec<IdeSection>,
}

impl IdeFile {
    /// Every `objs` and `tobj` definition in file order
    pub fn objects(&self) -> impl Iterator<Item = &ObjectDef> {
        self.sections.iter().flat_map(|section| {
            let (plain, timed): (&[ObjectDef], &[TimedObjectDef]) = match &section.rows {
                IdeRows::Objects(rows) => (rows, &[]),
                IdeRows::TimedObjects(rows) => (&[], rows),
                _ => (&[], &[]),
            };
            plain.iter().chain(timed.iter().map(|timed| &timed.object))
        })
    }

    /// Object definition by id
    pub fn object(&self, id: i32) -> Option<&ObjectDef> {
        self.objects().find(|object| object.id == id)
    }
}
