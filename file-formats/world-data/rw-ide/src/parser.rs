//! Text to [`IdeFile`]

use log::{debug, trace};
use rw_core::text::{self, Record};
use rw_core::{FormatError, Result};

use crate::types::{
    AnimatedDef, DrawDistance, HierarchyDef, IdeFile, IdeRows, IdeSection, ObjectDef,
    SectionKind, TextureParent, TimedObjectDef, WeaponDef,
};

/// `objs` arities: distance form, then one to three meshes
pub const OBJECT_ARITIES: [usize; 4] = [5, 6, 7, 8];
/// `tobj` arities: an `objs` row plus two hours
pub const TIMED_OBJECT_ARITIES: [usize; 4] = [7, 8, 9, 10];

/// Parse a Latin-1 encoded IDE file
pub fn read_definitions(bytes: &[u8]) -> Result<IdeFile> {
    build(text::read_sections(bytes)?)
}

/// Parse IDE text
pub fn parse(source: &str) -> Result<IdeFile> {
    build(text::parse_sections(source)?)
}

fn build(raw: Vec<text::RawSection>) -> Result<IdeFile> {
    let mut sections = Vec::with_capacity(raw.len());
    for section in raw {
        let kind = SectionKind::from_name(&section.name);
        trace!(
            "section {} ({kind:?}) at line {}, {} rows",
            section.name,
            section.line,
            section.records.len()
        );
        let records = &section.records;
        let rows = match kind {
            SectionKind::Objects => IdeRows::Objects(rows(records, parse_object)?),
            SectionKind::TimedObjects => IdeRows::TimedObjects(rows(records, parse_timed_object)?),
            SectionKind::Hierarchy => IdeRows::Hierarchy(rows(records, parse_hierarchy)?),
            SectionKind::Animated => IdeRows::Animated(rows(records, parse_animated)?),
            SectionKind::Weapons => IdeRows::Weapons(rows(records, parse_weapon)?),
            SectionKind::TextureParents => {
                IdeRows::TextureParents(rows(records, parse_texture_parent)?)
            }
            SectionKind::Other => {
                IdeRows::Raw(records.iter().map(|record| record.fields.clone()).collect())
            }
        };
        sections.push(IdeSection {
            name: section.name,
            rows,
        });
    }
    debug!("parsed {} definition sections", sections.len());
    Ok(IdeFile { sections })
}

fn rows<T>(records: &[Record], parse: fn(&Record) -> Result<T>) -> Result<Vec<T>> {
    records.iter().map(parse).collect()
}

/// The leading `count` fields of `record` as an `objs` row
fn object_fields(record: &Record, count: usize) -> Result<ObjectDef> {
    let meshes = count - 5;
    let draw_distance = if meshes == 0 {
        DrawDistance::Single(record.parse(3)?)
    } else {
        let declared: usize = record.parse(3)?;
        if declared != meshes {
            return Err(FormatError::MalformedField {
                line: record.line,
                field: 4,
                value: record.text(3)?,
            });
        }
        DrawDistance::PerMesh((4..4 + meshes).map(|i| record.parse(i)).collect::<Result<_>>()?)
    };

    Ok(ObjectDef {
        id: record.parse(0)?,
        model: record.text(1)?,
        txd: record.text(2)?,
        draw_distance,
        flags: record.parse(count - 1)?,
    })
}

fn parse_object(record: &Record) -> Result<ObjectDef> {
    record.expect_arity(&OBJECT_ARITIES)?;
    object_fields(record, record.fields.len())
}

fn parse_timed_object(record: &Record) -> Result<TimedObjectDef> {
    record.expect_arity(&TIMED_OBJECT_ARITIES)?;
    let count = record.fields.len() - 2;
    Ok(TimedObjectDef {
        object: object_fields(record, count)?,
        time_on: record.parse(count)?,
        time_off: record.parse(count + 1)?,
    })
}

fn parse_hierarchy(record: &Record) -> Result<HierarchyDef> {
    record.expect_arity(&[3])?;
    Ok(HierarchyDef {
        id: record.parse(0)?,
        model: record.text(1)?,
        txd: record.text(2)?,
    })
}

fn parse_animated(record: &Record) -> Result<AnimatedDef> {
    record.expect_arity(&[6])?;
    Ok(AnimatedDef {
        id: record.parse(0)?,
        model: record.text(1)?,
        txd: record.text(2)?,
        animation: record.text(3)?,
        draw_distance: record.parse(4)?,
        flags: record.parse(5)?,
    })
}

fn parse_weapon(record: &Record) -> Result<WeaponDef> {
    record.expect_arity(&[7])?;
    Ok(WeaponDef {
        id: record.parse(0)?,
        model: record.text(1)?,
        txd: record.text(2)?,
        animation: record.text(3)?,
        mesh_count: record.parse(4)?,
        draw_distance: record.parse(5)?,
        flags: record.parse(6)?,
    })
}

fn parse_texture_parent(record: &Record) -> Result<TextureParent> {
    record.expect_arity(&[2])?;
    Ok(TextureParent {
        txd: record.text(0)?,
        parent: record.text(1)?,
    })
}
