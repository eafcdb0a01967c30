//! Text to [`IplFile`]

use glam::{Quat, Vec3};
use log::{debug, trace};
use rw_core::text::{self, Record};
use rw_core::{FormatError, Result};

use crate::types::{Instance, InstanceLayout, IplFile, IplRows, IplSection, SectionKind, Zone};

/// Magic of the binary placement streams San Andreas keeps inside IMG archives
pub const BINARY_MAGIC: &[u8; 4] = b"bnry";

/// `inst` arities: San Andreas, GTA III, Vice City
pub const INSTANCE_ARITIES: [usize; 3] = [11, 12, 13];
pub const ZONE_ARITY: usize = 9;

fn reject_binary(head: &[u8]) -> Result<()> {
    if head.starts_with(BINARY_MAGIC) {
        return Err(FormatError::UnsupportedFormatVersion(
            "binary placement file (bnry)".to_string(),
        ));
    }
    Ok(())
}

/// Parse a Latin-1 encoded IPL file
pub fn read_placements(bytes: &[u8]) -> Result<IplFile> {
    reject_binary(bytes)?;
    build(text::read_sections(bytes)?)
}

/// Parse IPL text
pub fn parse(source: &str) -> Result<IplFile> {
    reject_binary(source.as_bytes())?;
    build(text::parse_sections(source)?)
}

fn build(raw: Vec<text::RawSection>) -> Result<IplFile> {
    let mut sections = Vec::with_capacity(raw.len());
    for section in raw {
        let kind = SectionKind::from_name(&section.name);
        trace!(
            "section {} ({kind:?}) at line {}, {} rows",
            section.name,
            section.line,
            section.records.len()
        );
        let rows = match kind {
            SectionKind::Instances => IplRows::Instances(
                section
                    .records
                    .iter()
                    .map(parse_instance)
                    .collect::<Result<_>>()?,
            ),
            SectionKind::Zones => IplRows::Zones(
                section
                    .records
                    .iter()
                    .map(parse_zone)
                    .collect::<Result<_>>()?,
            ),
            SectionKind::Other => IplRows::Raw(
                section
                    .records
                    .into_iter()
                    .map(|record| record.fields)
                    .collect(),
            ),
        };
        sections.push(IplSection {
            name: section.name,
            rows,
        });
    }
    debug!("parsed {} placement sections", sections.len());
    Ok(IplFile { sections })
}

fn vec3(record: &Record, first: usize) -> Result<Vec3> {
    Ok(Vec3::new(
        record.parse(first)?,
        record.parse(first + 1)?,
        record.parse(first + 2)?,
    ))
}

fn quat(record: &Record, first: usize) -> Result<Quat> {
    Ok(Quat::from_xyzw(
        record.parse(first)?,
        record.parse(first + 1)?,
        record.parse(first + 2)?,
        record.parse(first + 3)?,
    ))
}

fn parse_instance(record: &Record) -> Result<Instance> {
    record.expect_arity(&INSTANCE_ARITIES)?;
    let id = record.parse(0)?;
    let model = record.text(1)?;

    let instance = match InstanceLayout::from_field_count(record.fields.len()) {
        Some(InstanceLayout::Gta3) => Instance {
            id,
            model,
            interior: None,
            position: vec3(record, 2)?,
            scale: Some(vec3(record, 5)?),
            rotation: quat(record, 8)?,
            lod: None,
        },
        Some(InstanceLayout::ViceCity) => Instance {
            id,
            model,
            interior: Some(record.parse(2)?),
            position: vec3(record, 3)?,
            scale: Some(vec3(record, 6)?),
            rotation: quat(record, 9)?,
            lod: None,
        },
        Some(InstanceLayout::SanAndreas) | None => Instance {
            id,
            model,
            interior: Some(record.parse(2)?),
            position: vec3(record, 3)?,
            scale: None,
            rotation: quat(record, 6)?,
            lod: Some(record.parse(10)?),
        },
    };
    Ok(instance)
}

fn parse_zone(record: &Record) -> Result<Zone> {
    record.expect_arity(&[ZONE_ARITY])?;
    Ok(Zone {
        name: record.text(0)?,
        kind: record.parse(1)?,
        min: vec3(record, 2)?,
        max: vec3(record, 5)?,
        level: record.parse(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_binary_placement_is_unsupported() {
        let mut bytes = b"bnry".to_vec();
        bytes.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert!(matches!(
            read_placements(&bytes),
            Err(FormatError::UnsupportedFormatVersion(_))
        ));
    }

    #[test]
    fn test_san_andreas_instance() {
        let file =
            parse("inst\n3465, lae2_ground04, 0, 2394.5, -1485.25, 22.75, 0, 0, 0, 1, -1\nend\n")
                .unwrap();
        let instance = file.instances().next().unwrap();
        assert_eq!(instance.layout(), Some(InstanceLayout::SanAndreas));
        assert_eq!(instance.position, Vec3::new(2394.5, -1485.25, 22.75));
        assert_eq!(instance.lod, Some(-1));
        assert_eq!(instance.scale, None);
    }
}
