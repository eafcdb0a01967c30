//! [`IdeFile`] to text

use rw_core::text::{TableWriter, check_field, shortest};
use rw_core::{FormatError, Result};

use crate::types::{DrawDistance, IdeFile, IdeRows, ObjectDef};

fn check_float(value: f32, row: usize) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FormatError::InvalidModel(format!(
            "row {row}: {value} can not be stored"
        )))
    }
}

fn check_object(object: &ObjectDef, row: usize) -> Result<()> {
    check_field(&object.model)?;
    check_field(&object.txd)?;
    match &object.draw_distance {
        DrawDistance::Single(distance) => check_float(*distance, row),
        DrawDistance::PerMesh(distances) => {
            if !(1..=3).contains(&distances.len()) {
                return Err(FormatError::InvalidModel(format!(
                    "object {}: {} mesh distances, expected 1 to 3",
                    object.id,
                    distances.len()
                )));
            }
            distances.iter().try_for_each(|&d| check_float(d, row))
        }
    }
}

/// Check that every section writes back to the same value
pub fn validate(file: &IdeFile) -> Result<()> {
    for section in &file.sections {
        check_field(&section.name)?;
        if section.name.eq_ignore_ascii_case("end") {
            return Err(FormatError::InvalidModel(
                "a section can not be named \"end\"".to_string(),
            ));
        }
        if section.kind() != section.rows.kind() {
            return Err(FormatError::InvalidModel(format!(
                "section {:?} holds {:?} rows",
                section.name,
                section.rows.kind()
            )));
        }

        match &section.rows {
            IdeRows::Objects(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    check_object(row, i)?;
                }
            }
            IdeRows::TimedObjects(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    check_object(&row.object, i)?;
                }
            }
            IdeRows::Hierarchy(rows) => {
                for row in rows {
                    check_field(&row.model)?;
                    check_field(&row.txd)?;
                }
            }
            IdeRows::Animated(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    check_field(&row.model)?;
                    check_field(&row.txd)?;
                    check_field(&row.animation)?;
                    check_float(row.draw_distance, i)?;
                }
            }
            IdeRows::Weapons(rows) => {
                for (i, row) in rows.iter().enumerate() {
                    check_field(&row.model)?;
                    check_field(&row.txd)?;
                    check_field(&row.animation)?;
                    check_float(row.draw_distance, i)?;
                }
            }
            IdeRows::TextureParents(rows) => {
                for row in rows {
                    check_field(&row.txd)?;
                    check_field(&row.parent)?;
                }
            }
            IdeRows::Raw(rows) => {
                for row in rows {
                    if row.is_empty() || (row.len() == 1 && row[0].eq_ignore_ascii_case("end")) {
                        return Err(FormatError::InvalidModel(format!(
                            "section {:?} has a row that would not read back",
                            section.name
                        )));
                    }
                    row.iter().try_for_each(|field| check_field(field))?;
                }
            }
        }
    }
    Ok(())
}

fn object_row(object: &ObjectDef) -> Vec<String> {
    let mut row = vec![object.id.to_string(), object.model.clone(), object.txd.clone()];
    match &object.draw_distance {
        DrawDistance::Single(distance) => row.push(shortest(*distance)),
        DrawDistance::PerMesh(distances) => {
            row.push(distances.len().to_string());
            row.extend(distances.iter().map(|&d| shortest(d)));
        }
    }
    row.push(object.flags.to_string());
    row
}

fn render(file: &IdeFile) -> TableWriter {
    let mut writer = TableWriter::new();
    for section in &file.sections {
        let rows: Vec<Vec<String>> = match &section.rows {
            IdeRows::Objects(rows) => rows.iter().map(object_row).collect(),
            IdeRows::TimedObjects(rows) => rows
                .iter()
                .map(|row| {
                    let mut fields = object_row(&row.object);
                    fields.push(row.time_on.to_string());
                    fields.push(row.time_off.to_string());
                    fields
                })
                .collect(),
            IdeRows::Hierarchy(rows) => rows
                .iter()
                .map(|row| vec![row.id.to_string(), row.model.clone(), row.txd.clone()])
                .collect(),
            IdeRows::Animated(rows) => rows
                .iter()
                .map(|row| {
                    vec![
                        row.id.to_string(),
                        row.model.clone(),
                        row.txd.clone(),
                        row.animation.clone(),
                        shortest(row.draw_distance),
                        row.flags.to_string(),
                    ]
                })
                .collect(),
            IdeRows::Weapons(rows) => rows
                .iter()
                .map(|row| {
                    vec![
                        row.id.to_string(),
                        row.model.clone(),
                        row.txd.clone(),
                        row.animation.clone(),
                        row.mesh_count.to_string(),
                        shortest(row.draw_distance),
                        row.flags.to_string(),
                    ]
                })
                .collect(),
            IdeRows::TextureParents(rows) => rows
                .iter()
                .map(|row| vec![row.txd.clone(), row.parent.clone()])
                .collect(),
            IdeRows::Raw(rows) => rows.clone(),
        };
        writer.section(&section.name, rows);
    }
    writer
}

/// Render IDE text
pub fn serialize(file: &IdeFile) -> Result<String> {
    validate(file)?;
    Ok(render(file).into_string())
}

/// Render a Latin-1 encoded IDE file
pub fn write_definitions(file: &IdeFile) -> Result<Vec<u8>> {
    validate(file)?;
    Ok(render(file).into_bytes())
}
