//! [`IplFile`] to text

use glam::{Quat, Vec3};
use rw_core::text::{TableWriter, check_field, fixed};
use rw_core::{FormatError, Result};

use crate::types::{Instance, IplFile, IplRows, Zone};

/// Coordinates are written with six decimals; anything finer would not read back
fn check_fixed(values: &[f32], what: &str, row: usize) -> Result<()> {
    match values
        .iter()
        .find(|&&value| !value.is_finite() || fixed(value).parse::<f32>() != Ok(value))
    {
        None => Ok(()),
        Some(value) => Err(FormatError::InvalidModel(format!(
            "{what} {row}: {value} does not survive six-decimal formatting"
        ))),
    }
}

/// Check that every section writes back to the same value
pub fn validate(file: &IplFile) -> Result<()> {
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
            IplRows::Instances(rows) => {
                for (i, instance) in rows.iter().enumerate() {
                    check_field(&instance.model)?;
                    if instance.layout().is_none() {
                        return Err(FormatError::InvalidModel(format!(
                            "instance {i} ({}) combines interior, scale and lod in a way no layout stores",
                            instance.model
                        )));
                    }
                    let scale = instance.scale.unwrap_or(Vec3::ONE);
                    check_fixed(&instance.position.to_array(), "instance", i)?;
                    check_fixed(&scale.to_array(), "instance", i)?;
                    check_fixed(&instance.rotation.to_array(), "instance", i)?;
                }
            }
            IplRows::Zones(rows) => {
                for (i, zone) in rows.iter().enumerate() {
                    check_field(&zone.name)?;
                    check_fixed(&zone.min.to_array(), "zone", i)?;
                    check_fixed(&zone.max.to_array(), "zone", i)?;
                }
            }
            IplRows::Raw(rows) => {
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

fn push_vec3(row: &mut Vec<String>, value: Vec3) {
    row.extend(value.to_array().map(fixed));
}

fn push_quat(row: &mut Vec<String>, value: Quat) {
    row.extend(value.to_array().map(fixed));
}

fn instance_row(instance: &Instance) -> Vec<String> {
    let mut row = vec![instance.id.to_string(), instance.model.clone()];
    if let Some(interior) = instance.interior {
        row.push(interior.to_string());
    }
    push_vec3(&mut row, instance.position);
    if let Some(scale) = instance.scale {
        push_vec3(&mut row, scale);
    }
    push_quat(&mut row, instance.rotation);
    if let Some(lod) = instance.lod {
        row.push(lod.to_string());
    }
    row
}

fn zone_row(zone: &Zone) -> Vec<String> {
    let mut row = vec![zone.name.clone(), zone.kind.to_string()];
    push_vec3(&mut row, zone.min);
    push_vec3(&mut row, zone.max);
    row.push(zone.level.to_string());
    row
}

fn render(file: &IplFile) -> TableWriter {
    let mut writer = TableWriter::new();
    for section in &file.sections {
        let rows: Vec<Vec<String>> = match &section.rows {
            IplRows::Instances(rows) => rows.iter().map(instance_row).collect(),
            IplRows::Zones(rows) => rows.iter().map(zone_row).collect(),
            IplRows::Raw(rows) => rows.clone(),
        };
        writer.section(&section.name, rows);
    }
    writer
}

/// Render IPL text
pub fn serialize(file: &IplFile) -> Result<String> {
    validate(file)?;
    Ok(render(file).into_string())
}

/// Render a Latin-1 encoded IPL file
pub fn write_placements(file: &IplFile) -> Result<Vec<u8>> {
    validate(file)?;
    Ok(render(file).into_bytes())
}
