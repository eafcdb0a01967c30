//! IMG archive validation and encoding

use log::debug;
use rw_core::{ChunkWriter, FormatError, Result};

use crate::reader::{DIRECTORY_ENTRY_SIZE, NAME_LEN, VER2};
use crate::types::{ImgArchive, ImgEntry, SECTOR_SIZE};

/// Check that an archive can be written and read back unchanged
pub fn validate(archive: &ImgArchive) -> Result<()> {
    if let Some(&(_, duplicate)) = archive.duplicate_names().first() {
        return Err(FormatError::DuplicateName(
            archive.entries[duplicate].name.clone(),
        ));
    }
    for (index, entry) in archive.entries.iter().enumerate() {
        validate_entry(index, entry)?;
    }

    let end = first_data_sector(archive.entries.len()) + archive.total_sectors();
    if u32::try_from(end).is_err() {
        return Err(FormatError::InvalidModel(format!(
            "{end} sectors do not fit an archive"
        )));
    }
    Ok(())
}

fn validate_entry(index: usize, entry: &ImgEntry) -> Result<()> {
    let invalid = |message: String| -> Result<()> {
        Err(FormatError::InvalidModel(format!(
            "entry {index} ({:?}): {message}",
            entry.name
        )))
    };

    let name = &entry.name;
    if name.is_empty()
        || name.chars().count() >= NAME_LEN
        || name.chars().any(|c| c == '\0' || u32::from(c) > 0xFF)
    {
        return invalid(format!(
            "name must be 1 to {} Latin-1 characters",
            NAME_LEN - 1
        ));
    }
    if entry.data.len() % SECTOR_SIZE != 0 {
        return invalid(format!(
            "{} bytes is not a whole number of {SECTOR_SIZE}-byte sectors",
            entry.data.len()
        ));
    }
    if u16::try_from(entry.sectors()).is_err() {
        return invalid(format!("{} sectors exceed the directory field", entry.sectors()));
    }
    Ok(())
}

/// Sector where the data of a version 2 archive with `count` entries starts
fn first_data_sector(count: usize) -> usize {
    (8 + count * DIRECTORY_ENTRY_SIZE).div_ceil(SECTOR_SIZE)
}

fn pad_to_sector(writer: &mut ChunkWriter) {
    let padding = writer.len().next_multiple_of(SECTOR_SIZE) - writer.len();
    writer.write_bytes(&vec![0; padding]);
}

/// Encode a version 2 archive; entries are stored back to back in
/// directory order
pub fn write_archive(archive: &ImgArchive) -> Result<Vec<u8>> {
    validate(archive)?;

    let mut writer = ChunkWriter::default();
    writer.write_bytes(&VER2);
    writer.write_u32(archive.entries.len() as u32);

    let mut sector = first_data_sector(archive.entries.len());
    for entry in &archive.entries {
        writer.write_u32(sector as u32);
        writer.write_u16(entry.sectors() as u16);
        // the archive size field is left zero; readers fall back to the
        // streaming size
        writer.write_u16(0);
        writer.write_fixed_string(&entry.name, NAME_LEN);
        sector += entry.sectors();
    }
    pad_to_sector(&mut writer);

    for entry in &archive.entries {
        writer.write_bytes(&entry.data);
    }

    debug!(
        "wrote IMG version 2 with {} entries, {} sectors",
        archive.entries.len(),
        sector
    );
    Ok(writer.into_bytes())
}

/// Encode a version 1 archive as its `(.dir, .img)` pair
pub fn write_archive_v1(archive: &ImgArchive) -> Result<(Vec<u8>, Vec<u8>)> {
    validate(archive)?;

    let mut dir = ChunkWriter::default();
    let mut img = ChunkWriter::default();
    let mut sector = 0;
    for entry in &archive.entries {
        dir.write_u32(sector as u32);
        dir.write_u32(entry.sectors() as u32);
        dir.write_fixed_string(&entry.name, NAME_LEN);
        img.write_bytes(&entry.data);
        sector += entry.sectors();
    }

    debug!(
        "wrote IMG version 1 with {} entries, {} sectors",
        archive.entries.len(),
        sector
    );
    Ok((dir.into_bytes(), img.into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_data_sector() {
        assert_eq!(first_data_sector(0), 1);
        // 8 + 63 * 32 = 2024 still fits the first sector
        assert_eq!(first_data_sector(63), 1);
        assert_eq!(first_data_sector(64), 2);
    }
}
