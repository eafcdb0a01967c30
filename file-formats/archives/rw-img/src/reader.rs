//! IMG archive decoding

use log::{debug, trace, warn};
use rw_core::{ChunkReader, Decoded, FormatError, Result, Warning};

use crate::types::{ImgArchive, ImgEntry, SECTOR_SIZE};

/// Version 2 signature
pub const VER2: [u8; 4] = *b"VER2";
/// Size of one directory entry in either version
pub const DIRECTORY_ENTRY_SIZE: usize = 32;
/// Width of the name field, including the terminator
pub const NAME_LEN: usize = 24;

/// Directory record before its data is resolved
struct Slot {
    at: usize,
    offset: u32,
    sectors: u32,
    name: String,
}

/// Decode a version 2 archive (directory and data in one file)
pub fn read_archive(bytes: &[u8]) -> Result<Decoded<ImgArchive>> {
    let mut reader = ChunkReader::new(bytes);
    let magic = reader.read_array::<4>()?;
    if magic != VER2 {
        return Err(FormatError::InvalidMagic {
            offset: 0,
            expected: "VER2".to_string(),
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }
    let count = reader.read_u32()? as usize;
    reader.ensure_available(count, DIRECTORY_ENTRY_SIZE)?;
    debug!("IMG version 2 with {count} entries");

    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        let at = reader.position();
        let offset = reader.read_u32()?;
        let streaming = reader.read_u16()?;
        let stored = reader.read_u16()?;
        let name = reader.read_fixed_string(NAME_LEN)?;
        slots.push(Slot {
            at,
            offset,
            sectors: u32::from(if stored != 0 { stored } else { streaming }),
            name,
        });
    }
    resolve(slots, bytes)
}

/// Decode a version 1 archive from its `.dir` directory and `.img` data
pub fn read_archive_v1(dir: &[u8], img: &[u8]) -> Result<Decoded<ImgArchive>> {
    if dir.len() % DIRECTORY_ENTRY_SIZE != 0 {
        return Err(FormatError::InvalidLength {
            offset: dir.len() - dir.len() % DIRECTORY_ENTRY_SIZE,
            declared: DIRECTORY_ENTRY_SIZE as u64,
            available: dir.len() % DIRECTORY_ENTRY_SIZE,
        });
    }
    let count = dir.len() / DIRECTORY_ENTRY_SIZE;
    debug!("IMG version 1 with {count} entries");

    let mut reader = ChunkReader::new(dir);
    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        let at = reader.position();
        let offset = reader.read_u32()?;
        let sectors = reader.read_u32()?;
        let name = reader.read_fixed_string(NAME_LEN)?;
        slots.push(Slot {
            at,
            offset,
            sectors,
            name,
        });
    }
    resolve(slots, img)
}

fn resolve(slots: Vec<Slot>, data: &[u8]) -> Result<Decoded<ImgArchive>> {
    let mut entries = Vec::with_capacity(slots.len());
    for slot in slots {
        let start = slot.offset as usize * SECTOR_SIZE;
        let length = slot.sectors as usize * SECTOR_SIZE;
        let available = data.len().saturating_sub(start);
        if length > available || start > data.len() {
            return Err(FormatError::InvalidLength {
                offset: slot.at,
                declared: length as u64,
                available,
            });
        }
        trace!(
            "entry {:?} at sector {}, {} sectors",
            slot.name, slot.offset, slot.sectors
        );
        entries.push(ImgEntry {
            name: slot.name,
            data: data[start..start + length].to_vec(),
        });
    }

    let archive = ImgArchive { entries };
    let warnings = archive
        .duplicate_names()
        .into_iter()
        .map(|(first, duplicate)| {
            let name = archive.entries[duplicate].name.clone();
            warn!("entry {duplicate} reuses the name {name:?} of entry {first}");
            Warning::DuplicateName {
                name,
                first,
                duplicate,
            }
        })
        .collect();

    Ok(Decoded::with_warnings(archive, warnings))
}
