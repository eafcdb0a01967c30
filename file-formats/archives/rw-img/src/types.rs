//! In-memory IMG archive

/// Allocation unit of an archive; offsets and sizes are counted in sectors
pub const SECTOR_SIZE: usize = 2048;

/// One stored file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImgEntry {
    pub name: String,
    /// File contents padded to a whole number of sectors
    pub data: Vec<u8>,
}

impl ImgEntry {
    /// Sectors occupied by the data, rounding a partial sector up
    pub fn sectors(&self) -> usize {
        self.data.len().div_ceil(SECTOR_SIZE)
    }
}

/// A streaming archive: named files stored in directory order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImgArchive {
    pub entries: Vec<ImgEntry>,
}

impl ImgArchive {
    /// Look an entry up by name; names compare ASCII case-insensitively
    /// and the first match wins
    pub fn get(&self, name: &str) -> Option<&ImgEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    /// Append a file, zero-padding its data to a whole number of sectors
    pub fn add(&mut self, name: impl Into<String>, mut data: Vec<u8>) {
        let padded = data.len().div_ceil(SECTOR_SIZE) * SECTOR_SIZE;
        data.resize(padded, 0);
        self.entries.push(ImgEntry {
            name: name.into(),
            data,
        });
    }

    /// Sectors used by all entries
    pub fn total_sectors(&self) -> usize {
        self.entries.iter().map(ImgEntry::sectors).sum()
    }

    /// Pairs of `(first, duplicate)` indices of entries sharing a name
    pub fn duplicate_names(&self) -> Vec<(usize, usize)> {
        let mut duplicates = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(first) = self.entries[..index]
                .iter()
                .position(|earlier| earlier.name.eq_ignore_ascii_case(&entry.name))
            {
                duplicates.push((first, index));
            }
        }
        duplicates
    }
}
