//! `tree` command

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use rw_core::read_chunk_tree;
use rw_suite::{FormatKind, load_path};
use rw_suite::tree::{TreeOptions, asset_tree, chunk_tree, render_tree};

pub fn execute(path: &Path, max_depth: Option<usize>, no_color: bool) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    let detected = FormatKind::detect(&bytes);
    let kind = detected
        .or_else(|| FormatKind::from_path(path))
        .with_context(|| format!("{}: unrecognised file format", path.display()))?;
    log::debug!("{} is {kind:?} (detected: {})", path.display(), detected.is_some());

    let root = match kind {
        FormatKind::Dff | FormatKind::Txd => {
            let tree = read_chunk_tree(&bytes)
                .with_context(|| format!("{}: not a RenderWare stream", path.display()))?;
            chunk_tree(&file_name, &tree)
        }
        _ if detected.is_some() => {
            let decoded = kind
                .load(&bytes)
                .with_context(|| format!("Failed to decode {}", path.display()))?;
            asset_tree(&file_name, &decoded)
        }
        // text tables and version 1 archives go through the extension
        _ => asset_tree(&file_name, &load_path(path)?),
    };

    let options = TreeOptions { max_depth, no_color };
    print!("{}", render_tree(&root, &options));
    Ok(())
}
