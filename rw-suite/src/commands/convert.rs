//! `convert` command

use anyhow::Result;
use console::style;
use log::info;
use std::path::Path;

use rw_suite::{load_path, save_path};

pub fn execute(input: &Path, output: &Path) -> Result<()> {
    let decoded = load_path(input)?;
    if !decoded.warnings.is_empty() {
        info!(
            "{}: {} warnings while decoding",
            input.display(),
            decoded.warnings.len()
        );
    }
    save_path(output, &decoded.value)?;
    println!(
        "{} {} -> {}",
        style("Converted").green(),
        input.display(),
        output.display()
    );
    Ok(())
}
