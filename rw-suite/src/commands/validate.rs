//! `validate` command

use anyhow::{Result, bail};
use console::style;
use log::warn;
use std::path::{Path, PathBuf};

use rw_suite::load_path;

/// Load, re-encode and reload a file; the reloaded value must be unchanged
fn check(path: &Path, strict: bool) -> Result<usize> {
    let decoded = load_path(path)?;
    for warning in &decoded.warnings {
        warn!("{}: {warning}", path.display());
    }
    if strict && !decoded.warnings.is_empty() {
        bail!("{}: {} warnings", path.display(), decoded.warnings.len());
    }

    let kind = decoded.value.kind();
    let bytes = decoded.value.save()?;
    let reloaded = kind.load(&bytes)?;
    if reloaded.value != decoded.value {
        bail!("{}: re-encoded data does not decode to the same value", path.display());
    }
    Ok(decoded.warnings.len())
}

pub fn execute(files: &[PathBuf], strict: bool) -> Result<()> {
    let mut failed = 0;
    for path in files {
        match check(path, strict) {
            Ok(0) => println!("{} {}", style("✓").green(), path.display()),
            Ok(warnings) => println!(
                "{} {} ({warnings} warnings)",
                style("✓").yellow(),
                path.display()
            ),
            Err(error) => {
                failed += 1;
                println!("{} {error:#}", style("✗").red());
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed validation", files.len());
    }
    Ok(())
}
