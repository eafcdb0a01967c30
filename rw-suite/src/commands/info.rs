//! `info` command

use anyhow::{Context, Result};
use console::style;
use std::path::Path;

use rw_suite::{Summary, load_path};

pub fn execute(path: &Path, json: bool, full: bool) -> Result<()> {
    let decoded = load_path(path)?;

    if json {
        let text = if full {
            serde_json::to_string_pretty(&decoded.value)
        } else {
            serde_json::to_string_pretty(&Summary::new(&decoded))
        }
        .context("Failed to serialize to JSON")?;
        println!("{text}");
        return Ok(());
    }

    let summary = Summary::new(&decoded);
    println!("{}", style(path.display()).bold());
    println!("  {:<20} {}", "Format:", summary.description);
    for stat in &summary.stats {
        println!("  {:<20} {}", format!("{}:", stat.label), stat.value);
    }
    for warning in &summary.warnings {
        println!("  {} {warning}", style("warning:").yellow());
    }
    Ok(())
}
