//! `formats` command

use anyhow::Result;
use console::style;

use rw_suite::list_supported_formats;

pub fn execute() -> Result<()> {
    println!("{}", style("Supported formats").bold());
    for (extension, description) in list_supported_formats() {
        println!("  .{:<5} {description}", style(extension).cyan());
    }
    Ok(())
}
