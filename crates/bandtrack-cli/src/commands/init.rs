//! The `bandtrack init` command.

use std::path::Path;

use anyhow::Result;

use bandtrack_core::config::{CONFIG_FILE, SAMPLE_CONFIG};

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE).exists() {
        println!("{CONFIG_FILE} already exists, skipping.");
        return Ok(());
    }
    std::fs::write(CONFIG_FILE, SAMPLE_CONFIG)?;
    println!("Created {CONFIG_FILE}");

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to set your data directory and targets");
    println!("  2. Run: bandtrack status");
    println!("  3. After a test: bandtrack score b5-t1 --listening 31 --reading 35 --task1 6 --task2 7");

    Ok(())
}
