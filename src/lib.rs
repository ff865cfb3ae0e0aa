//! bossfight - turn-based party-versus-boss battle engine
//!
//! The engine lives in `combat`. Around it: role templates, layered
//! configuration, a headless autopilot, and SQLite storage for results.

pub mod autopilot;
pub mod combat;
pub mod config;
pub mod db;
pub mod records;
pub mod roles;

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use rand::Rng;

use combat::BattleEvent;

/// Draw a fresh seed so a run can be logged and replayed
pub fn entropy_seed() -> u64 {
    rand::rng().random()
}

/// Append events to a JSON-lines log file, creating it if needed
pub fn append_event_log(path: &Path, events: &[BattleEvent]) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);
    for event in events {
        writeln!(writer, "{}", event.to_json_line()?)?;
    }
    writer.flush()?;
    Ok(())
}
