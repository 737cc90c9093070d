//! Shared helpers for loading snapshot files and parsing arguments.

use std::path::Path;

use chrono::NaiveDate;
use playout_core::schedule::parse_date;
use playout_core::timeline::parse_clock;
use playout_core::{CoreError, LibrarySnapshot, Program, ProgramContent, StoredProgram};
use serde_json::Value;

/// Load a program from a JSON file.
///
/// A document with a `content` key is a stored program and must carry its
/// `id` and `name`. A document with a `program` key, or a bare clip array,
/// is content and is named after the file stem. Anything else is an error.
pub fn load_program(path: &Path) -> Result<Program, CoreError> {
    let json = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&json)?;

    let program = if value.get("content").is_some() {
        serde_json::from_value::<StoredProgram>(value)?.to_program()
    } else if value.is_array() || value.get("program").is_some() {
        let content: ProgramContent = serde_json::from_value(value)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Program::from_content(name, &content)
    } else {
        return Err(CoreError::Custom(format!(
            "{}: expected a stored program with \"content\" or program content with \"program\"",
            path.display()
        )));
    };
    Ok(program)
}

pub fn load_library(path: &Path) -> Result<LibrarySnapshot, CoreError> {
    LibrarySnapshot::load(path)
}

pub fn date_arg(input: &str) -> Result<NaiveDate, CoreError> {
    Ok(parse_date(input)?)
}

/// Parse `HH:MM[:SS]` into seconds after midnight.
pub fn clock_arg(input: &str) -> Result<f64, CoreError> {
    Ok(parse_clock(input)?)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
