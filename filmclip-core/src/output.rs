// JSON export of a finished run

use crate::error::ScrapeError;
use crate::model::RunResult;
use chrono::{DateTime, TimeZone};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Timestamp part of the output file name.
pub const FILE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `<dir>/movies_<YYYYMMDD_HHMMSS>.json`
pub fn output_path<Tz: TimeZone>(dir: &Path, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    dir.join(format!("movies_{}.json", at.format(FILE_STAMP_FORMAT)))
}

/// Two-space indented JSON; non-ASCII text is written as-is.
pub fn render_json(result: &RunResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

pub fn save_json(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Writes the run to its timestamped file, creating `dir` if needed.
pub fn write_run_result<Tz: TimeZone>(
    dir: &Path,
    result: &RunResult,
    at: &DateTime<Tz>,
) -> Result<PathBuf, ScrapeError>
where
    Tz::Offset: std::fmt::Display,
{
    fs::create_dir_all(dir)?;
    let path = output_path(dir, at);
    let content = render_json(result)?;
    save_json(&content, &path)?;
    Ok(path)
}
