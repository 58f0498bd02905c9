#[cfg(test)]
#[path = "log_reader_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use tokio::fs;

use super::host_log_path;
use super::LINE_SEPARATOR;
use crate::domain::models::SessionRecord;

/// Parses a session log. Every newline terminated line is one record. A final
/// line without its newline is a record that was still being written and is
/// skipped.
pub fn parse_log(payload: &[u8]) -> Result<Vec<SessionRecord>> {
    let mut records = vec![];
    let mut lines = payload.split(|byte| return *byte == LINE_SEPARATOR).peekable();
    let mut line_number = 0;

    while let Some(line) = lines.next() {
        line_number += 1;

        // The last split piece is whatever follows the final separator.
        if lines.peek().is_none() {
            if !line.is_empty() {
                tracing::warn!(
                    line_number,
                    bytes = line.len(),
                    "Skipping partially written record at end of log"
                );
            }
            break;
        }

        if line.iter().all(|byte| return byte.is_ascii_whitespace()) {
            continue;
        }

        let record = serde_json::from_slice::<SessionRecord>(line)
            .with_context(|| return format!("line {line_number} is not a valid session record"))?;
        records.push(record);
    }

    return Ok(records);
}

pub struct LogReader {
    path: path::PathBuf,
}

impl LogReader {
    pub fn new(path: path::PathBuf) -> LogReader {
        return LogReader { path };
    }

    pub fn for_host(data_dir: &path::Path) -> Result<LogReader> {
        return Ok(LogReader::new(host_log_path(data_dir)?));
    }

    pub async fn read(&self) -> Result<Vec<SessionRecord>> {
        if !self.path.exists() {
            bail!(format!(
                "No session log found at {}",
                self.path.to_string_lossy()
            ));
        }

        let payload = fs::read(&self.path).await?;
        let records = parse_log(&payload)
            .with_context(|| return format!("failed to read {}", self.path.to_string_lossy()))?;

        tracing::debug!(path = ?self.path, records = records.len(), "Read session log");
        return Ok(records);
    }
}
