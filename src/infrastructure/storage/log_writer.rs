#[cfg(test)]
#[path = "log_writer_test.rs"]
mod tests;

use std::io;
use std::path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::host_log_path;
use super::LINE_SEPARATOR;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PersistStage;
use crate::domain::models::PersistenceError;
use crate::domain::models::SessionRecord;

fn fail(
    stage: PersistStage,
    record: &SessionRecord,
) -> impl FnOnce(io::Error) -> PersistenceError + '_ {
    return move |err| {
        tracing::error!(stage = %stage, error = ?err, "Failed to persist session record");
        return PersistenceError::new(stage, record, err);
    };
}

/// Appends session records, one JSON line each, to the host log inside
/// `data_dir`. There is no locking between processes. Each record is handed
/// to the OS in a single append, so lines stay whole even when two sessions
/// finish at the same time.
pub struct LogWriter {
    data_dir: path::PathBuf,
}

impl Default for LogWriter {
    fn default() -> LogWriter {
        return LogWriter::new(path::PathBuf::from(Config::get(ConfigKey::DataDir)));
    }
}

impl LogWriter {
    pub fn new(data_dir: path::PathBuf) -> LogWriter {
        return LogWriter { data_dir };
    }

    pub fn path(&self) -> io::Result<path::PathBuf> {
        return host_log_path(&self.data_dir);
    }

    pub async fn append(&self, record: &SessionRecord) -> Result<path::PathBuf, PersistenceError> {
        let path = self.path().map_err(fail(PersistStage::Hostname, record))?;

        fs::create_dir_all(&self.data_dir)
            .await
            .map_err(fail(PersistStage::CreateDir, record))?;

        // create_new so an existing log is never truncated.
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => {
                tracing::debug!(path = ?path, "Created session log");
                drop(file);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
            Err(err) => return Err(fail(PersistStage::CreateFile, record)(err)),
        }

        let mut line = serde_json::to_vec(record)
            .map_err(|err| return fail(PersistStage::Serialize, record)(io::Error::from(err)))?;
        line.push(LINE_SEPARATOR);

        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .await
            .map_err(fail(PersistStage::Open, record))?;

        file.write_all(&line)
            .await
            .map_err(fail(PersistStage::Write, record))?;
        file.sync_all()
            .await
            .map_err(fail(PersistStage::Sync, record))?;
        file.shutdown()
            .await
            .map_err(fail(PersistStage::Close, record))?;

        tracing::info!(path = ?path, issue_id = record.issue_id, "Session record appended");
        return Ok(path);
    }
}
