use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::DateTime;

use super::LogWriter;
use crate::domain::models::PersistStage;
use crate::domain::models::SessionRecord;
use crate::infrastructure::storage::parse_log;

fn record(issue_id: i64) -> Result<SessionRecord> {
    let start = DateTime::parse_from_rfc3339("2023-11-02T09:00:00+01:00")?;
    let mut record = SessionRecord::new("111", issue_id, start);
    record.finalize(Duration::from_secs(90));

    return Ok(record);
}

#[tokio::test]
async fn it_creates_the_log_on_first_use() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().join("data");
    let writer = LogWriter::new(data_dir.clone());

    let path = writer.append(&record(632)?).await?;

    assert_eq!(path.parent(), Some(data_dir.as_path()));
    let payload = fs::read_to_string(&path)?;
    assert!(payload.ends_with('\n'));
    assert_eq!(payload.lines().count(), 1);
    assert_eq!(parse_log(payload.as_bytes())?, vec![record(632)?]);

    return Ok(());
}

#[tokio::test]
async fn it_only_appends() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = LogWriter::new(dir.path().to_path_buf());
    let path = writer.path()?;
    fs::write(&path, test_utils::log_fixture())?;

    writer.append(&record(700)?).await?;
    let after_first = fs::read_to_string(&path)?;
    writer.append(&record(701)?).await?;
    let after_second = fs::read_to_string(&path)?;

    assert!(after_first.starts_with(test_utils::log_fixture()));
    assert!(after_second.starts_with(&after_first));
    assert!(after_second.len() > after_first.len());

    let records = parse_log(after_second.as_bytes())?;
    let ids = records
        .iter()
        .map(|record| return record.issue_id)
        .collect::<Vec<i64>>();
    assert_eq!(ids, vec![632, 640, 700, 701]);

    return Ok(());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn it_keeps_lines_whole_under_concurrent_appends() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = Arc::new(LogWriter::new(dir.path().join("data")));

    let mut handles = vec![];
    for issue_id in 0..32 {
        let writer = Arc::clone(&writer);
        let entry = record(issue_id)?;
        handles.push(tokio::spawn(async move {
            return writer.append(&entry).await;
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let payload = fs::read(writer.path()?)?;
    let mut ids = parse_log(&payload)?
        .iter()
        .map(|record| return record.issue_id)
        .collect::<Vec<i64>>();
    ids.sort();

    assert_eq!(ids, (0..32).collect::<Vec<i64>>());

    return Ok(());
}

#[tokio::test]
async fn it_returns_the_record_when_it_cannot_persist() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, "")?;

    let writer = LogWriter::new(blocker.join("data"));
    let err = writer.append(&record(632)?).await.unwrap_err();

    assert_eq!(err.stage, PersistStage::CreateDir);
    assert_eq!(*err.record, record(632)?);
    assert!(err.to_string().contains(r#""issue_id":632"#));

    return Ok(());
}

#[test]
fn it_names_the_log_after_the_host() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let writer = LogWriter::new(dir.path().to_path_buf());

    let hostname = nix::unistd::gethostname()?;
    let path = writer.path()?;

    assert!(!hostname.is_empty());
    assert_eq!(path, dir.path().join(&hostname));
    assert_eq!(path.file_name(), Some(hostname.as_os_str()));

    return Ok(());
}
