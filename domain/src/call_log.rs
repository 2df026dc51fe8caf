//! Append-only CSV log of analyzed calls.
//!
//! Each append opens the file, writes one record and closes it again. Appends from
//! this process are serialized so the "write the header if the file is new" check
//! cannot race with another request.

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use entity::call_record::COLUMNS;
use entity::CallRecord;
use log::*;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct CallLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CallLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    ///
    /// Run once at startup; `append` still writes the header itself if the file
    /// disappears later.
    pub async fn ensure_header(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        run_blocking(move || write_rows(&path, None)).await
    }

    /// Appends one record, preceded by the header row when the file is new.
    pub async fn append(&self, record: &CallRecord) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        let path = self.path.clone();
        let record = record.clone();
        run_blocking(move || write_rows(&path, Some(&record))).await
    }
}

async fn run_blocking<F>(task: F) -> Result<(), Error>
where
    F: FnOnce() -> Result<(), Error> + Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|e| {
        error!("Call log writer task failed: {e}");
        Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "Call log writer task failed".to_string(),
            )),
        }
    })?
}

fn write_rows(path: &Path, record: Option<&CallRecord>) -> Result<(), Error> {
    let file_exists = path.is_file();
    if file_exists && record.is_none() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            error!("Failed to open call log {}: {e}", path.display());
            Error::from(e)
        })?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);

    if !file_exists {
        debug!("Creating call log {}", path.display());
        writer.write_record(COLUMNS)?;
    }
    if let Some(record) = record {
        writer.write_record(record.fields())?;
    }
    writer.flush()?;

    Ok(())
}
