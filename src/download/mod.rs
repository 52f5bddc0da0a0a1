// Backup download: latest-backup resolution, destination naming and streaming
pub mod progress;


use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::api::{Backup, CloudApi, DownloadStream, RequestOptions};
use crate::error::{AcquiaError, Result};

pub use progress::{ConsoleProgress, ProgressReporter, ProgressTracker};

const CHUNK_SIZE: usize = 64 * 1024;

/// Backup with the latest completion time
pub fn latest_backup(backups: &[Backup]) -> Option<&Backup> {
    backups.iter().max_by_key(|backup| backup.completed_at)
}

/// Use `explicit` when given, otherwise ask the API for the newest backup
pub fn resolve_backup_id(
    api: &dyn CloudApi,
    environment_id: &str,
    database: &str,
    explicit: Option<u64>,
) -> Result<u64> {
    if let Some(id) = explicit {
        return Ok(id);
    }

    let options = RequestOptions::new().sort("-created").limit(1);
    let backups = api.backups(environment_id, database, &options)?;

    let latest = latest_backup(&backups).ok_or(AcquiaError::NoBackupFound)?;
    tracing::debug!(backup_id = latest.id, database, "Resolved latest backup");

    Ok(latest.id)
}

/// `{environment}-{database}-{backup}.sql.gz`
pub fn backup_file_name(environment: &str, database: &str, backup_id: u64) -> String {
    format!("{}-{}-{}.sql.gz", environment, database, backup_id)
}

/// Destination inside `dir`, or the system temp directory when none is given
pub fn destination_path(dir: Option<&Path>, file_name: &str) -> PathBuf {
    match dir {
        Some(dir) => dir.join(file_name),
        None => std::env::temp_dir().join(file_name),
    }
}

/// Stream `stream` into `destination`, reporting progress as chunks arrive.
///
/// Returns the number of bytes written. On error the partial file is left
/// where it is.
pub fn download_to(
    mut stream: DownloadStream,
    destination: &Path,
    reporter: &mut dyn ProgressReporter,
) -> Result<u64> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(destination)?);
    let mut tracker = ProgressTracker::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut received = 0u64;

    loop {
        let read = match stream.reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };

        writer.write_all(&buffer[..read])?;
        received += read as u64;
        tracker.update(received, stream.total, reporter);
    }

    writer.flush()?;

    tracing::info!(
        path = %destination.display(),
        bytes = received,
        "Backup downloaded"
    );

    Ok(received)
}
