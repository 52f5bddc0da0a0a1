use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::api::{resolve_environment, CloudApi};
use crate::download::{
    backup_file_name, destination_path, download_to, resolve_backup_id, ConsoleProgress,
    ProgressReporter,
};
use crate::format::format_size;

/// Download a backup and return where it was written.
///
/// Without `backup_id` the most recently completed backup is used; without
/// `dir` the file lands in the system temp directory.
pub fn execute(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
    database: &str,
    backup_id: Option<u64>,
    dir: Option<&Path>,
    reporter: &mut dyn ProgressReporter,
) -> Result<PathBuf> {
    let environment = resolve_environment(api, application, environment)?;
    let backup_id = resolve_backup_id(api, &environment.id, database, backup_id)?;

    let file_name = backup_file_name(&environment.name, database, backup_id);
    let location = destination_path(dir, &file_name);

    tracing::info!(backup_id, database, path = %location.display(), "Downloading backup");
    println!("Downloading database backup to {}", location.display());

    let stream = api.download_backup(&environment.id, database, backup_id)?;
    let bytes = download_to(stream, &location, reporter)?;

    reporter.finish(&format!(
        "Database backup downloaded to {} ({})",
        location.display(),
        format_size(bytes)
    ));

    Ok(location)
}

/// `execute` with a progress bar on stdout
pub fn execute_with_console(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
    database: &str,
    backup_id: Option<u64>,
    dir: Option<&Path>,
) -> Result<()> {
    let mut progress = ConsoleProgress::stdout();
    execute(api, application, environment, database, backup_id, dir, &mut progress)?;
    Ok(())
}
