use anyhow::Result;

use crate::api::{backup_download_link, resolve_environment, CloudApi};

pub fn execute(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
    database: &str,
    backup_id: u64,
) -> Result<()> {
    let environment = resolve_environment(api, application, environment)?;

    println!(
        "{}",
        backup_download_link(api.base_uri(), &environment.id, database, backup_id)
    );

    Ok(())
}
