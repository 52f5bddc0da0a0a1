use anyhow::Result;

use crate::api::{resolve_environment, CloudApi, RequestOptions};
use crate::config::ExtraConfig;
use crate::notification::NotificationWaiter;

/// Back up every database of the application in one environment.
///
/// Databases are handled one at a time; the first failure stops the run.
pub fn execute(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
    config: &ExtraConfig,
) -> Result<()> {
    tracing::info!(application, environment, "Backing up all databases");

    let environment = resolve_environment(api, application, environment)?;
    let databases = api.databases(application, &RequestOptions::default())?;

    if databases.is_empty() {
        println!("No databases found.");
        return Ok(());
    }

    let waiter = NotificationWaiter::from_config(api, config);

    for database in &databases {
        println!(
            "Backing up {} database on {}...",
            database.name, environment.label
        );
        let response = api.create_backup(&environment.id, &database.name)?;
        waiter.wait(&response)?;
    }

    println!(
        "\n✓ Backed up {} database(s) on {}",
        databases.len(),
        environment.label
    );

    Ok(())
}
