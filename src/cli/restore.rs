use anyhow::Result;

use crate::api::{resolve_environment, CloudApi};
use crate::config::ExtraConfig;
use crate::notification::NotificationWaiter;
use crate::prompt::Prompt;

pub fn execute(
    api: &dyn CloudApi,
    prompt: &mut dyn Prompt,
    application: &str,
    environment: &str,
    database: &str,
    backup_id: u64,
    config: &ExtraConfig,
) -> Result<()> {
    let environment = resolve_environment(api, application, environment)?;

    let question = format!(
        "Are you sure you want to restore backup id {} to {}?",
        backup_id, environment.label
    );
    if !prompt.confirm(&question)? {
        tracing::info!(backup_id, "Restore cancelled");
        return Ok(());
    }

    tracing::info!(backup_id, database, environment = %environment.name, "Restoring backup");

    let response = api.restore_backup(&environment.id, database, backup_id)?;
    NotificationWaiter::from_config(api, config).wait(&response)?;

    println!(
        "\n✓ Backup {} restored to {} on {}",
        backup_id, database, environment.label
    );

    Ok(())
}
