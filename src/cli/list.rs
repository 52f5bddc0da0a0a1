use anyhow::Result;

use crate::api::{resolve_environment, CloudApi, RequestOptions};
use crate::format::{backup_table, TimeFormatter};

pub fn execute(
    api: &dyn CloudApi,
    application: &str,
    environment: &str,
    database: Option<&str>,
    times: &TimeFormatter,
) -> Result<()> {
    tracing::info!(application, environment, ?database, "Listing backups");

    let environment = resolve_environment(api, application, environment)?;

    let options = match database {
        Some(name) => RequestOptions::new().filter("name", name),
        None => RequestOptions::new(),
    };
    let databases = api.databases(application, &options)?;

    if databases.is_empty() {
        println!("No databases found.");
        return Ok(());
    }

    let mut sections = Vec::with_capacity(databases.len());
    for database in databases {
        let backups = api.backups(&environment.id, &database.name, &RequestOptions::default())?;
        sections.push((database, backups));
    }

    println!("{}", backup_table(&sections, times));

    Ok(())
}
