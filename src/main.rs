use acquia_cli::{
    api::AcquiaClient,
    cli as commands,
    config::{ConfigLayers, ConfigPaths},
    format::TimeFormatter,
    prompt::TerminalPrompt,
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "acquiacli")]
#[command(about = "Acquia Cloud API client: account details and database backups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about your account
    #[command(name = "account")]
    Account,

    /// Back up all databases in an environment
    #[command(name = "database:backup", alias = "db:backup")]
    DatabaseBackup {
        /// Application UUID
        uuid: String,
        /// Environment name (e.g. dev, test, prod)
        environment: String,
    },

    /// List database backups for every database in an environment
    #[command(name = "database:backup:list", alias = "db:backup:list")]
    DatabaseBackupList {
        /// Application UUID
        uuid: String,
        /// Environment name
        environment: String,
        /// Only show backups of this database
        db_name: Option<String>,
    },

    /// Restore a database from a backup
    #[command(name = "database:backup:restore", alias = "db:backup:restore")]
    DatabaseBackupRestore {
        /// Application UUID
        uuid: String,
        /// Environment name
        environment: String,
        /// Database name
        db_name: String,
        /// Backup ID
        backup_id: u64,
    },

    /// Print the download link of a backup
    #[command(name = "database:backup:link", alias = "db:backup:link")]
    DatabaseBackupLink {
        /// Application UUID
        uuid: String,
        /// Environment name
        environment: String,
        /// Database name
        db_name: String,
        /// Backup ID
        backup_id: u64,
    },

    /// Download a database backup
    #[command(name = "database:backup:download", alias = "db:backup:download")]
    DatabaseBackupDownload {
        /// Application UUID
        uuid: String,
        /// Environment name
        environment: String,
        /// Database name
        db_name: String,
        /// Backup ID to download (latest if omitted)
        #[arg(long)]
        backup: Option<u64>,
        /// Directory to download into (system temp directory if omitted)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Create or regenerate configuration files
    #[command(name = "setup:config", alias = "setup")]
    SetupConfig,

    /// Show each configuration layer and the running configuration
    #[command(name = "setup:config:view")]
    SetupConfigView,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let paths = ConfigPaths::discover()?;

    // Setup only needs the file locations, so a broken file can still be regenerated
    if let Commands::SetupConfig = cli.command {
        let mut prompt = TerminalPrompt::stdio(cli.yes);
        return commands::setup::execute(&paths, &mut prompt);
    }

    let layers = ConfigLayers::load(&paths, |name| std::env::var(name).ok())?;
    if let Commands::SetupConfigView = cli.command {
        return commands::config_view::execute(&layers);
    }

    let settings = layers.resolve();
    let client = AcquiaClient::connect(&settings.acquia)?;

    // Execute command
    match cli.command {
        Commands::Account => {
            let times = TimeFormatter::from_config(&settings.extraconfig)?;
            commands::account::execute(&client, &times)?
        }
        Commands::DatabaseBackup { uuid, environment } => {
            commands::backup::execute(&client, &uuid, &environment, &settings.extraconfig)?
        }
        Commands::DatabaseBackupList {
            uuid,
            environment,
            db_name,
        } => {
            let times = TimeFormatter::from_config(&settings.extraconfig)?;
            commands::list::execute(&client, &uuid, &environment, db_name.as_deref(), &times)?
        }
        Commands::DatabaseBackupRestore {
            uuid,
            environment,
            db_name,
            backup_id,
        } => {
            let mut prompt = TerminalPrompt::stdio(cli.yes);
            commands::restore::execute(
                &client,
                &mut prompt,
                &uuid,
                &environment,
                &db_name,
                backup_id,
                &settings.extraconfig,
            )?
        }
        Commands::DatabaseBackupLink {
            uuid,
            environment,
            db_name,
            backup_id,
        } => commands::link::execute(&client, &uuid, &environment, &db_name, backup_id)?,
        Commands::DatabaseBackupDownload {
            uuid,
            environment,
            db_name,
            backup,
            path,
        } => commands::download::execute_with_console(
            &client,
            &uuid,
            &environment,
            &db_name,
            backup,
            path.as_deref(),
        )?,
        Commands::SetupConfig | Commands::SetupConfigView => {}
    }

    Ok(())
}
