use anyhow::Result;
use std::path::Path;

use crate::config::{write_config_file, ConfigPaths, Settings};
use crate::prompt::Prompt;

/// Walk the global and project configuration files, offering to create or
/// regenerate each one.
pub fn execute(paths: &ConfigPaths, prompt: &mut dyn Prompt) -> Result<()> {
    let files = [
        ("Global", "global", paths.global.as_path()),
        ("Project", "project", paths.project.as_path()),
    ];

    for (title, kind, location) in files {
        println!("{} configuration ({})", title, location.display());

        let question = if location.exists() {
            format!("Would you like to regenerate the {} configuration file", kind)
        } else {
            format!("{} configuration file not found. Would you like to add one?", title)
        };

        if prompt.confirm(&question)? {
            create_config(location, prompt)?;
        }
    }

    Ok(())
}

fn create_config(location: &Path, prompt: &mut dyn Prompt) -> Result<()> {
    let key = prompt.ask("What is your Acquia key?")?;
    let secret = prompt.ask_secret("What is your Acquia secret?")?;

    write_config_file(location, &Settings::with_credentials(key, secret))?;
    println!("✓ Configuration file written to {}", location.display());

    Ok(())
}
