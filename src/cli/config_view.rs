use anyhow::Result;
use std::fmt::Write;

use crate::config::ConfigLayers;

/// Every configuration layer that is present, followed by the merged result
pub fn render(layers: &ConfigLayers) -> Result<String> {
    let mut out = String::new();

    section(&mut out, "Default configuration", &layers.defaults().to_yaml()?);

    if let Some(global) = &layers.global {
        let title = format!("Global configuration ({})", global.path.display());
        section(&mut out, &title, &global.contents);
    }

    if let Some(project) = &layers.project {
        let title = format!("Project configuration ({})", project.path.display());
        section(&mut out, &title, &project.contents);
    }

    if !layers.environment.is_empty() {
        let yaml = serde_yaml::to_string(&layers.environment)?;
        section(&mut out, "Environment configuration", &yaml);
    }

    section(&mut out, "Running configuration", &layers.resolve().to_yaml()?);

    Ok(out)
}

pub fn execute(layers: &ConfigLayers) -> Result<()> {
    print!("{}", render(layers)?);
    Ok(())
}

fn section(out: &mut String, title: &str, body: &str) {
    let rule = "=".repeat(title.chars().count() + 4);
    let _ = writeln!(out, "{}\n  {}\n{}", rule, title, rule);
    let _ = writeln!(out, "{}", body.trim_end());
    let _ = writeln!(out);
}
