use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, Table};
use std::fmt::Write;

use crate::api::{Backup, Database};
use crate::config::ExtraConfig;
use crate::error::{AcquiaError, Result};

/// Renders API timestamps in the configured timezone and format
#[derive(Debug, Clone)]
pub struct TimeFormatter {
    timezone: Tz,
    format: String,
}

impl TimeFormatter {
    pub fn new(timezone: &str, format: &str) -> Result<Self> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| AcquiaError::InvalidTimezone(timezone.to_string()))?;

        // Configs written by older releases use PHP date() letters
        let format = if format.contains('%') {
            format.to_string()
        } else {
            php_to_strftime(format)
        };

        Ok(Self { timezone, format })
    }

    pub fn from_config(config: &ExtraConfig) -> Result<Self> {
        Self::new(&config.timezone, &config.format)
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> String {
        let local = timestamp.with_timezone(&self.timezone);
        let mut out = String::new();

        // chrono reports a bad format string as fmt::Error on display
        if write!(out, "{}", local.format(&self.format)).is_err() {
            return local.to_rfc3339();
        }
        out
    }

    pub fn format_opt(&self, timestamp: Option<&DateTime<Utc>>) -> String {
        timestamp.map(|ts| self.format(ts)).unwrap_or_default()
    }
}

/// Translate a PHP `date()` format into strftime.
///
/// Unmapped letters are kept literally, as PHP does for non-format characters.
pub fn php_to_strftime(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    let mut chars = format.chars();

    while let Some(c) = chars.next() {
        let mapped = match c {
            'd' => "%d",
            'D' => "%a",
            'j' => "%-d",
            'l' => "%A",
            'N' => "%u",
            'w' => "%w",
            'F' => "%B",
            'm' => "%m",
            'M' => "%b",
            'n' => "%-m",
            'Y' => "%Y",
            'y' => "%y",
            'a' => "%P",
            'A' => "%p",
            'g' => "%-I",
            'G' => "%-H",
            'h' => "%I",
            'H' => "%H",
            'i' => "%M",
            's' => "%S",
            'e' | 'T' => "%Z",
            'O' => "%z",
            'P' => "%:z",
            'U' => "%s",
            'c' => "%Y-%m-%dT%H:%M:%S%:z",
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
                continue;
            }
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(mapped);
    }

    out
}

pub fn glyph(flag: bool) -> &'static str {
    if flag {
        "✓"
    } else {
        " "
    }
}

/// Format a byte count into a human-readable string
pub fn format_size(bytes: u64) -> String {
    let byte = Byte::from_u64(bytes);
    let adjusted = byte.get_appropriate_unit(UnitType::Binary);
    format!("{:.2}", adjusted)
}

/// One table for all databases: a bold row per database followed by its backups
pub fn backup_table(sections: &[(Database, Vec<Backup>)], times: &TimeFormatter) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "Type", "Timestamp"]);

    for (database, backups) in sections {
        table.add_row(vec![
            Cell::new(&database.name).add_attribute(Attribute::Bold),
            Cell::new(""),
            Cell::new(""),
        ]);

        for backup in backups {
            table.add_row(vec![
                Cell::new(backup.id),
                Cell::new(&backup.backup_type),
                Cell::new(times.format_opt(backup.completed_at.as_ref())),
            ]);
        }
    }

    table
}
