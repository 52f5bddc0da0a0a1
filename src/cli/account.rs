use anyhow::Result;
use std::fmt::Write;

use crate::api::{Account, CloudApi};
use crate::format::{glyph, TimeFormatter};

/// Account summary, timestamps in the configured timezone
pub fn render(account: &Account, times: &TimeFormatter) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Name: {}", account.name);
    let _ = writeln!(out, "Last login: {}", times.format_opt(account.last_login_at.as_ref()));
    let _ = writeln!(out, "Created at: {}", times.format(&account.created_at));
    let _ = writeln!(out, "Status: {}", glyph(account.flags.active));
    let _ = writeln!(out, "TFA: {}", glyph(account.flags.tfa));

    out
}

pub fn execute(api: &dyn CloudApi, times: &TimeFormatter) -> Result<()> {
    tracing::info!("Fetching account");

    let account = api.account()?;
    print!("{}", render(&account, times));

    Ok(())
}
