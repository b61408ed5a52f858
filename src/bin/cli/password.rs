use std::io::{BufRead, Write};

use anyhow::{Context, Result};

/// Environment variable consulted before prompting
pub const PASSWORD_ENV: &str = "FOLIO_PASSWORD";

/// Ask for the archive password.
///
/// Returns `None` when the user cancels by entering nothing.
pub fn prompt(purpose: &str) -> Result<Option<String>> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(non_empty(password));
    }

    if crate::stdin_is_tty() {
        eprint!("Password to {} (empty to cancel): ", purpose);
        std::io::stderr().flush().ok();
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password")?;

    Ok(non_empty(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn non_empty(password: String) -> Option<String> {
    if password.is_empty() {
        None
    } else {
        Some(password)
    }
}
