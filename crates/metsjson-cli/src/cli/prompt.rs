//! Interactive fallback for inputs not given as flags or environment.

use dialoguer::{theme::ColorfulTheme, Input};
use metsjson_core::MetsError;
use std::io::{BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// Ask for a path. Uses a dialoguer prompt on a terminal and reads one line
/// from stdin otherwise. An empty answer is a usage error.
pub fn ask_path(prompt: &str, what: &str) -> anyhow::Result<PathBuf> {
    let answer = if std::io::stdin().is_terminal() {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?
    } else {
        eprint!("{prompt}: ");
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line
    };
    non_empty(&answer, what)
}

fn non_empty(answer: &str, what: &str) -> anyhow::Result<PathBuf> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        return Err(MetsError::usage(format!("no {what} given")).into());
    }
    Ok(PathBuf::from(trimmed))
}
