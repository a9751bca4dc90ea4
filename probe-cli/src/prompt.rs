//! Interactive input. Falls back to plain line reads when stdin is not a terminal.

use anyhow::{Context, Result, bail};
use inquire::{Password, PasswordDisplayMode, Text};
use probe_core::LocationQuery;
use std::io::{self, BufRead, IsTerminal, Write};

/// Ask for one line of text on the terminal.
pub fn ask(label: &str) -> Result<String> {
    let answer = Text::new(label)
        .prompt()
        .with_context(|| format!("Failed to read '{label}'"))?;

    Ok(answer.trim().to_string())
}

/// Ask for a secret; typed characters are masked.
pub fn ask_secret(label: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return read_answer(&mut io::stdin().lock(), &mut io::stdout(), label);
    }

    let answer = Password::new(label)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .with_context(|| format!("Failed to read '{label}'"))?;

    Ok(answer.trim().to_string())
}

/// City, state code and country code, in that order.
pub fn read_location() -> Result<LocationQuery> {
    if !io::stdin().is_terminal() {
        return read_location_from(&mut io::stdin().lock(), &mut io::stdout());
    }

    let city = ask("City:")?;
    let state_code = ask("State code:")?;
    let country_code = ask("Country code:")?;

    Ok(LocationQuery::new(city, state_code, country_code))
}

/// Line-based variant of [`read_location`] for piped input.
pub fn read_location_from<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<LocationQuery> {
    let city = read_answer(input, output, "City:")?;
    let state_code = read_answer(input, output, "State code:")?;
    let country_code = read_answer(input, output, "Country code:")?;

    Ok(LocationQuery::new(city, state_code, country_code))
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label} ")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read '{label}' from stdin"))?;
    if read == 0 {
        bail!("No input provided for '{label}'");
    }

    Ok(line.trim().to_string())
}
