//! Interactive prompt: one engine, many commands.
//!
//! This is the only way to use the ephemeral variant across several
//! commands, since it starts from an empty database on every launch.
use std::io::{BufRead, Write};

use clap::Parser;
use engine::Engine;

use crate::{
    cli::{Command, ShellLine},
    commands,
    error::Result,
    settings::Settings,
};

const PROMPT: &str = "autobooks> ";

/// Reads commands from `input` until `quit`, `exit` or end of input.
///
/// Errors are reported on `out` and the loop keeps going.
pub async fn run<R, W>(engine: &Engine, settings: &Settings, input: R, out: &mut W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "{} variant, database {}. Type `help` for commands, `quit` to leave.",
        engine.variant().as_str(),
        engine.database().url()
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let words = match split_words(&line) {
            Ok(words) => words,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };
        match words.first().map(String::as_str) {
            None => continue,
            Some("quit" | "exit") => break,
            Some(_) => {}
        }

        let command = match ShellLine::try_parse_from(&words) {
            Ok(ShellLine {
                command: Command::Shell,
            }) => {
                writeln!(out, "already in the shell")?;
                continue;
            }
            Ok(parsed) => parsed.command,
            Err(err) => {
                write!(out, "{err}")?;
                continue;
            }
        };

        if let Err(err) = commands::execute(engine, settings, command, out).await {
            if err.is_input_error() {
                writeln!(out, "Input Error: {err}")?;
            } else {
                tracing::error!("{err}");
                writeln!(out, "Error: {err}")?;
            }
        }
    }

    Ok(())
}

/// Splits a line on whitespace, keeping single- or double-quoted runs
/// together (`--expense-type "Office Supplies"`).
pub fn split_words(line: &str) -> std::result::Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {q} quote"));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
