use std::{io, process::ExitCode};

use clap::Parser;
use cli::{Cli, Command};
use engine::Engine;
use error::AppError;

mod cli;
mod commands;
mod error;
mod render;
mod settings;
mod shell;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match settings::load(&cli.global) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(format!(
            "autobooks={level},engine={level},migration={level}",
            level = settings.app.level
        ))
        .init();

    match run(&settings, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.is_input_error() => {
            eprintln!("Input Error: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &settings::Settings, command: Command) -> Result<(), AppError> {
    let engine = Engine::builder()
        .database(settings.storage.database.clone())
        .variant(settings.storage.variant)
        .build()
        .await?;

    let mut out = io::stdout().lock();
    match command {
        Command::Shell => shell::run(&engine, settings, io::stdin().lock(), &mut out).await,
        command => commands::execute(&engine, settings, command, &mut out).await,
    }
}
