use anyhow::Result;
use clap::Parser;
use email_sender::cli::{Cli, CliHandler};
use email_sender::config::APP_NAME;
use std::fs::OpenOptions;
use std::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.debug, cli.is_interactive());

    let handler = CliHandler::new(cli.config_dir.as_deref(), cli.base_url)?;

    match cli.command {
        Some(command) => handler.handle_command(command).await,
        None => handler.run_composer(None).await,
    }
}

/// The composer owns the terminal, so it logs to a file; subcommands log to stderr
fn init_logging(debug: bool, interactive: bool) {
    let log_level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let log_file = interactive
        .then(|| dirs::data_dir().map(|dir| dir.join(APP_NAME)))
        .flatten()
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(format!("{}.log", APP_NAME)))
                .ok()
        });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(log_level)
            .init(),
        None if interactive => tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_max_level(log_level)
            .init(),
        None => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(log_level)
            .init(),
    }

    if debug {
        tracing::debug!("Debug logging enabled");
    }
}
