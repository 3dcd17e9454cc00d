mod app;
mod commands;
mod image;
mod output;

use anyhow::Context;
use clap::Parser;
use valscope::CancellationToken;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            eprintln!("\nCancelled.");
            std::process::exit(130);
        }
        handler_token.cancel();
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // Show valscope info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("valscope", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::String {
            image,
            address,
            length,
        } => commands::string::run(image, address, *length, &cancel, &cli.global),
        Command::Value {
            image,
            address,
            r#type,
            repeat,
            format,
        } => commands::value::run(
            image,
            address,
            &commands::value::ValueOptions {
                type_spec: r#type,
                repeat: *repeat,
                format: *format,
            },
            &cancel,
            &cli.global,
        ),
        Command::Settings { commands: script } => commands::settings::run(script, &cli.global),
    }
}
