use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use boxbreath::cli::args::{Cli, Commands, RunArgs};
use boxbreath::cli::commands;
use boxbreath::config::{ColorSetting, Config, Paths};
use boxbreath::error::BreathError;
use boxbreath::logging::{self, LogTarget, LOG_ENV};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), BreathError> {
    let cli = Cli::parse();
    let format = cli.output;

    let paths = Paths::new()?;
    let config_path = cli.config.unwrap_or_else(|| paths.config_file.clone());
    let config = Config::load_from_path(&config_path)?;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }

    let command = cli.command.unwrap_or_else(|| Commands::Run(RunArgs::default()));
    let target = match command {
        Commands::Run(_) => LogTarget::for_tui(&config.logging, cli.verbose, &paths),
        _ => LogTarget::Stderr,
    };
    let directive = logging::filter_directive(
        std::env::var(LOG_ENV).ok().as_deref(),
        cli.verbose,
        &config.logging.level,
    );
    logging::init(&directive, &target)?;
    tracing::debug!(path = %config_path.display(), "configuration loaded");

    let output = match command {
        Commands::Run(args) => commands::run(&args, &config.audio, format)?,
        Commands::Simulate(args) => commands::simulate(&args, &config, format)?,
        Commands::Config(args) => commands::config(args.command, &config, &config_path, format)?,
        Commands::Completions { shell } => commands::completions(shell)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
