use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "boxbreath")]
#[command(about = "A guided box-breathing timer for the terminal")]
#[command(long_about = "boxbreath - box breathing in your terminal

Breathe along a square: inhale, hold, exhale, hold, four seconds each.
A short preparation and a 3-2-1 countdown lead into the first breath.
Optional background audio fades in when breathing starts and out when it stops.

QUICK START:
  boxbreath                         Open the breathing screen
  boxbreath run --track rain.ogg    Breathe with a looping track
  boxbreath simulate --seconds 30   Print the event stream without a screen

KEYS (run):
  space/enter   start or stop
  + / -         volume up or down
  m             mute
  ?             help
  q / Esc       quit

For more information on a specific command, run:
  boxbreath <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    /// Path to the configuration file
    ///
    /// Defaults to ~/.boxbreath/config.yaml. A missing file means defaults.
    #[arg(long, global = true, env = "BOXBREATH_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the breathing screen (default)
    ///
    /// Any key unlocks audio playback. Space or enter starts and stops the
    /// session; leaving prints a short summary.
    #[command(alias = "r")]
    Run(RunArgs),

    /// Run a session on a virtual clock and print every event
    ///
    /// Nothing waits on the wall clock, so a minute of breathing prints
    /// immediately. Useful for scripting and for checking timings.
    ///
    /// # Examples
    ///
    ///   boxbreath simulate --seconds 22
    ///   boxbreath simulate --seconds 30 --stop-at 12 --restart-at 13
    ///   boxbreath simulate --with-audio -o json
    #[command(alias = "sim")]
    Simulate(SimulateArgs),

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// # Examples
    ///
    ///   boxbreath completions bash > ~/.local/share/bash-completion/completions/boxbreath
    ///   boxbreath completions zsh > ~/.zsh/completions/_boxbreath
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Default, Clone, PartialEq)]
pub struct RunArgs {
    /// Run without background audio
    #[arg(long)]
    pub no_audio: bool,

    /// Looping audio track (overrides audio.track)
    #[arg(long, value_name = "PATH")]
    pub track: Option<PathBuf>,

    /// Target volume, 0.0 to 1.0 (overrides audio.volume)
    #[arg(long, value_name = "V")]
    pub volume: Option<f32>,

    /// Start muted
    #[arg(long)]
    pub muted: bool,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct SimulateArgs {
    /// Virtual seconds to run for
    #[arg(long, default_value = "22", value_name = "N")]
    pub seconds: u64,

    /// Stop the session at this virtual second
    #[arg(long, value_name = "N")]
    pub stop_at: Option<u64>,

    /// Start again at this virtual second
    #[arg(long, value_name = "N")]
    pub restart_at: Option<u64>,

    /// Attach a silent audio track and report fades
    #[arg(long)]
    pub with_audio: bool,

    /// Target volume for --with-audio, 0.0 to 1.0
    #[arg(long, value_name = "V")]
    pub volume: Option<f32>,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            seconds: 22,
            stop_at: None,
            restart_at: None,
            with_audio: false,
            volume: None,
        }
    }
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}
