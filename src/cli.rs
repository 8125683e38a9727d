use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)] // requires `derive` feature
#[command(name = "evelayout", version, about = "Keeps EVE client windows where you left them")]
pub struct Args {
    /// Config file (default: $XDG_CONFIG_HOME/evelayout/config.yaml)
    #[arg(short = 'c', long, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Layout file, overriding the config
    #[arg(short = 'l', long, value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub layouts: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Restore layouts periodically; SIGUSR1 saves, SIGHUP reloads
    #[default]
    Run,
    /// Capture the current layout of all matching windows and exit
    Save,
    /// Apply stored layouts once and exit
    Restore,
    /// Show matching windows and their stored layouts
    List,
}
