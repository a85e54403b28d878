//! CLI module for SmartCut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// SmartCut planner
///
/// Decides where a stream copy can start for a trim point and, when the cut lands
/// between keyframes, which encoder arguments bridge the gap.
#[derive(Parser, Debug)]
#[command(name = "smartcut")]
#[command(about = "SmartCut - keyframe-aware cut planning for ffmpeg")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./smartcut.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a cut: lossless start point and bridging encode parameters
    Plan(args::PlanArgs),
    /// List keyframes of a stream around a point in time
    Keyframes(args::KeyframesArgs),
    /// Print quality and preset arguments for an encoder
    EncoderArgs(args::EncoderArgsArgs),
    /// List known encoder families and their defaults
    Encoders(args::EncodersArgs),
}

impl Cli {
    /// Run the selected command
    pub async fn run(self) -> Result<()> {
        let overrides = commands::GlobalOverrides {
            config: self.config,
            log_level: self.log_level,
            log_json: self.log_json,
        };

        match self.command {
            Commands::Plan(args) => commands::plan(&overrides, args).await,
            Commands::Keyframes(args) => commands::keyframes(&overrides, args).await,
            Commands::EncoderArgs(args) => commands::encoder_args(&overrides, args),
            Commands::Encoders(args) => commands::encoders(&overrides, args),
        }
    }
}
