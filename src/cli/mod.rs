//! CLI module - Command-line interface for autofit
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// autofit - Anamorphic zoom for letterboxed 16:9 video in Kodi
/// Fills a wide projector screen without stretching the picture
#[derive(Parser)]
#[command(name = "autofit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default search paths
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Listen for playback events and adjust the view mode (default)
    #[command(alias = "-d", alias = "--daemon")]
    Daemon,

    /// Run the adjustment once against whatever is playing now
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Look up the content aspect ratio of a title
    #[command(alias = "l")]
    Lookup {
        /// Movie or show title
        #[arg(required = true)]
        title: Vec<String>,
        /// Release year
        #[arg(long, short)]
        year: String,
    },

    /// Show the zoom and pixel ratio for a frame without contacting Kodi
    Compute {
        /// Encoded frame width
        #[arg(long)]
        width: u32,
        /// Encoded frame height
        #[arg(long)]
        height: u32,
        /// True aspect ratio of the content, e.g. 2.39
        #[arg(long)]
        content_ar: f64,
        /// Screen aspect ratio; defaults to the configured target
        #[arg(long)]
        screen_ar: Option<f64>,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
