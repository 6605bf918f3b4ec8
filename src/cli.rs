//! Command-line argument parsing
//!
//! Supports:
//! - One-shot transformation of a file or stdin
//! - The "Set Image Width" command and reading the stored width
//! - Watching a directory of Markdown files with the sync engine

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Convert uploaded-image Markdown into sized <img> tags
#[derive(Parser, Debug)]
#[command(name = "image-resizer", version, about = "Convert uploaded-image Markdown into sized <img> tags")]
pub struct CliArgs {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum CliCommand {
    /// Rewrite a file (or stdin) once and print the result
    Transform {
        /// File to read; stdin when omitted
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,

        /// Width to apply instead of the stored preference
        #[arg(long, value_name = "PX")]
        width: Option<u32>,

        /// Write the result back to PATH instead of printing it
        #[arg(short = 'i', long, requires = "path")]
        in_place: bool,

        /// Print the outcome as JSON
        #[arg(long, conflicts_with = "in_place")]
        json: bool,
    },

    /// Set the stored image width (prompts when VALUE is omitted)
    SetWidth {
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Print the stored image width
    GetWidth,

    /// Keep every Markdown file under DIR in sync until interrupted
    Watch {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },

    /// List the registered user commands
    Commands,
}
