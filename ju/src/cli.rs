//! CLI argument parsing for jira-util

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ju")]
#[command(author, version, about = "Support utilities for the tracker CLI", long_about = None)]
pub struct Cli {
    /// Path to config file (skips the parent directory search)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template against a YAML or JSON data file
    Render {
        /// Template file, or a name looked up in the template directories
        #[arg(required = true)]
        template: String,

        /// Data file (YAML or JSON); defaults to the merged config
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Find a file in the current directory or its parents
    Find {
        /// File name to look for
        #[arg(required = true)]
        name: String,

        /// Print every match instead of the closest one
        #[arg(short, long)]
        all: bool,
    },

    /// Convert a YAML document to JSON, dropping blank values
    Normalize {
        /// YAML file to read
        #[arg(required = true)]
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask a yes/no question; exits 0 for yes and 1 for no
    Confirm {
        /// Question to ask
        #[arg(required = true)]
        message: String,

        /// Make yes the answer for an empty reply
        #[arg(short = 'y', long)]
        default_yes: bool,
    },
}
