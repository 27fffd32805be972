use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pasteup")]
#[command(about = "Upload pasted or dropped files and print the snippet that links them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to <config dir>/pasteup/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Also print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where the payload is pasted.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Language id of the target document (selects per-language options)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Workspace folder whose files are never uploaded (repeatable)
    #[arg(short, long = "workspace")]
    pub workspaces: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload files or URIs as one drop and print the snippet
    Upload {
        #[command(flatten)]
        target: TargetArgs,

        /// Paths or URIs
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Upload and delete a test object to check the backend settings
    TestConnection,

    /// Interactive session: one drop per line, `:undo` to reverse an upload
    Session {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Write a settings file with the defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
