//! CLI for gdl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gdl_core::config;
use std::path::PathBuf;

use commands::{run_fetch, run_list, ListArgs};

/// Top-level CLI. With no subcommand, behaves like `gdl fetch`.
#[derive(Debug, Parser)]
#[command(name = "gdl")]
#[command(about = "gdl: download the files listed in a Google Drive manifest", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download the first 30 manifest entries into their directories.
    Fetch {
        /// Manifest to read (default: `manifest_path` from config, `./google-drive-list.json`).
        #[arg(long, value_name = "PATH")]
        manifest: Option<PathBuf>,
    },

    /// Walk a Drive folder through the Drive API and write a manifest.
    List {
        /// Google API key with Drive API access.
        #[arg(long)]
        api_key: String,

        /// Id of the Drive folder to walk.
        #[arg(long)]
        folder_id: String,

        /// Destination directory prefix for the folder (default from config: Offline/Anime).
        #[arg(long, value_name = "PATH")]
        root: Option<String>,

        /// Manifest file to write (default from config: output.txt).
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_default();
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command.unwrap_or(CliCommand::Fetch { manifest: None }) {
            CliCommand::Fetch { manifest } => run_fetch(&cfg, manifest.as_deref())?,
            CliCommand::List {
                api_key,
                folder_id,
                root,
                output,
            } => run_list(
                &cfg,
                ListArgs {
                    api_key,
                    folder_id,
                    root,
                    output,
                },
            )?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
