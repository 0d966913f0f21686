use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "crew_app",
    version,
    about = "Start company research jobs and follow them to completion"
)]
pub struct Cli {
    /// RON config file (defaults to ./crew_app.ron when present).
    #[arg(long, global = true, env = "CREW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Backend base url, e.g. http://localhost:3001.
    #[arg(long, global = true, env = "CREW_BASE_URL")]
    pub base_url: Option<String>,

    /// Delay between status polls in milliseconds.
    #[arg(long, global = true)]
    pub interval_ms: Option<u64>,

    /// Write logs to this file instead of the terminal.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a new research job and track it.
    Research {
        /// Company to research; repeat for several.
        #[arg(long = "company", required = true)]
        companies: Vec<String>,

        /// Position to research at every company; repeat for several.
        #[arg(long = "position", required = true)]
        positions: Vec<String>,

        /// Write the final records to this JSON file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Track a job that was already submitted.
    Track {
        job_id: String,

        /// Write the final records to this JSON file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
