use bridge_traits::gateway::ResourceKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sms-sync", version)]
#[command(about = "Reconcile the legacy media catalog with JW Platform")]
pub struct Cli {
    /// Log progress tallies as well as warnings
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch every video or channel from the platform into listing files
    Fetch {
        kind: FetchKind,
        /// Prefix of the page files written (`<base-name><offset>.json`)
        #[arg(long, default_value = "videos_")]
        base_name: String,
    },
    /// Generate a job file that brings the platform in line with a catalog export
    #[command(name = "genupdatejob")]
    GenUpdateJob {
        target: PlanTarget,
        /// Catalog export (media export for videos, collection export otherwise)
        csv: PathBuf,
        /// Listing files written by `fetch`
        #[arg(required = true)]
        metadata: Vec<PathBuf>,
        /// Base URL for download links
        #[arg(long, required_if_eq("target", "videos"))]
        base: Option<String>,
        /// Base URL of legacy thumbnail images
        #[arg(long)]
        base_image_url: Option<String>,
        /// Leading path components stripped from export filenames
        #[arg(long, default_value_t = 0)]
        strip_leading: usize,
        /// Output file, stdout if omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a job file against the platform
    #[command(name = "applyupdatejob")]
    ApplyUpdateJob {
        /// Job file, stdin if omitted
        update: Option<PathBuf>,
        /// Write the execution log here
        #[arg(long = "log-file")]
        log_file: Option<PathBuf>,
    },
    /// Generate a job file deleting duplicate videos
    Tidy {
        /// Video listing files written by `fetch`
        #[arg(required = true)]
        metadata: Vec<PathBuf>,
        /// Output file, stdout if omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Videos,
    Channels,
}

impl From<FetchKind> for ResourceKind {
    fn from(kind: FetchKind) -> Self {
        match kind {
            FetchKind::Videos => ResourceKind::Videos,
            FetchKind::Channels => ResourceKind::Channels,
        }
    }
}

/// What a generated job file reconciles
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTarget {
    Videos,
    Channels,
    #[value(name = "videos_in_channels")]
    VideosInChannels,
}
