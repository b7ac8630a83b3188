use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "safety-orientation")]
#[command(version)]
#[command(about = "Worker safety orientation: info, video, quiz and sign-off")]
#[command(long_about = "Walks a new or returning worker through the safety orientation: \
                       worker information, the safety video, a true/false quiz and the signed \
                       acknowledgment. Progress is saved after every step and submissions made \
                       while offline are synced later. Run without a command to see what is next.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record worker and emergency contact information (step 1)
    Info {
        #[arg(long, default_value = "", help = "Worker's full name")]
        full_name: String,
        #[arg(long, default_value = "", help = "Hire date (YYYY-MM-DD)")]
        hire_date: String,
        #[arg(long, default_value = "", help = "Supervisor's name")]
        supervisor: String,
        #[arg(long, default_value = "", help = "Job site id (defaults to 'default')")]
        site: String,
        #[arg(long, default_value = "", help = "Worker status, e.g. NEW_TO_POSITION or new-to-position")]
        status: String,
        #[arg(long, default_value = "", help = "Emergency contact name")]
        contact_name: String,
        #[arg(long, default_value = "", help = "Emergency contact phone")]
        contact_phone: String,
        #[arg(long, default_value = "", help = "Emergency contact relationship")]
        contact_relationship: String,
    },
    /// Report safety video playback (step 2)
    Video {
        /// Playback position reached, in seconds
        #[arg(long, conflicts_with = "ended", required_unless_present = "ended")]
        position: Option<f64>,
        /// The video played to the end
        #[arg(long)]
        ended: bool,
    },
    /// Take the safety quiz interactively (step 3)
    Quiz,
    /// Review the safety topics and sign the acknowledgment (step 4)
    Acknowledge {
        /// Confirm the topics were read and understood
        #[arg(long)]
        confirm: bool,
        /// Signature payload
        #[arg(long, conflicts_with = "signature_file", required_unless_present = "signature_file")]
        signature: Option<String>,
        /// File holding the signature payload (e.g. a data URL)
        #[arg(long)]
        signature_file: Option<PathBuf>,
    },
    /// Show the completion summary (step 5)
    Summary,
    /// Show saved progress, step access and pending submissions
    Status,
    /// Start over: clear all saved orientation progress
    Reset,
    /// Deliver submissions recorded while offline
    Sync {
        /// Keep running and sync whenever connectivity returns (Ctrl-C to stop)
        #[arg(long)]
        watch: bool,
    },
    /// Supervisor dashboard of orientation completions
    Dashboard {
        /// Filter by worker, supervisor or site
        #[arg(long, default_value = "")]
        search: String,
        /// all, completed or in_progress
        #[arg(long, default_value = "all")]
        status: String,
        /// Fetch records from the configured dashboard endpoint
        #[arg(long)]
        remote: bool,
    },
}
