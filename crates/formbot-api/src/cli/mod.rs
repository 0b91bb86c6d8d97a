//! CLI command definitions for the `formbot` binary.

pub mod forms;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Build, run and broadcast Slack forms.
#[derive(Parser)]
#[command(name = "formbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true, env = "FORMBOT_LOG_JSON")]
    pub log_json: bool,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "FORMBOT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Slack HTTP endpoints.
    Serve {
        /// Port to listen on (overrides config and PORT).
        #[arg(long)]
        port: Option<u16>,

        /// Interface to bind (overrides config and FORMBOT_HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Inspect saved forms.
    Forms {
        #[command(subcommand)]
        action: FormsAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum FormsAction {
    /// List saved forms.
    #[command(alias = "ls")]
    List {
        /// Only forms authored by this Slack user id.
        #[arg(long)]
        user: Option<String>,
    },

    /// Show one form with its fields.
    Show {
        /// Form id (UUID).
        id: String,
    },
}
