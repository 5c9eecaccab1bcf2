use clap::{Parser, Subcommand};

/// scam-hammer: phishing report triage and public warnings
#[derive(Parser)]
#[command(name = "scam-hammer", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the approval server, report listener and background jobs
    Serve {
        /// Port to bind (defaults to SCAM_HAMMER_PORT)
        #[arg(short, long, env = "SCAM_HAMMER_PORT")]
        port: Option<u16>,
    },

    /// Manage phishing reports
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },

    /// Run brand and country analysis without touching the store
    Analyze {
        /// Suspicious link
        url: String,
        /// Sender phone number
        #[arg(long)]
        phone: Option<String>,
        /// Do not fetch the page title
        #[arg(long)]
        no_fetch: bool,
    },

    /// Manage approval tokens
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },

    /// Publish all approved reports once and exit
    Publish,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Submit a new report (picked up by a running server)
    Submit {
        #[arg(long)]
        link: String,
        #[arg(long)]
        phone: String,
    },
    /// List recent reports
    List {
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Delete expired approval tokens
    Sweep,
}
