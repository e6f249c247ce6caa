//! netdesk CLI
//!
//! Role-based terminal front-end for the support ticketing backend.
//!
//! # Usage
//!
//! ```bash
//! netdesk login --user-id 7 --role customer
//! netdesk tickets create --category network --description "VPN drops every hour"
//! netdesk tickets list --status SLA_BREACHED
//! netdesk tickets close 42
//! netdesk summary engineers --format json
//! ```

use clap::{Parser, Subcommand};
use netdesk::output::{self, OutputFormat};
use netdesk_core::{DisplayBucket, IssueCategory, Priority, Role, Severity, UserId};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "netdesk")]
#[command(version)]
#[command(about = "Network support desk command line interface", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "NETDESK_API_URL", global = true)]
    api_url: Option<String>,

    /// Bearer token for the backend
    #[arg(long, env = "NETDESK_API_TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, short, global = true)]
    format: Option<OutputFormat>,

    /// Profile name from config file
    #[arg(long, short, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session as a user with a role
    Login {
        #[arg(long)]
        user_id: UserId,
        /// CUSTOMER, ENGINEER, AGENT or ADMIN
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami,
    /// Show the pages available to your role
    Nav,
    /// Show your dashboard counters
    Dashboard,
    /// Work with tickets
    Tickets {
        #[command(subcommand)]
        action: TicketCommands,
    },
    /// Read or leave feedback
    Feedback {
        #[command(subcommand)]
        action: FeedbackCommands,
    },
    /// Admin summaries
    Summary {
        #[command(subcommand)]
        action: SummaryCommands,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TicketCommands {
    /// List tickets visible to you
    List {
        /// OPEN, IN_PROGRESS, RESOLVED, CLOSED, SLA_ACTIVE, SLA_MET or SLA_BREACHED
        #[arg(long, value_parser = parse_bucket)]
        status: Option<DisplayBucket>,
        #[arg(long)]
        customer_id: Option<UserId>,
        #[arg(long)]
        engineer_id: Option<UserId>,
    },
    /// Show a ticket and its history
    Show { id: u64 },
    /// File a new ticket
    Create {
        #[arg(long)]
        description: String,
        /// Hardware, Software, Network, Billing or Account
        #[arg(long, value_parser = parse_category)]
        category: Option<IssueCategory>,
    },
    /// Assign an engineer
    Assign {
        id: u64,
        #[arg(long)]
        engineer_id: UserId,
    },
    /// Set priority (LOW, MEDIUM, HIGH)
    Priority {
        id: u64,
        #[arg(value_parser = parse_priority)]
        priority: Priority,
    },
    /// Set severity (MINOR, MAJOR, CRITICAL)
    Severity {
        id: u64,
        #[arg(value_parser = parse_severity)]
        severity: Severity,
    },
    /// Mark a ticket resolved
    Resolve { id: u64 },
    /// Close a resolved ticket
    Close { id: u64 },
    /// List engineers seen on your tickets
    Engineers,
}

#[derive(Subcommand)]
enum FeedbackCommands {
    /// Show feedback left on a ticket
    Show { id: u64 },
    /// Rate a resolved ticket
    Submit {
        id: u64,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
enum SummaryCommands {
    /// Ticket counts per customer
    Customers,
    /// Ticket load per engineer
    Engineers,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

fn parse_role(s: &str) -> Result<Role, String> {
    s.parse().map_err(|e: netdesk_core::DomainError| e.to_string())
}

fn parse_bucket(s: &str) -> Result<DisplayBucket, String> {
    s.parse().map_err(|e: netdesk_core::DomainError| e.to_string())
}

fn parse_category(s: &str) -> Result<IssueCategory, String> {
    s.parse().map_err(|e: netdesk_core::DomainError| e.to_string())
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    s.parse().map_err(|e: netdesk_core::DomainError| e.to_string())
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse().map_err(|e: netdesk_core::DomainError| e.to_string())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("NETDESK_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            output::alert(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
