//! CLI Commands

pub mod config;
pub mod feedback;
pub mod session;
pub mod summary;
pub mod tickets;

use crate::{Cli, Commands};
use anyhow::Result;
use netdesk::config::{netdesk_home, Config, Settings};
use netdesk::output::{self, OutputFormat, Tabular};
use netdesk::session::SessionStore;
use netdesk::views::{dashboard, nav};
use netdesk::{ViewContext, ViewOutcome};
use netdesk_client::{ApiClient, CancellationToken};
use netdesk_core::{AuthContext, PolicyError};
use serde::Serialize;
use std::process::ExitCode;

/// Conventional status for "interrupted by Ctrl-C".
const EXIT_CANCELLED: u8 = 130;

/// A live backend connection for view commands.
struct Connection {
    client: ApiClient,
    auth: AuthContext,
    cancel: CancellationToken,
    format: OutputFormat,
}

impl Connection {
    /// Build the client and arm Ctrl-C to cancel in-flight requests.
    fn open(settings: &Settings, sessions: &SessionStore) -> Result<Self> {
        let auth = sessions.require()?;
        let client = ApiClient::with_timeout(
            &settings.api_url,
            settings.api_token.as_deref(),
            settings.timeout,
        )?;
        tracing::debug!(api = client.base_url(), user = auth.user_id, role = %auth.role, "starting view");

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });

        Ok(Self {
            client,
            auth,
            cancel,
            format: settings.format,
        })
    }

    fn view(&self) -> ViewContext<'_> {
        ViewContext::new(self.auth, &self.client, self.cancel.clone())
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let home = netdesk_home()?;
    let profile = cli.profile.as_deref();
    let sessions = SessionStore::new(&home);
    let settings = || -> Result<Settings> {
        let config = Config::load_from(&home, profile)?;
        Settings::resolve(&config, cli.api_url.clone(), cli.token.clone(), cli.format)
    };

    match cli.command {
        Commands::Config { action } => config::handle(action, &home, profile),
        Commands::Login { user_id, role } => session::login(&sessions, user_id, role),
        Commands::Logout => session::logout(&sessions),
        Commands::Whoami => session::whoami(&sessions, settings()?.format),
        Commands::Nav => {
            let auth = sessions.require()?;
            settings()?.format.print(&nav::menu(&auth))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dashboard => {
            let conn = Connection::open(&settings()?, &sessions)?;
            let vc = conn.view();
            finish(dashboard::dashboard(&vc).await, conn.format, None)
        }
        Commands::Tickets { action } => {
            let conn = Connection::open(&settings()?, &sessions)?;
            let vc = conn.view();
            tickets::handle(action, &vc, conn.format).await
        }
        Commands::Feedback { action } => {
            let conn = Connection::open(&settings()?, &sessions)?;
            let vc = conn.view();
            feedback::handle(action, &vc, conn.format).await
        }
        Commands::Summary { action } => {
            let conn = Connection::open(&settings()?, &sessions)?;
            let vc = conn.view();
            summary::handle(action, &vc, conn.format).await
        }
    }
}

/// Print a view outcome and pick the exit status.
pub fn finish<T: Serialize + Tabular>(
    outcome: ViewOutcome<T>,
    format: OutputFormat,
    done: Option<String>,
) -> Result<ExitCode> {
    match outcome {
        ViewOutcome::Ready(page) => {
            if let Some(message) = done {
                output::success(&message);
            }
            format.print(&page)?;
            Ok(ExitCode::SUCCESS)
        }
        ViewOutcome::Denied(err @ PolicyError::PageForbidden { .. }) => {
            output::alert(&format!("Unauthorized: {err}"));
            Ok(ExitCode::FAILURE)
        }
        ViewOutcome::Denied(err) => {
            output::alert(&err.to_string());
            Ok(ExitCode::FAILURE)
        }
        ViewOutcome::Failed { alert } => {
            output::alert(&alert);
            Ok(ExitCode::FAILURE)
        }
        ViewOutcome::Cancelled => {
            output::notice("cancelled");
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
    }
}
