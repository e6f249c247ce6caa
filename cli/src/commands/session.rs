//! Session commands

use anyhow::Result;
use netdesk::output::{self, OutputFormat};
use netdesk::session::SessionStore;
use netdesk_core::{Role, UserId};
use std::process::ExitCode;

pub fn login(sessions: &SessionStore, user_id: UserId, role: Role) -> Result<ExitCode> {
    sessions.login(user_id, role)?;
    output::success(&format!("Logged in as user {user_id} ({role})"));
    Ok(ExitCode::SUCCESS)
}

pub fn logout(sessions: &SessionStore) -> Result<ExitCode> {
    if sessions.logout()? {
        output::success("Logged out");
    } else {
        output::notice("No active session");
    }
    Ok(ExitCode::SUCCESS)
}

pub fn whoami(sessions: &SessionStore, format: OutputFormat) -> Result<ExitCode> {
    match sessions.load()? {
        Some(session) => {
            format.print(&session)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            output::notice("Not logged in");
            Ok(ExitCode::FAILURE)
        }
    }
}
