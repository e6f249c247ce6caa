//! Navigation menu

use crate::output::Tabular;
use netdesk_core::{navigation, AuthContext, NavTarget, Role};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub target: NavTarget,
    pub label: &'static str,
    pub command: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavMenu {
    pub role: Role,
    pub entries: Vec<NavEntry>,
}

fn command_for(target: NavTarget) -> &'static str {
    match target {
        NavTarget::Dashboard => "netdesk dashboard",
        NavTarget::CreateTicket => "netdesk tickets create",
        NavTarget::MyTickets | NavTarget::TicketList => "netdesk tickets list",
        NavTarget::CustomerSummary => "netdesk summary customers",
        NavTarget::EngineerSummary => "netdesk summary engineers",
    }
}

/// Menu for the logged-in role. Needs no backend.
pub fn menu(auth: &AuthContext) -> NavMenu {
    NavMenu {
        role: auth.role,
        entries: navigation(auth.role)
            .into_iter()
            .map(|target| NavEntry {
                target,
                label: target.label(),
                command: command_for(target),
            })
            .collect(),
    }
}

impl Tabular for NavMenu {
    fn headers(&self) -> Vec<String> {
        vec!["Page".into(), "Command".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.entries
            .iter()
            .map(|e| vec![e.label.to_string(), e.command.to_string()])
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        vec![format!("Logged in as {}", self.role)]
    }
}
