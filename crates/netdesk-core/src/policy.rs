//! Role Policy
//!
//! Maps a role to its navigation targets, ticket-list columns, per-row
//! actions and page access. Advisory only: the backend must enforce the
//! same rules on its side.

use crate::domain::{Role, Ticket, TicketStatus};
use crate::error::{PolicyError, PolicyResult};
use crate::session::AuthContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether customer feedback exists for a ticket.
///
/// `Unknown` is what a view has when it never probed (or the probe
/// failed); it gates exactly like `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackState {
    OnFile,
    Absent,
    #[default]
    Unknown,
}

impl FeedbackState {
    pub fn is_on_file(&self) -> bool {
        matches!(self, FeedbackState::OnFile)
    }
}

impl From<bool> for FeedbackState {
    fn from(on_file: bool) -> Self {
        if on_file {
            FeedbackState::OnFile
        } else {
            FeedbackState::Absent
        }
    }
}

/// Screens a role can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavTarget {
    Dashboard,
    CreateTicket,
    MyTickets,
    TicketList,
    CustomerSummary,
    EngineerSummary,
}

impl NavTarget {
    pub fn label(&self) -> &'static str {
        match self {
            NavTarget::Dashboard => "Dashboard",
            NavTarget::CreateTicket => "Create Ticket",
            NavTarget::MyTickets => "My Tickets",
            NavTarget::TicketList => "View Tickets",
            NavTarget::CustomerSummary => "Customer Summary",
            NavTarget::EngineerSummary => "Engineer Summary",
        }
    }

    /// The page this link opens
    pub fn page(&self) -> Page {
        match self {
            NavTarget::Dashboard => Page::Dashboard,
            NavTarget::CreateTicket => Page::CreateTicket,
            NavTarget::MyTickets | NavTarget::TicketList => Page::TicketList,
            NavTarget::CustomerSummary => Page::CustomerSummary,
            NavTarget::EngineerSummary => Page::EngineerSummary,
        }
    }
}

/// Navigation links for a role, in menu order.
pub fn navigation(role: Role) -> Vec<NavTarget> {
    use NavTarget::*;
    match role {
        Role::Customer => vec![Dashboard, CreateTicket, MyTickets],
        Role::Engineer | Role::Agent => vec![Dashboard, TicketList],
        Role::Admin => vec![Dashboard, TicketList, CustomerSummary, EngineerSummary],
    }
}

/// Pages (views) that can be opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Dashboard,
    TicketList,
    TicketHistory,
    CreateTicket,
    CustomerSummary,
    EngineerSummary,
    FeedbackView,
    FeedbackSubmit,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::Dashboard => "the dashboard",
            Page::TicketList => "the ticket list",
            Page::TicketHistory => "ticket history",
            Page::CreateTicket => "ticket creation",
            Page::CustomerSummary => "the customer summary",
            Page::EngineerSummary => "the engineer summary",
            Page::FeedbackView => "ticket feedback",
            Page::FeedbackSubmit => "feedback submission",
        };
        f.write_str(name)
    }
}

/// Gate a page before any backend call is made.
pub fn authorize_page(role: Role, page: Page) -> PolicyResult<()> {
    let allowed = match page {
        Page::CreateTicket | Page::FeedbackSubmit => role == Role::Customer,
        Page::CustomerSummary | Page::EngineerSummary | Page::FeedbackView => role == Role::Admin,
        Page::Dashboard | Page::TicketList | Page::TicketHistory => true,
    };
    if allowed {
        Ok(())
    } else {
        Err(PolicyError::PageForbidden { page, role })
    }
}

/// Ticket-list columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Index,
    Id,
    Description,
    Status,
    Customer,
    Engineer,
    Priority,
    Severity,
    Sla,
    Actions,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Index => "#",
            Column::Id => "ID",
            Column::Description => "Description",
            Column::Status => "Status",
            Column::Customer => "Customer",
            Column::Engineer => "Engineer",
            Column::Priority => "Priority",
            Column::Severity => "Severity",
            Column::Sla => "SLA",
            Column::Actions => "Actions",
        }
    }
}

/// Columns visible to a role, left to right.
pub fn ticket_columns(role: Role) -> Vec<Column> {
    let mut columns = vec![Column::Index, Column::Id, Column::Description, Column::Status];
    if matches!(role, Role::Admin | Role::Agent) {
        columns.push(Column::Customer);
    }
    if role != Role::Customer {
        columns.extend([Column::Engineer, Column::Priority, Column::Severity]);
    }
    if role == Role::Admin {
        columns.push(Column::Sla);
    }
    columns.push(Column::Actions);
    columns
}

/// Row-level ticket actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketAction {
    ViewHistory,
    AssignEngineer,
    SetPriority,
    SetSeverity,
    MarkResolved,
    SubmitFeedback,
    ViewFeedback,
    Close,
}

impl TicketAction {
    pub fn label(&self) -> &'static str {
        match self {
            TicketAction::ViewHistory => "history",
            TicketAction::AssignEngineer => "assign",
            TicketAction::SetPriority => "priority",
            TicketAction::SetSeverity => "severity",
            TicketAction::MarkResolved => "resolve",
            TicketAction::SubmitFeedback => "feedback",
            TicketAction::ViewFeedback => "view-feedback",
            TicketAction::Close => "close",
        }
    }
}

impl fmt::Display for TicketAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TicketAction::ViewHistory => "viewing history",
            TicketAction::AssignEngineer => "assigning an engineer",
            TicketAction::SetPriority => "setting priority",
            TicketAction::SetSeverity => "setting severity",
            TicketAction::MarkResolved => "resolving",
            TicketAction::SubmitFeedback => "submitting feedback",
            TicketAction::ViewFeedback => "viewing feedback",
            TicketAction::Close => "closing",
        };
        f.write_str(name)
    }
}

/// An action shown on a row. Disabled actions are shown but cannot run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferedAction {
    pub action: TicketAction,
    pub enabled: bool,
}

impl OfferedAction {
    fn enabled(action: TicketAction) -> Self {
        Self { action, enabled: true }
    }
}

/// Actions a role gets on one ticket, in display order.
pub fn offered_actions(role: Role, ticket: &Ticket, feedback: FeedbackState) -> Vec<OfferedAction> {
    let status = &ticket.status;
    let mut actions = vec![OfferedAction::enabled(TicketAction::ViewHistory)];

    match role {
        Role::Agent if status.is_active() => {
            if ticket.assigned_engineer.is_none() {
                actions.push(OfferedAction::enabled(TicketAction::AssignEngineer));
            }
            if ticket.priority.is_none() {
                actions.push(OfferedAction::enabled(TicketAction::SetPriority));
            }
            if ticket.severity.is_none() {
                actions.push(OfferedAction::enabled(TicketAction::SetSeverity));
            }
        }
        Role::Engineer if *status == TicketStatus::InProgress => {
            actions.push(OfferedAction::enabled(TicketAction::MarkResolved));
        }
        Role::Customer if *status == TicketStatus::Resolved && !feedback.is_on_file() => {
            actions.push(OfferedAction::enabled(TicketAction::SubmitFeedback));
        }
        Role::Admin if status.is_finished() => {
            actions.push(OfferedAction::enabled(TicketAction::ViewFeedback));
            if *status == TicketStatus::Resolved {
                actions.push(OfferedAction {
                    action: TicketAction::Close,
                    enabled: feedback.is_on_file(),
                });
            }
        }
        _ => {}
    }

    actions
}

/// Check an action before performing it.
///
/// An offered-but-disabled close yields `FeedbackRequired`; anything not
/// offered yields `ActionNotPermitted`.
pub fn authorize_action(
    ctx: &AuthContext,
    ticket: &Ticket,
    action: TicketAction,
    feedback: FeedbackState,
) -> PolicyResult<()> {
    let offered = offered_actions(ctx.role, ticket, feedback)
        .into_iter()
        .find(|o| o.action == action);

    match offered {
        Some(o) if o.enabled => Ok(()),
        Some(_) => Err(PolicyError::FeedbackRequired(ticket.id)),
        None if action == TicketAction::SubmitFeedback
            && ctx.role == Role::Customer
            && ticket.status == TicketStatus::Resolved
            && feedback.is_on_file() =>
        {
            Err(PolicyError::FeedbackAlreadySubmitted(ticket.id))
        }
        None => Err(PolicyError::ActionNotPermitted {
            action,
            role: ctx.role,
            status: ticket.status.clone(),
        }),
    }
}
