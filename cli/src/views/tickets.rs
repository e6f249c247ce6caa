//! Ticket list

use super::{ViewContext, ViewOutcome};
use crate::output::Tabular;
use netdesk_client::probe_feedback;
use netdesk_core::{
    classify, engineer_directory, offered_actions, ticket_columns, Column, FeedbackState,
    OfferedAction, Page, Priority, Role, Severity, SlaDisplay, Ticket, TicketId, TicketQuery,
    TicketStatus, UserRef,
};
use serde::Serialize;
use std::collections::HashMap;

/// One rendered row. Fields for columns the role cannot see stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketRow {
    pub index: usize,
    pub id: TicketId,
    pub label: String,
    pub description: String,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engineer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sla: Option<SlaDisplay>,
    pub feedback: FeedbackState,
    pub actions: Vec<OfferedAction>,
}

const EMPTY: &str = "-";

impl TicketRow {
    fn build(
        index: usize,
        ticket: &Ticket,
        columns: &[Column],
        role: Role,
        feedback: FeedbackState,
        now: netdesk_core::Timestamp,
    ) -> Self {
        let shows = |c: Column| columns.contains(&c);
        Self {
            index,
            id: ticket.id,
            label: ticket.label(),
            description: ticket.description.clone(),
            status: ticket.status.clone(),
            customer: shows(Column::Customer).then(|| name_or_dash(ticket.customer.as_ref())),
            engineer: shows(Column::Engineer)
                .then(|| name_or_dash(ticket.assigned_engineer.as_ref())),
            priority: shows(Column::Priority).then_some(ticket.priority).flatten(),
            severity: shows(Column::Severity).then_some(ticket.severity).flatten(),
            sla: shows(Column::Sla).then(|| classify(ticket, now).sla),
            feedback,
            actions: offered_actions(role, ticket, feedback),
        }
    }

    /// Text for one table cell.
    pub fn cell(&self, column: Column) -> String {
        match column {
            Column::Index => self.index.to_string(),
            Column::Id => self.label.clone(),
            Column::Description => self.description.clone(),
            Column::Status => self.status.to_string(),
            Column::Customer => self.customer.clone().unwrap_or_else(|| EMPTY.into()),
            Column::Engineer => self.engineer.clone().unwrap_or_else(|| EMPTY.into()),
            Column::Priority => self.priority.map_or_else(|| EMPTY.into(), |p| p.to_string()),
            Column::Severity => self.severity.map_or_else(|| EMPTY.into(), |s| s.to_string()),
            Column::Sla => self.sla.map_or_else(|| EMPTY.into(), |s| s.to_string()),
            Column::Actions => self
                .actions
                .iter()
                .map(|a| {
                    if a.enabled {
                        a.action.label().to_string()
                    } else {
                        format!("{} (needs feedback)", a.action.label())
                    }
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn name_or_dash(user: Option<&UserRef>) -> String {
    user.map_or_else(|| EMPTY.to_string(), UserRef::display_name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketListPage {
    pub role: Role,
    pub query: TicketQuery,
    pub columns: Vec<Column>,
    pub rows: Vec<TicketRow>,
}

impl TicketListPage {
    pub fn row(&self, id: TicketId) -> Option<&TicketRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

impl Tabular for TicketListPage {
    fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header().to_string()).collect()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(|c| row.cell(*c)).collect())
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        let mut lines = vec![format!("{} ticket(s)", self.rows.len())];
        if !self.query.is_empty() {
            lines.push(format!("filter: {}", self.query.to_cli_args()));
        }
        lines
    }
}

/// Feedback is only probed where it changes what the role is offered.
fn needs_feedback_probe(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Customer)
}

/// The ticket list for the current role, narrowed by `query`.
pub async fn ticket_list(vc: &ViewContext<'_>, query: TicketQuery) -> ViewOutcome<TicketListPage> {
    attempt!(vc.authorize(Page::TicketList));

    let tickets = attempt!(vc.fetch(vc.backend.list_tickets()).await, fetch "Failed to load tickets");
    let tickets = query.apply(&vc.auth, tickets, vc.now);

    let feedback: HashMap<TicketId, FeedbackState> = if needs_feedback_probe(vc.auth.role) {
        probe_feedback(vc.backend, &tickets, &vc.cancel).await
    } else {
        HashMap::new()
    };
    if vc.cancel.is_cancelled() {
        return ViewOutcome::Cancelled;
    }

    let role = vc.auth.role;
    let columns = ticket_columns(role);
    let rows = tickets
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let state = feedback.get(&t.id).copied().unwrap_or_default();
            TicketRow::build(i + 1, t, &columns, role, state, vc.now)
        })
        .collect();

    ViewOutcome::Ready(TicketListPage {
        role,
        query,
        columns,
        rows,
    })
}

/// Engineers seen on the visible tickets, for picking an assignee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineerDirectory {
    pub engineers: Vec<UserRef>,
}

impl Tabular for EngineerDirectory {
    fn headers(&self) -> Vec<String> {
        vec!["ID".into(), "Name".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.engineers
            .iter()
            .map(|e| vec![e.id.to_string(), e.display_name()])
            .collect()
    }
}

pub async fn engineer_picker(vc: &ViewContext<'_>) -> ViewOutcome<EngineerDirectory> {
    attempt!(vc.authorize(Page::TicketList));
    let tickets = attempt!(vc.fetch(vc.backend.list_tickets()).await, fetch "Failed to load engineers");
    let visible: Vec<&Ticket> = tickets.iter().filter(|t| vc.auth.can_see(t)).collect();
    ViewOutcome::Ready(EngineerDirectory {
        engineers: engineer_directory(visible),
    })
}
