//! Ticket detail and history

use super::{ViewContext, ViewOutcome};
use crate::output::Tabular;
use netdesk_core::domain::history::{assigned_at, chronological};
use netdesk_core::{
    classify, Classification, HistoryAction, HistoryEvent, Page, Role, Ticket, TicketId,
    Timestamp, UserRef,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub classification: Classification,
    pub history: Vec<HistoryEvent>,
    /// Only filled for engineers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<Timestamp>,
}

fn time(ts: Option<Timestamp>) -> String {
    ts.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
}

impl Tabular for TicketDetail {
    fn headers(&self) -> Vec<String> {
        vec!["Time".into(), "Action".into(), "By".into(), "Details".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.history
            .iter()
            .map(|e| {
                vec![
                    time(Some(e.action_time)),
                    e.action.to_string(),
                    e.performed_by
                        .as_ref()
                        .map_or_else(|| "-".into(), UserRef::display_name),
                    e.details.clone().unwrap_or_default(),
                ]
            })
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        let t = &self.ticket;
        let mut lines = vec![
            format!("Ticket {} ({})", t.label(), t.id),
            format!("Description: {}", t.description),
            format!("Status: {}", t.status),
            format!("Created: {}", time(t.created_at)),
            format!("SLA: {}", self.classification.sla),
        ];
        if let Some(at) = self.assigned_at {
            lines.push(format!("Assigned At: {}", time(Some(at))));
        }
        lines
    }
}

/// Ticket and history are fetched together; both must succeed.
pub async fn ticket_detail(vc: &ViewContext<'_>, id: TicketId) -> ViewOutcome<TicketDetail> {
    attempt!(vc.authorize(Page::TicketHistory));

    let (ticket, history) = attempt!(
        tokio::try_join!(
            vc.fetch(vc.backend.get_ticket(id)),
            vc.fetch(vc.backend.ticket_history(id)),
        ),
        fetch "Failed to load ticket history"
    );
    attempt!(vc.auth.ensure_visible(&ticket));

    let mut history = chronological(history);
    let mut marker = None;
    if vc.auth.role == Role::Engineer {
        history.retain(|e| e.action == HistoryAction::EngineerAssigned);
        marker = assigned_at(&history);
    }

    ViewOutcome::Ready(TicketDetail {
        classification: classify(&ticket, vc.now),
        ticket,
        history,
        assigned_at: marker,
    })
}
