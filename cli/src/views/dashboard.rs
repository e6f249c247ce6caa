//! Role dashboards
//!
//! Counters over the tickets in the user's scope. Each card remembers the
//! list filter it drills into.

use super::{ViewContext, ViewOutcome};
use crate::output::Tabular;
use netdesk_core::{
    DisplayBucket, Page, Role, SlaCounts, StatusCounts, Ticket, TicketQuery,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub label: &'static str,
    pub count: usize,
    /// `None` for the total card
    pub drill_down: Option<DisplayBucket>,
}

impl DashboardCard {
    fn new(label: &'static str, count: usize, drill_down: Option<DisplayBucket>) -> Self {
        Self {
            label,
            count,
            drill_down,
        }
    }

    pub fn query(&self) -> TicketQuery {
        match self.drill_down {
            Some(bucket) => TicketQuery::default().with_status(bucket),
            None => TicketQuery::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub role: Role,
    pub cards: Vec<DashboardCard>,
}

impl Dashboard {
    pub fn count(&self, label: &str) -> Option<usize> {
        self.cards.iter().find(|c| c.label == label).map(|c| c.count)
    }
}

impl Tabular for Dashboard {
    fn headers(&self) -> Vec<String> {
        vec!["Tickets".into(), "Count".into(), "Open with".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.cards
            .iter()
            .map(|c| {
                let args = c.query().to_cli_args();
                let hint = if args.is_empty() {
                    "netdesk tickets list".to_string()
                } else {
                    format!("netdesk tickets list {args}")
                };
                vec![c.label.to_string(), c.count.to_string(), hint]
            })
            .collect()
    }
}

fn cards(role: Role, tickets: &[Ticket], now: netdesk_core::Timestamp) -> Vec<DashboardCard> {
    use DisplayBucket::*;
    let s = StatusCounts::tally(tickets);

    let mut cards = Vec::new();
    if role != Role::Engineer {
        cards.push(DashboardCard::new("Total", s.total, None));
        cards.push(DashboardCard::new("Open", s.open, Some(Open)));
    }
    cards.push(DashboardCard::new("In Progress", s.in_progress, Some(InProgress)));
    cards.push(DashboardCard::new("Resolved", s.resolved, Some(Resolved)));
    cards.push(DashboardCard::new("Closed", s.closed, Some(Closed)));

    if role == Role::Admin {
        let sla = SlaCounts::tally(tickets, now);
        cards.push(DashboardCard::new("SLA Active", sla.active, Some(SlaActive)));
        cards.push(DashboardCard::new("SLA Met", sla.met, Some(SlaMet)));
        cards.push(DashboardCard::new("SLA Breached", sla.breached, Some(SlaBreached)));
    }
    cards
}

pub async fn dashboard(vc: &ViewContext<'_>) -> ViewOutcome<Dashboard> {
    attempt!(vc.authorize(Page::Dashboard));

    let tickets = attempt!(vc.fetch(vc.backend.list_tickets()).await, fetch "Failed to load dashboard");
    let scoped = TicketQuery::default().apply(&vc.auth, tickets, vc.now);

    ViewOutcome::Ready(Dashboard {
        role: vc.auth.role,
        cards: cards(vc.auth.role, &scoped, vc.now),
    })
}
