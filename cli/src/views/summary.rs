//! Admin summaries by customer and by engineer

use super::{ViewContext, ViewOutcome};
use crate::output::Tabular;
use netdesk_core::{
    summarize_by_customer, summarize_by_engineer, CustomerSummary, EngineerSummary, Page,
    TicketQuery,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerSummaryPage {
    pub customers: Vec<CustomerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineerSummaryPage {
    pub engineers: Vec<EngineerSummary>,
}

fn drill_down(query: TicketQuery) -> String {
    format!("netdesk tickets list {}", query.to_cli_args())
}

impl Tabular for CustomerSummaryPage {
    fn headers(&self) -> Vec<String> {
        ["Customer", "Total", "Open", "Resolved", "Breached", "Tickets"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.customers
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.total.to_string(),
                    c.open.to_string(),
                    c.resolved.to_string(),
                    c.breached.to_string(),
                    drill_down(TicketQuery::default().with_customer(c.id)),
                ]
            })
            .collect()
    }
}

impl Tabular for EngineerSummaryPage {
    fn headers(&self) -> Vec<String> {
        ["Engineer", "Assigned", "In Progress", "Resolved", "Breached", "Tickets"]
            .map(String::from)
            .to_vec()
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.engineers
            .iter()
            .map(|e| {
                vec![
                    e.name.clone(),
                    e.assigned.to_string(),
                    e.in_progress.to_string(),
                    e.resolved.to_string(),
                    e.breached.to_string(),
                    drill_down(TicketQuery::default().with_engineer(e.id)),
                ]
            })
            .collect()
    }
}

pub async fn customer_summary(vc: &ViewContext<'_>) -> ViewOutcome<CustomerSummaryPage> {
    attempt!(vc.authorize(Page::CustomerSummary));
    let tickets = attempt!(vc.fetch(vc.backend.list_tickets()).await, fetch "Failed to load tickets");
    ViewOutcome::Ready(CustomerSummaryPage {
        customers: summarize_by_customer(&tickets),
    })
}

pub async fn engineer_summary(vc: &ViewContext<'_>) -> ViewOutcome<EngineerSummaryPage> {
    attempt!(vc.authorize(Page::EngineerSummary));
    let tickets = attempt!(vc.fetch(vc.backend.list_tickets()).await, fetch "Failed to load tickets");
    ViewOutcome::Ready(EngineerSummaryPage {
        engineers: summarize_by_engineer(&tickets),
    })
}
