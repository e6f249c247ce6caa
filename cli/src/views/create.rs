//! Create ticket (customers only)

use super::tickets::{ticket_list, TicketListPage};
use super::{ViewContext, ViewOutcome};
use netdesk_client::CreateTicketRequest;
use netdesk_core::{IssueCategory, Page, TicketQuery};

/// File a ticket for the logged-in customer, then show their list.
pub async fn create_ticket(
    vc: &ViewContext<'_>,
    description: &str,
    category: Option<IssueCategory>,
) -> ViewOutcome<TicketListPage> {
    attempt!(vc.authorize(Page::CreateTicket));

    let Some(category) = category else {
        return ViewOutcome::failed("Please choose an issue category");
    };
    let request = attempt!(CreateTicketRequest::new(vc.auth.user_id, description, category));

    attempt!(
        vc.fetch(vc.backend.create_ticket(&request)).await,
        write "Failed to create ticket"
    );
    ticket_list(vc, TicketQuery::default()).await
}
