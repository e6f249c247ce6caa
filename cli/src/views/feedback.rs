//! Feedback: admins read it, customers submit it once

use super::actions::load_target;
use super::tickets::{ticket_list, TicketListPage};
use super::{ViewContext, ViewOutcome};
use crate::output::Tabular;
use netdesk_client::FeedbackRequest;
use netdesk_core::{Feedback, Page, TicketAction, TicketId, TicketQuery};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackPage {
    pub ticket_id: TicketId,
    /// `None` when the customer has not left any
    pub feedback: Option<Feedback>,
}

impl Tabular for FeedbackPage {
    fn headers(&self) -> Vec<String> {
        vec!["Ticket".into(), "Rating".into(), "Comment".into(), "Submitted".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.feedback
            .iter()
            .map(|f| {
                vec![
                    self.ticket_id.to_string(),
                    f.rating.map_or_else(|| "-".into(), |r| format!("{r}/5")),
                    f.comment.clone().unwrap_or_default(),
                    f.submitted_at
                        .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
                ]
            })
            .collect()
    }

    fn footer(&self) -> Vec<String> {
        if self.feedback.is_none() {
            vec![format!("No feedback on file for ticket {}", self.ticket_id)]
        } else {
            Vec::new()
        }
    }
}

pub async fn show_feedback(vc: &ViewContext<'_>, id: TicketId) -> ViewOutcome<FeedbackPage> {
    attempt!(vc.authorize(Page::FeedbackView));

    let feedback = match vc.fetch(vc.backend.get_feedback(id)).await {
        Ok(f) => Some(f),
        Err(e) if e.is_not_found() => None,
        Err(e) => return ViewOutcome::from_fetch_error(e, "Failed to load feedback"),
    };
    ViewOutcome::Ready(FeedbackPage {
        ticket_id: id,
        feedback,
    })
}

/// Submit feedback for one of the customer's RESOLVED tickets, then show
/// the refreshed list.
pub async fn submit_feedback(
    vc: &ViewContext<'_>,
    id: TicketId,
    rating: u8,
    comment: Option<String>,
) -> ViewOutcome<TicketListPage> {
    attempt!(vc.authorize(Page::FeedbackSubmit));
    let request = attempt!(FeedbackRequest::new(vc.auth.user_id, rating, comment));

    attempt!(load_target(vc, id, TicketAction::SubmitFeedback).await);

    attempt!(
        vc.fetch(vc.backend.submit_feedback(id, &request)).await,
        write "Failed to submit feedback"
    );
    ticket_list(vc, TicketQuery::default()).await
}
