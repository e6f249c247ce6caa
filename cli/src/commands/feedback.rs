//! Feedback commands

use super::finish;
use crate::FeedbackCommands;
use anyhow::Result;
use netdesk::output::OutputFormat;
use netdesk::views::feedback;
use netdesk::ViewContext;
use netdesk_core::TicketId;
use std::process::ExitCode;

pub async fn handle(action: FeedbackCommands, vc: &ViewContext<'_>, format: OutputFormat) -> Result<ExitCode> {
    match action {
        FeedbackCommands::Show { id } => {
            finish(feedback::show_feedback(vc, TicketId::new(id)).await, format, None)
        }
        FeedbackCommands::Submit { id, rating, comment } => {
            let id = TicketId::new(id);
            let outcome = feedback::submit_feedback(vc, id, rating, comment).await;
            finish(outcome, format, Some(format!("Feedback recorded for ticket {id}")))
        }
    }
}
