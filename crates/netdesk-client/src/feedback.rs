//! Feedback-existence probes
//!
//! One request per RESOLVED ticket, all in flight at once. Only existence
//! is checked; the feedback body is never decoded here. A failed probe
//! means "no feedback on file" for that ticket only and is never surfaced
//! to the user.

use crate::backend::TicketBackend;
use crate::cancel::with_cancel;
use futures::future::join_all;
use netdesk_core::{FeedbackState, Ticket, TicketId, TicketStatus};
use std::collections::HashMap;
use tokio_util::sync::CancellationToken;

/// Probe feedback for every RESOLVED ticket in `tickets`.
///
/// Tickets in other statuses are absent from the map, which callers read
/// as [`FeedbackState::Unknown`].
pub async fn probe_feedback<B>(
    backend: &B,
    tickets: &[Ticket],
    cancel: &CancellationToken,
) -> HashMap<TicketId, FeedbackState>
where
    B: TicketBackend + ?Sized,
{
    let probes = tickets
        .iter()
        .filter(|t| t.status == TicketStatus::Resolved)
        .map(|t| async move {
            let state = match with_cancel(cancel, backend.feedback_exists(t.id)).await {
                Ok(on_file) => FeedbackState::from(on_file),
                Err(e) => {
                    tracing::debug!(ticket = %t.id, error = %e, "feedback probe failed, assuming none");
                    FeedbackState::Absent
                }
            };
            (t.id, state)
        });

    let results: HashMap<_, _> = join_all(probes).await.into_iter().collect();
    tracing::debug!(probed = results.len(), "feedback probes complete");
    results
}
