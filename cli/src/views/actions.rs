//! Row actions that write to the backend
//!
//! Every write follows the same path: fetch the ticket, check the action
//! against the role policy, send the write, then re-fetch the whole list.
//! Nothing is patched locally.

use super::tickets::{ticket_list, TicketListPage};
use super::{ViewContext, ViewOutcome};
use netdesk_client::{
    probe_feedback, AssignRequest, ClientError, PrioritySeverityRequest, StatusUpdateRequest,
};
use netdesk_core::{
    authorize_action, FeedbackState, PolicyError, Priority, Severity, Ticket, TicketAction,
    TicketId, TicketQuery, TicketStatus, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketWrite {
    Assign { engineer_id: UserId },
    Priority(Priority),
    Severity(Severity),
    Resolve,
    Close,
}

impl TicketWrite {
    pub fn action(&self) -> TicketAction {
        match self {
            TicketWrite::Assign { .. } => TicketAction::AssignEngineer,
            TicketWrite::Priority(_) => TicketAction::SetPriority,
            TicketWrite::Severity(_) => TicketAction::SetSeverity,
            TicketWrite::Resolve => TicketAction::MarkResolved,
            TicketWrite::Close => TicketAction::Close,
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            TicketWrite::Assign { .. } => "engineer assigned",
            TicketWrite::Priority(_) => "priority set",
            TicketWrite::Severity(_) => "severity set",
            TicketWrite::Resolve => "marked resolved",
            TicketWrite::Close => "closed",
        }
    }

    /// Alert shown when the backend refuses without a message.
    fn fallback_alert(&self) -> &'static str {
        match self {
            TicketWrite::Assign { .. } => "Failed to assign engineer",
            TicketWrite::Priority(_) => "Failed to update priority",
            TicketWrite::Severity(_) => "Failed to update severity",
            TicketWrite::Resolve => "Failed to update status",
            TicketWrite::Close => "Feedback required",
        }
    }
}

/// Why a ticket could not be acted on.
#[derive(Debug)]
pub enum TargetError {
    Fetch(ClientError),
    Policy(PolicyError),
}

impl<T> From<TargetError> for ViewOutcome<T> {
    fn from(err: TargetError) -> Self {
        match err {
            TargetError::Fetch(e) => ViewOutcome::from_fetch_error(e, "Failed to load ticket"),
            TargetError::Policy(e) => e.into(),
        }
    }
}

/// Actions whose availability depends on feedback being on file.
fn gated_by_feedback(action: TicketAction) -> bool {
    matches!(action, TicketAction::Close | TicketAction::SubmitFeedback)
}

/// Fetch a ticket and check that the current user may perform `action` on it.
pub async fn load_target(
    vc: &ViewContext<'_>,
    id: TicketId,
    action: TicketAction,
) -> Result<Ticket, TargetError> {
    let ticket = vc
        .fetch(vc.backend.get_ticket(id))
        .await
        .map_err(TargetError::Fetch)?;

    vc.auth.ensure_visible(&ticket).map_err(TargetError::Policy)?;

    let feedback = if gated_by_feedback(action) && ticket.status == TicketStatus::Resolved {
        let probes = probe_feedback(vc.backend, std::slice::from_ref(&ticket), &vc.cancel).await;
        if vc.cancel.is_cancelled() {
            return Err(TargetError::Fetch(ClientError::Cancelled));
        }
        probes.get(&id).copied().unwrap_or_default()
    } else {
        FeedbackState::Unknown
    };

    authorize_action(&vc.auth, &ticket, action, feedback).map_err(TargetError::Policy)?;
    Ok(ticket)
}

/// Run one write and return the refreshed ticket list.
pub async fn perform(vc: &ViewContext<'_>, id: TicketId, write: TicketWrite) -> ViewOutcome<TicketListPage> {
    let ticket = attempt!(load_target(vc, id, write.action()).await);
    let user = vc.auth.user_id;
    let backend = vc.backend;

    let result = match write {
        TicketWrite::Assign { engineer_id } => {
            let req = AssignRequest {
                engineer_id,
                performed_by: user,
            };
            vc.fetch(backend.assign_engineer(id, &req)).await
        }
        TicketWrite::Priority(priority) => {
            let req = PrioritySeverityRequest::set_priority(&ticket, priority, user);
            vc.fetch(backend.set_priority_severity(id, &req)).await
        }
        TicketWrite::Severity(severity) => {
            let req = PrioritySeverityRequest::set_severity(&ticket, severity, user);
            vc.fetch(backend.set_priority_severity(id, &req)).await
        }
        TicketWrite::Resolve => {
            let req = attempt!(StatusUpdateRequest::advance(&ticket, TicketStatus::Resolved, user));
            vc.fetch(backend.update_status(id, &req)).await
        }
        TicketWrite::Close => {
            let req = attempt!(StatusUpdateRequest::advance(&ticket, TicketStatus::Closed, user));
            vc.fetch(backend.update_status(id, &req)).await
        }
    };
    let fallback = write.fallback_alert();
    attempt!(result, write fallback);

    tracing::info!(ticket = %id, action = %write.action(), "write accepted, refreshing list");
    ticket_list(vc, TicketQuery::default()).await
}
