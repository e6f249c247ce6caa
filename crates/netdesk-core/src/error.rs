//! Error types for netdesk core

use crate::domain::{Role, TicketId, TicketStatus};
use crate::policy::{Page, TicketAction};
use thiserror::Error;

/// Refusals produced by the role policy.
///
/// These never reach the backend: a view that gets one renders the
/// unauthorized (or action-refused) message instead of calling the API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The role may not open this page at all
    #[error("you are not authorized to view {page} as {role}")]
    PageForbidden { page: Page, role: Role },

    /// The role/status combination does not offer this action
    #[error("{action} is not available to {role} on a {status} ticket")]
    ActionNotPermitted {
        action: TicketAction,
        role: Role,
        status: TicketStatus,
    },

    /// Closing requires customer feedback on file
    #[error("feedback required before ticket {0} can be closed")]
    FeedbackRequired(TicketId),

    /// The ticket lies outside the user's role scope
    #[error("ticket {ticket} is not visible to this {role}")]
    OutOfScope { ticket: TicketId, role: Role },

    /// Feedback already on file for this ticket
    #[error("feedback already submitted for ticket {0}")]
    FeedbackAlreadySubmitted(TicketId),
}

/// Errors raised while parsing or validating domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unknown role name
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Unknown ticket-list bucket
    #[error("unknown ticket status filter: {0}")]
    UnknownBucket(String),

    /// Unknown enum value for a named field
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Input failed validation
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Result type for policy checks
pub type PolicyResult<T> = Result<T, PolicyError>;
