//! Ticketing domain model
//!
//! Wire-compatible with the backend's camelCase JSON.

pub mod feedback;
pub mod history;
pub mod ticket;
pub mod timestamp;
pub mod user;

pub use feedback::Feedback;
pub use history::{HistoryAction, HistoryEvent};
pub use ticket::{IssueCategory, Priority, Severity, Ticket, TicketId, TicketStatus};
pub use timestamp::Timestamp;
pub use user::{Role, UserId, UserRef};
