//! netdesk Client - REST access to the ticketing backend
//!
//! [`ApiClient`] speaks the backend's REST surface. Views depend on the
//! [`TicketBackend`] trait rather than the concrete client so they can be
//! exercised against an in-memory backend.
//!
//! Every call a view makes goes through [`with_cancel`], so a view that is
//! torn down mid-request stops instead of rendering stale state.

#![warn(clippy::all)]

pub mod backend;
pub mod cancel;
pub mod client;
pub mod error;
pub mod feedback;
pub mod requests;

pub use backend::TicketBackend;
pub use cancel::with_cancel;
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use feedback::probe_feedback;
pub use requests::{
    AssignRequest, CreateTicketRequest, FeedbackRequest, PrioritySeverityRequest,
    StatusUpdateRequest,
};
pub use tokio_util::sync::CancellationToken;
