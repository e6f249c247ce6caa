//! netdesk Core - shared rules for the ticketing front-end
//!
//! Every view in the `netdesk` binary consumes the same three pieces of
//! logic from this crate instead of re-deriving them per page:
//!
//! - **Role Policy** ([`policy`]): which navigation targets, ticket-list
//!   columns and row actions a role gets, and which pages it may open.
//! - **Ticket Classifier** ([`classifier`]): status bucket and SLA display
//!   for one ticket at a point in time, plus aggregate SLA buckets.
//! - **Aggregator** ([`aggregate`]): per-customer and per-engineer
//!   summaries and dashboard counters.
//!
//! # Architecture
//!
//! ```text
//! view ──► authorize_page ──► fetch (netdesk-client)
//!                                 │
//!            ┌────────────────────┼────────────────────┐
//!            ▼                    ▼                    ▼
//!      TicketQuery::apply   classify(ticket, now)   summarize_by_*
//!            │                    │                    │
//!            └──────────► offered_actions ◄────────────┘
//!                                 │
//!                               render
//! ```
//!
//! All permission checks here are a UX convenience. The backend remains
//! the only authorization boundary.

#![warn(clippy::all)]

pub mod aggregate;
pub mod classifier;
pub mod domain;
pub mod error;
pub mod policy;
pub mod query;
pub mod session;

pub use aggregate::{
    engineer_directory, summarize_by_customer, summarize_by_engineer, CustomerSummary,
    EngineerSummary, StatusCounts,
};
pub use classifier::{classify, Classification, DisplayBucket, SlaCounts, SlaDisplay};
pub use domain::*;
pub use error::*;
pub use policy::{
    authorize_action, authorize_page, navigation, offered_actions, ticket_columns, Column,
    FeedbackState, NavTarget, OfferedAction, Page, TicketAction,
};
pub use query::TicketQuery;
pub use session::AuthContext;
