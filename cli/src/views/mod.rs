//! View renderers
//!
//! A view checks page access, fetches what it needs through a
//! [`TicketBackend`], applies the shared policy/classifier/aggregator from
//! `netdesk-core`, and returns a [`ViewOutcome`] holding plain data. Drawing
//! that data is left to [`crate::output`].

/// Unwrap a `Result` inside a view, returning the outcome on error.
///
/// Defined ahead of the submodules so they pick it up by textual scope.
macro_rules! attempt {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return e.into(),
        }
    };
    ($expr:expr, fetch $context:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return $crate::views::ViewOutcome::from_fetch_error(e, $context),
        }
    };
    ($expr:expr, write $fallback:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => return $crate::views::ViewOutcome::from_write_error(e, $fallback),
        }
    };
}

pub mod actions;
pub mod create;
pub mod dashboard;
pub mod feedback;
pub mod history;
pub mod nav;
pub mod summary;
pub mod tickets;

use netdesk_client::{with_cancel, CancellationToken, ClientError, ClientResult, TicketBackend};
use netdesk_core::{authorize_page, AuthContext, DomainError, Page, PolicyError, Timestamp};
use std::future::Future;

/// Everything a view is handed. Views read no ambient state.
pub struct ViewContext<'a> {
    pub auth: AuthContext,
    pub backend: &'a dyn TicketBackend,
    pub cancel: CancellationToken,
    pub now: Timestamp,
}

impl<'a> ViewContext<'a> {
    pub fn new(auth: AuthContext, backend: &'a dyn TicketBackend, cancel: CancellationToken) -> Self {
        Self {
            auth,
            backend,
            cancel,
            now: chrono::Utc::now(),
        }
    }

    /// Pin the clock, for deterministic SLA output.
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    pub fn authorize(&self, page: Page) -> Result<(), PolicyError> {
        authorize_page(self.auth.role, page)
    }

    /// Run a backend call under this view's cancellation token.
    pub async fn fetch<T, F>(&self, request: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        with_cancel(&self.cancel, request).await
    }
}

/// What a view produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOutcome<T> {
    Ready(T),
    /// Refused by the role policy before any backend call
    Denied(PolicyError),
    /// A fetch or write failed; `alert` is shown to the user
    Failed { alert: String },
    /// The view was torn down mid-request; nothing is rendered
    Cancelled,
}

impl<T> ViewOutcome<T> {
    pub fn failed(alert: impl Into<String>) -> Self {
        ViewOutcome::Failed { alert: alert.into() }
    }

    /// Fetch failures render as `"<context>: <error>"`.
    pub fn from_fetch_error(err: ClientError, context: &str) -> Self {
        if err.is_cancelled() {
            return ViewOutcome::Cancelled;
        }
        tracing::warn!(error = %err, "{context}");
        ViewOutcome::failed(format!("{context}: {err}"))
    }

    /// Write failures prefer the backend's own message over `fallback`.
    pub fn from_write_error(err: ClientError, fallback: &str) -> Self {
        if err.is_cancelled() {
            return ViewOutcome::Cancelled;
        }
        tracing::warn!(error = %err, "write rejected");
        ViewOutcome::failed(err.backend_message().unwrap_or(fallback))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewOutcome<U> {
        match self {
            ViewOutcome::Ready(v) => ViewOutcome::Ready(f(v)),
            ViewOutcome::Denied(e) => ViewOutcome::Denied(e),
            ViewOutcome::Failed { alert } => ViewOutcome::Failed { alert },
            ViewOutcome::Cancelled => ViewOutcome::Cancelled,
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            ViewOutcome::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ViewOutcome::Denied(PolicyError::PageForbidden { .. }))
    }
}

impl<T> From<PolicyError> for ViewOutcome<T> {
    fn from(err: PolicyError) -> Self {
        tracing::debug!(error = %err, "denied by role policy");
        ViewOutcome::Denied(err)
    }
}

impl<T> From<DomainError> for ViewOutcome<T> {
    fn from(err: DomainError) -> Self {
        ViewOutcome::failed(err.to_string())
    }
}
