//! The seam between views and the backend

use crate::error::ClientResult;
use crate::requests::{
    AssignRequest, CreateTicketRequest, FeedbackRequest, PrioritySeverityRequest,
    StatusUpdateRequest,
};
use async_trait::async_trait;
use netdesk_core::{Feedback, HistoryEvent, Ticket, TicketId};

/// Operations the ticketing backend exposes.
#[async_trait]
pub trait TicketBackend: Send + Sync {
    /// `GET /api/tickets`
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>>;

    /// `GET /api/tickets/{id}`
    async fn get_ticket(&self, id: TicketId) -> ClientResult<Ticket>;

    /// `GET /api/tickets/{id}/history`
    async fn ticket_history(&self, id: TicketId) -> ClientResult<Vec<HistoryEvent>>;

    /// `POST /api/tickets/create`
    async fn create_ticket(&self, request: &CreateTicketRequest) -> ClientResult<()>;

    /// `PUT /api/tickets/{id}/status`
    async fn update_status(&self, id: TicketId, request: &StatusUpdateRequest) -> ClientResult<()>;

    /// `PUT /api/tickets/{id}/assign`
    async fn assign_engineer(&self, id: TicketId, request: &AssignRequest) -> ClientResult<()>;

    /// `PUT /api/tickets/{id}/priority-severity`
    async fn set_priority_severity(
        &self,
        id: TicketId,
        request: &PrioritySeverityRequest,
    ) -> ClientResult<()>;

    /// `GET /api/feedback/ticket/{id}`; a 404 means none on file
    async fn get_feedback(&self, id: TicketId) -> ClientResult<Feedback>;

    /// Whether feedback is on file, without reading it. Only a 404 is a
    /// definite no; other failures are returned as errors.
    async fn feedback_exists(&self, id: TicketId) -> ClientResult<bool> {
        match self.get_feedback(id).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// `POST /api/feedback/ticket/{id}`
    async fn submit_feedback(&self, id: TicketId, request: &FeedbackRequest) -> ClientResult<()>;
}
