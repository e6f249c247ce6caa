//! Request bodies, camelCase on the wire

use netdesk_core::domain::feedback::validate_rating;
use netdesk_core::{
    DomainError, IssueCategory, Priority, Severity, Ticket, TicketStatus, UserId,
};
use serde::{Deserialize, Serialize};

/// `POST /api/tickets/create`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    pub customer_id: UserId,
    pub description: String,
    pub issue_category: IssueCategory,
}

impl CreateTicketRequest {
    /// Build a request, rejecting a blank description.
    pub fn new(
        customer_id: UserId,
        description: impl Into<String>,
        issue_category: IssueCategory,
    ) -> Result<Self, DomainError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(DomainError::Validation("description must not be empty".into()));
        }
        Ok(Self {
            customer_id,
            description: description.trim().to_string(),
            issue_category,
        })
    }
}

/// `PUT /api/tickets/{id}/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: TicketStatus,
    pub performed_by_user_id: UserId,
}

impl StatusUpdateRequest {
    /// Move `ticket` to `next`, refusing anything but a forward transition.
    pub fn advance(ticket: &Ticket, next: TicketStatus, performed_by: UserId) -> Result<Self, DomainError> {
        if !ticket.status.can_advance_to(&next) {
            return Err(DomainError::Validation(format!(
                "ticket {} cannot move from {} to {}",
                ticket.id, ticket.status, next
            )));
        }
        Ok(Self {
            status: next,
            performed_by_user_id: performed_by,
        })
    }
}

/// `PUT /api/tickets/{id}/assign`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub engineer_id: UserId,
    pub performed_by: UserId,
}

/// `PUT /api/tickets/{id}/priority-severity`
///
/// Both fields always travel together, so setting one re-sends the
/// ticket's current value of the other; a set value is never cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritySeverityRequest {
    pub priority: Option<Priority>,
    pub severity: Option<Severity>,
    pub performed_by_user_id: UserId,
}

impl PrioritySeverityRequest {
    pub fn set_priority(ticket: &Ticket, priority: Priority, performed_by: UserId) -> Self {
        Self {
            priority: Some(priority),
            severity: ticket.severity,
            performed_by_user_id: performed_by,
        }
    }

    pub fn set_severity(ticket: &Ticket, severity: Severity, performed_by: UserId) -> Self {
        Self {
            priority: ticket.priority,
            severity: Some(severity),
            performed_by_user_id: performed_by,
        }
    }
}

/// `POST /api/feedback/ticket/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub customer_id: UserId,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl FeedbackRequest {
    pub fn new(customer_id: UserId, rating: u8, comment: Option<String>) -> Result<Self, DomainError> {
        Ok(Self {
            customer_id,
            rating: validate_rating(rating)?,
            comment: comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_rejects_blank_description() {
        assert!(CreateTicketRequest::new(1, "   ", IssueCategory::Network).is_err());
        let req = CreateTicketRequest::new(1, " Router down ", IssueCategory::Hardware).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"customerId": 1, "description": "Router down", "issueCategory": "Hardware"})
        );
    }

    #[test]
    fn test_priority_keeps_existing_severity() {
        let mut ticket = Ticket::new(5, TicketStatus::Open);
        ticket.severity = Some(Severity::Major);
        let req = PrioritySeverityRequest::set_priority(&ticket, Priority::High, 4);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"priority": "HIGH", "severity": "MAJOR", "performedByUserId": 4})
        );

        let fresh = Ticket::new(6, TicketStatus::Open);
        let req = PrioritySeverityRequest::set_severity(&fresh, Severity::Minor, 4);
        assert_eq!(serde_json::to_value(&req).unwrap()["priority"], serde_json::Value::Null);
    }

    #[test]
    fn test_status_update_wire_shape() {
        let req = StatusUpdateRequest {
            status: TicketStatus::Closed,
            performed_by_user_id: 1,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"status": "CLOSED", "performedByUserId": 1})
        );
    }

    #[test]
    fn test_status_update_only_moves_forward() {
        let resolved = Ticket::new(3, TicketStatus::Resolved);
        let req = StatusUpdateRequest::advance(&resolved, TicketStatus::Closed, 1).unwrap();
        assert_eq!(req.status, TicketStatus::Closed);

        assert!(StatusUpdateRequest::advance(&resolved, TicketStatus::Resolved, 1).is_err());
        assert!(StatusUpdateRequest::advance(&resolved, TicketStatus::InProgress, 1).is_err());
        let odd = Ticket::new(4, TicketStatus::Unknown("ON_HOLD".into()));
        assert!(StatusUpdateRequest::advance(&odd, TicketStatus::Closed, 1).is_err());
    }

    #[test]
    fn test_feedback_request_validates() {
        assert!(FeedbackRequest::new(7, 9, None).is_err());
        let req = FeedbackRequest::new(7, 4, Some("  ".into())).unwrap();
        assert_eq!(req.comment, None);
    }
}
