//! Ticket-list filtering
//!
//! Role scope first, then the optional `status` / `customerId` /
//! `engineerId` parameters, all combined with AND.

use crate::classifier::DisplayBucket;
use crate::domain::{Ticket, Timestamp, UserId};
use crate::session::AuthContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DisplayBucket>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer_id: Option<UserId>,
}

impl TicketQuery {
    pub fn with_status(mut self, status: DisplayBucket) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_customer(mut self, customer_id: UserId) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    pub fn with_engineer(mut self, engineer_id: UserId) -> Self {
        self.engineer_id = Some(engineer_id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.customer_id.is_none() && self.engineer_id.is_none()
    }

    /// Whether one ticket passes role scope and every set parameter.
    pub fn matches(&self, ctx: &AuthContext, ticket: &Ticket, now: Timestamp) -> bool {
        ctx.can_see(ticket)
            && self.customer_id.map_or(true, |id| ticket.customer_id() == Some(id))
            && self.engineer_id.map_or(true, |id| ticket.engineer_id() == Some(id))
            && self.status.map_or(true, |bucket| bucket.matches(ticket, now))
    }

    /// Keep the matching tickets, preserving backend order.
    pub fn apply(&self, ctx: &AuthContext, tickets: Vec<Ticket>, now: Timestamp) -> Vec<Ticket> {
        let before = tickets.len();
        let kept: Vec<Ticket> = tickets
            .into_iter()
            .filter(|t| self.matches(ctx, t, now))
            .collect();
        tracing::debug!(before, after = kept.len(), role = %ctx.role, "filtered ticket list");
        kept
    }

    /// Command-line flags that reproduce this query, for drill-down hints.
    pub fn to_cli_args(&self) -> String {
        let mut args = Vec::new();
        if let Some(status) = self.status {
            args.push(format!("--status {status}"));
        }
        if let Some(id) = self.customer_id {
            args.push(format!("--customer-id {id}"));
        }
        if let Some(id) = self.engineer_id {
            args.push(format!("--engineer-id {id}"));
        }
        args.join(" ")
    }
}
