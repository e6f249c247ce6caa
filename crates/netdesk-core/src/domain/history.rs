//! Append-only ticket history

use crate::domain::timestamp::{self, Timestamp};
use crate::domain::user::UserRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of history event. Unrecognized actions are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HistoryAction {
    TicketCreated,
    EngineerAssigned,
    StatusChanged,
    PrioritySeverityUpdated,
    Other(String),
}

impl HistoryAction {
    pub fn as_str(&self) -> &str {
        match self {
            HistoryAction::TicketCreated => "TICKET_CREATED",
            HistoryAction::EngineerAssigned => "ENGINEER_ASSIGNED",
            HistoryAction::StatusChanged => "STATUS_CHANGED",
            HistoryAction::PrioritySeverityUpdated => "PRIORITY_SEVERITY_UPDATED",
            HistoryAction::Other(raw) => raw,
        }
    }
}

impl From<String> for HistoryAction {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TICKET_CREATED" => HistoryAction::TicketCreated,
            "ENGINEER_ASSIGNED" => HistoryAction::EngineerAssigned,
            "STATUS_CHANGED" => HistoryAction::StatusChanged,
            "PRIORITY_SEVERITY_UPDATED" => HistoryAction::PrioritySeverityUpdated,
            _ => HistoryAction::Other(raw),
        }
    }
}

impl From<HistoryAction> for String {
    fn from(action: HistoryAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a ticket's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(default)]
    pub id: Option<u64>,
    pub action: HistoryAction,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub action_time: Timestamp,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub performed_by: Option<UserRef>,
}

/// Sort events oldest first. Stable, so same-instant events keep the
/// backend's order.
pub fn chronological(mut events: Vec<HistoryEvent>) -> Vec<HistoryEvent> {
    events.sort_by_key(|e| e.action_time);
    events
}

/// The "assigned at" marker: earliest `ENGINEER_ASSIGNED` event.
pub fn assigned_at(events: &[HistoryEvent]) -> Option<Timestamp> {
    events
        .iter()
        .filter(|e| e.action == HistoryAction::EngineerAssigned)
        .map(|e| e.action_time)
        .min()
}
