//! Ticket aggregate as served by the backend

use crate::domain::timestamp::{self, Timestamp};
use crate::domain::user::{UserId, UserRef};
use crate::error::DomainError;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric ticket id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for TicketId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Lifecycle status. Forward-only: OPEN → IN_PROGRESS → RESOLVED → CLOSED.
///
/// Matched case-insensitively on the wire. Anything else is kept verbatim
/// in `Unknown` so a single odd row does not sink a whole list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    Unknown(String),
}

impl TicketStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Resolved => "RESOLVED",
            TicketStatus::Closed => "CLOSED",
            TicketStatus::Unknown(raw) => raw,
        }
    }

    /// Position in the lifecycle; `None` for unrecognized statuses.
    fn rank(&self) -> Option<u8> {
        match self {
            TicketStatus::Open => Some(0),
            TicketStatus::InProgress => Some(1),
            TicketStatus::Resolved => Some(2),
            TicketStatus::Closed => Some(3),
            TicketStatus::Unknown(_) => None,
        }
    }

    /// True for OPEN and IN_PROGRESS, the statuses an agent may triage.
    pub fn is_active(&self) -> bool {
        matches!(self, TicketStatus::Open | TicketStatus::InProgress)
    }

    /// True for RESOLVED and CLOSED.
    pub fn is_finished(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// Whether moving to `next` is a strictly forward transition.
    pub fn can_advance_to(&self, next: &TicketStatus) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }
}

impl From<String> for TicketStatus {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => TicketStatus::Open,
            "IN_PROGRESS" => TicketStatus::InProgress,
            "RESOLVED" => TicketStatus::Resolved,
            "CLOSED" => TicketStatus::Closed,
            _ => TicketStatus::Unknown(raw),
        }
    }
}

impl From<TicketStatus> for String {
    fn from(status: TicketStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| DomainError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    })
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
    Text(String),
    Other(IgnoredAny),
}

/// `deserialize_with` helper for optional wire enums on a ticket row.
///
/// Values that do not parse read as unset instead of failing the row.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = match Option::<RawField>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawField::Other(_)) => {
            tracing::debug!("non-string enum value on ticket, ignoring");
            return Ok(None);
        }
        Some(RawField::Text(raw)) => raw,
    };
    Ok(raw.parse().map_err(|e| tracing::debug!(error = %e, "ignoring ticket field")).ok())
}

wire_enum!(
    /// Ticket priority, set once by an agent.
    Priority, "priority", {
        Low => "LOW",
        Medium => "MEDIUM",
        High => "HIGH",
    }
);

wire_enum!(
    /// Ticket severity, set once by an agent.
    Severity, "severity", {
        Minor => "MINOR",
        Major => "MAJOR",
        Critical => "CRITICAL",
    }
);

wire_enum!(
    /// What the customer says the problem is about.
    IssueCategory, "issue category", {
        Hardware => "Hardware",
        Software => "Software",
        Network => "Network",
        Billing => "Billing",
        Account => "Account",
    }
);

/// A support ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: TicketId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient")]
    pub issue_category: Option<IssueCategory>,
    pub status: TicketStatus,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "lenient")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub sla_due_time: Option<Timestamp>,
    #[serde(default)]
    pub sla_breached: bool,
    #[serde(default)]
    pub customer: Option<UserRef>,
    #[serde(default)]
    pub assigned_engineer: Option<UserRef>,
}

impl Ticket {
    /// Bare ticket with the given id and status; the rest is empty.
    pub fn new(id: impl Into<TicketId>, status: TicketStatus) -> Self {
        Self {
            id: id.into(),
            ticket_code: None,
            description: String::new(),
            issue_category: None,
            status,
            priority: None,
            severity: None,
            created_at: None,
            sla_due_time: None,
            sla_breached: false,
            customer: None,
            assigned_engineer: None,
        }
    }

    pub fn customer_id(&self) -> Option<UserId> {
        self.customer.as_ref().map(|c| c.id)
    }

    pub fn engineer_id(&self) -> Option<UserId> {
        self.assigned_engineer.as_ref().map(|e| e.id)
    }

    /// Human-facing identifier: the ticket code when present.
    pub fn label(&self) -> String {
        self.ticket_code
            .clone()
            .unwrap_or_else(|| self.id.value().to_string())
    }
}
