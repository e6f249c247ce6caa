//! Ticket Classifier
//!
//! Derives the display bucket and SLA state of a ticket at a given
//! instant. Once a ticket leaves IN_PROGRESS the backend's `slaBreached`
//! flag is authoritative; the due time is never re-compared, otherwise a
//! ticket resolved before its deadline would read as breached afterwards.

use crate::domain::{Ticket, TicketStatus, Timestamp};
use crate::error::DomainError;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display category of a ticket, distinct from the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisplayBucket {
    Open,
    InProgress,
    Resolved,
    Closed,
    SlaActive,
    SlaMet,
    SlaBreached,
}

impl DisplayBucket {
    pub const ALL: [DisplayBucket; 7] = [
        DisplayBucket::Open,
        DisplayBucket::InProgress,
        DisplayBucket::Resolved,
        DisplayBucket::Closed,
        DisplayBucket::SlaActive,
        DisplayBucket::SlaMet,
        DisplayBucket::SlaBreached,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayBucket::Open => "OPEN",
            DisplayBucket::InProgress => "IN_PROGRESS",
            DisplayBucket::Resolved => "RESOLVED",
            DisplayBucket::Closed => "CLOSED",
            DisplayBucket::SlaActive => "SLA_ACTIVE",
            DisplayBucket::SlaMet => "SLA_MET",
            DisplayBucket::SlaBreached => "SLA_BREACHED",
        }
    }

    /// Status bucket for a stored status.
    pub fn for_status(status: &TicketStatus) -> Option<Self> {
        match status {
            TicketStatus::Open => Some(DisplayBucket::Open),
            TicketStatus::InProgress => Some(DisplayBucket::InProgress),
            TicketStatus::Resolved => Some(DisplayBucket::Resolved),
            TicketStatus::Closed => Some(DisplayBucket::Closed),
            TicketStatus::Unknown(_) => None,
        }
    }

    /// Membership test behind the `status` list filter. SLA buckets only
    /// ever contain tickets that carry a due time.
    pub fn matches(&self, ticket: &Ticket, now: Timestamp) -> bool {
        match self {
            DisplayBucket::Open
            | DisplayBucket::InProgress
            | DisplayBucket::Resolved
            | DisplayBucket::Closed => DisplayBucket::for_status(&ticket.status) == Some(*self),
            DisplayBucket::SlaActive => matches!(
                ticket.sla_due_time,
                Some(due) if ticket.status == TicketStatus::InProgress && due > now
            ),
            DisplayBucket::SlaBreached => ticket.sla_due_time.is_some() && ticket.sla_breached,
            DisplayBucket::SlaMet => {
                ticket.sla_due_time.is_some() && ticket.status.is_finished() && !ticket.sla_breached
            }
        }
    }
}

impl fmt::Display for DisplayBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayBucket {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownBucket(s.to_string()))
    }
}

/// SLA column value for one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlaDisplay {
    /// No clock shown ("–")
    NotApplicable,
    /// Deadline ahead
    Active {
        #[serde(rename = "remaining_secs", with = "duration_secs")]
        remaining: Duration,
    },
    /// Finished within the deadline
    Met,
    /// Deadline missed
    Breached,
}

impl SlaDisplay {
    /// Remaining time in hours, rounded to one decimal. `None` unless active.
    pub fn remaining_hours(&self) -> Option<f64> {
        match self {
            SlaDisplay::Active { remaining } => {
                let hours = remaining.num_seconds() as f64 / 3600.0;
                Some((hours * 10.0).round() / 10.0)
            }
            _ => None,
        }
    }
}

impl fmt::Display for SlaDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlaDisplay::NotApplicable => f.write_str("–"),
            SlaDisplay::Active { .. } => {
                write!(f, "{:.1} h", self.remaining_hours().unwrap_or_default())
            }
            SlaDisplay::Met => f.write_str("met"),
            SlaDisplay::Breached => f.write_str("breached"),
        }
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        i64::deserialize(d).map(Duration::seconds)
    }
}

/// Result of classifying one ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// `None` when the stored status is not one we recognize
    pub bucket: Option<DisplayBucket>,
    pub sla: SlaDisplay,
}

/// Classify a ticket at `now`.
pub fn classify(ticket: &Ticket, now: Timestamp) -> Classification {
    let bucket = DisplayBucket::for_status(&ticket.status);

    let sla = match (&ticket.status, ticket.sla_due_time) {
        (_, None) => SlaDisplay::NotApplicable,
        (TicketStatus::Open, Some(_)) => SlaDisplay::NotApplicable,
        (TicketStatus::InProgress, Some(due)) if now < due => SlaDisplay::Active { remaining: due - now },
        (TicketStatus::InProgress, Some(_)) => SlaDisplay::Breached,
        (TicketStatus::Resolved | TicketStatus::Closed, Some(_)) if ticket.sla_breached => {
            SlaDisplay::Breached
        }
        (TicketStatus::Resolved | TicketStatus::Closed, Some(_)) => SlaDisplay::Met,
        (TicketStatus::Unknown(_), Some(_)) => SlaDisplay::NotApplicable,
    };

    Classification { bucket, sla }
}

/// Aggregate SLA buckets over a ticket set at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaCounts {
    pub active: usize,
    pub met: usize,
    pub breached: usize,
}

impl SlaCounts {
    pub fn tally<'a>(tickets: impl IntoIterator<Item = &'a Ticket>, now: Timestamp) -> Self {
        tickets.into_iter().fold(Self::default(), |mut counts, t| {
            if DisplayBucket::SlaActive.matches(t, now) {
                counts.active += 1;
            }
            if DisplayBucket::SlaMet.matches(t, now) {
                counts.met += 1;
            }
            if DisplayBucket::SlaBreached.matches(t, now) {
                counts.breached += 1;
            }
            counts
        })
    }
}
