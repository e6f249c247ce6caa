//! Customer feedback on a resolved ticket

use crate::domain::timestamp::{self, Timestamp};
use crate::domain::ticket::TicketId;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Lowest accepted rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted rating
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(default)]
    pub ticket_id: Option<TicketId>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_opt")]
    pub submitted_at: Option<Timestamp>,
}

/// Check a rating before it is sent.
pub fn validate_rating(rating: u8) -> Result<u8, DomainError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(DomainError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}
