//! Users and roles

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend user primary key.
pub type UserId = u64;

/// The single role a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Files tickets and leaves feedback
    Customer,
    /// Works assigned tickets to resolution
    Engineer,
    /// Triages: assigns engineers, sets priority and severity
    Agent,
    /// Supervises SLA compliance and closes resolved tickets
    Admin,
}

impl Role {
    /// Every role, in display order
    pub const ALL: [Role; 4] = [Role::Customer, Role::Engineer, Role::Agent, Role::Admin];

    /// Upper-case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Engineer => "ENGINEER",
            Role::Agent => "AGENT",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `admin`, `ADMIN`, ` ROLE_ADMIN ` and friends.
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        let name = normalized.strip_prefix("ROLE_").unwrap_or(&normalized);
        match name.trim() {
            "CUSTOMER" => Ok(Role::Customer),
            "ENGINEER" => Ok(Role::Engineer),
            "AGENT" => Ok(Role::Agent),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(DomainError::UnknownRole(s.to_string())),
        }
    }
}

/// Reference to a user as embedded in ticket and history payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserRef {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            name: None,
            username: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Name, then username, then email, then `user #<id>`. Blank values
    /// are skipped.
    pub fn display_name(&self) -> String {
        [&self.name, &self.username, &self.email]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("user #{}", self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_normalizes() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" ROLE_engineer ".parse::<Role>().unwrap(), Role::Engineer);
        assert_eq!("Agent".parse::<Role>().unwrap(), Role::Agent);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_name_preference() {
        let full = UserRef::new(1)
            .with_name("Ada")
            .with_username("ada")
            .with_email("ada@example.com");
        assert_eq!(full.display_name(), "Ada");

        let no_name = UserRef::new(2).with_username("bob").with_email("bob@example.com");
        assert_eq!(no_name.display_name(), "bob");

        let blank_name = UserRef::new(3).with_name("  ").with_email("c@example.com");
        assert_eq!(blank_name.display_name(), "c@example.com");

        assert_eq!(UserRef::new(4).display_name(), "user #4");
    }
}
