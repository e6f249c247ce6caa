//! Authentication context handed to every view

use crate::domain::{Role, Ticket, UserId};
use crate::error::{PolicyError, PolicyResult};
use serde::{Deserialize, Serialize};

/// Who is looking. Issued at login, dropped at logout, and passed
/// explicitly into each view; views never look it up themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether the ticket falls inside this user's role scope: own tickets
    /// for customers, assigned tickets for engineers, everything otherwise.
    pub fn can_see(&self, ticket: &Ticket) -> bool {
        match self.role {
            Role::Customer => ticket.customer_id() == Some(self.user_id),
            Role::Engineer => ticket.engineer_id() == Some(self.user_id),
            Role::Agent | Role::Admin => true,
        }
    }

    /// [`can_see`](Self::can_see) as a policy check.
    pub fn ensure_visible(&self, ticket: &Ticket) -> PolicyResult<()> {
        if self.can_see(ticket) {
            Ok(())
        } else {
            Err(PolicyError::OutOfScope {
                ticket: ticket.id,
                role: self.role,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TicketStatus, UserRef};

    #[test]
    fn test_scope_by_role() {
        let mut ticket = Ticket::new(1, TicketStatus::Open);
        ticket.customer = Some(UserRef::new(10));
        ticket.assigned_engineer = Some(UserRef::new(20));

        assert!(AuthContext::new(10, Role::Customer).can_see(&ticket));
        assert!(!AuthContext::new(11, Role::Customer).can_see(&ticket));
        assert!(AuthContext::new(20, Role::Engineer).can_see(&ticket));
        assert!(!AuthContext::new(10, Role::Engineer).can_see(&ticket));
        assert!(AuthContext::new(99, Role::Agent).can_see(&ticket));
        assert!(AuthContext::new(99, Role::Admin).can_see(&ticket));
    }

    #[test]
    fn test_ensure_visible_names_ticket() {
        let mut ticket = Ticket::new(5, TicketStatus::Open);
        ticket.customer = Some(UserRef::new(10));

        assert!(AuthContext::new(10, Role::Customer).ensure_visible(&ticket).is_ok());
        assert_eq!(
            AuthContext::new(11, Role::Customer).ensure_visible(&ticket),
            Err(PolicyError::OutOfScope {
                ticket: ticket.id,
                role: Role::Customer,
            })
        );
    }
}
