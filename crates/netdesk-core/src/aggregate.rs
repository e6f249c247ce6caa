//! Aggregator: per-entity summaries and dashboard counters
//!
//! Groups keep first-encounter order. Sorting is left to the caller.

use crate::domain::{Ticket, TicketStatus, UserId, UserRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-customer counters for the admin summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: UserId,
    pub name: String,
    pub total: usize,
    pub open: usize,
    /// RESOLVED or CLOSED
    pub resolved: usize,
    pub breached: usize,
}

/// Per-engineer load for the admin summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineerSummary {
    pub id: UserId,
    pub name: String,
    pub assigned: usize,
    pub in_progress: usize,
    /// RESOLVED or CLOSED
    pub resolved: usize,
    pub breached: usize,
}

/// Insertion-ordered grouping keyed by user id.
fn group_by<'a, T>(
    tickets: impl IntoIterator<Item = &'a Ticket>,
    key: impl Fn(&'a Ticket) -> Option<&'a UserRef>,
    init: impl Fn(&UserRef) -> T,
    mut update: impl FnMut(&mut T, &Ticket),
) -> Vec<T> {
    let mut index: HashMap<UserId, usize> = HashMap::new();
    let mut groups: Vec<T> = Vec::new();

    for ticket in tickets {
        let Some(user) = key(ticket) else {
            continue;
        };
        let slot = *index.entry(user.id).or_insert_with(|| {
            groups.push(init(user));
            groups.len() - 1
        });
        update(&mut groups[slot], ticket);
    }

    groups
}

/// Group tickets by customer. Tickets without a customer are skipped.
pub fn summarize_by_customer<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Vec<CustomerSummary> {
    group_by(
        tickets,
        |t| t.customer.as_ref(),
        |c| CustomerSummary {
            id: c.id,
            name: c.display_name(),
            total: 0,
            open: 0,
            resolved: 0,
            breached: 0,
        },
        |s, t| {
            s.total += 1;
            if t.status == TicketStatus::Open {
                s.open += 1;
            }
            if t.status.is_finished() {
                s.resolved += 1;
            }
            if t.sla_breached {
                s.breached += 1;
            }
        },
    )
}

/// Group tickets by assigned engineer. Unassigned tickets are skipped.
pub fn summarize_by_engineer<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Vec<EngineerSummary> {
    group_by(
        tickets,
        |t| t.assigned_engineer.as_ref(),
        |e| EngineerSummary {
            id: e.id,
            name: e.display_name(),
            assigned: 0,
            in_progress: 0,
            resolved: 0,
            breached: 0,
        },
        |s, t| {
            s.assigned += 1;
            if t.status == TicketStatus::InProgress {
                s.in_progress += 1;
            }
            if t.status.is_finished() {
                s.resolved += 1;
            }
            if t.sla_breached {
                s.breached += 1;
            }
        },
    )
}

/// Distinct assigned engineers, first encounter first. This is the pool
/// an agent picks from when assigning.
pub fn engineer_directory<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Vec<UserRef> {
    group_by(
        tickets,
        |t| t.assigned_engineer.as_ref(),
        |e| e.clone(),
        |_, _| {},
    )
}

/// Status counters behind the dashboards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn tally<'a>(tickets: impl IntoIterator<Item = &'a Ticket>) -> Self {
        tickets.into_iter().fold(Self::default(), |mut c, t| {
            c.total += 1;
            match t.status {
                TicketStatus::Open => c.open += 1,
                TicketStatus::InProgress => c.in_progress += 1,
                TicketStatus::Resolved => c.resolved += 1,
                TicketStatus::Closed => c.closed += 1,
                TicketStatus::Unknown(_) => {}
            }
            c
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assigned(id: u64, status: TicketStatus, engineer: u64, breached: bool) -> Ticket {
        let mut t = Ticket::new(id, status);
        t.assigned_engineer = Some(UserRef::new(engineer).with_username(format!("eng{engineer}")));
        t.sla_breached = breached;
        t
    }

    fn owned(id: u64, status: TicketStatus, customer: u64) -> Ticket {
        let mut t = Ticket::new(id, status);
        t.customer = Some(UserRef::new(customer).with_name(format!("Customer {customer}")));
        t
    }

    #[test]
    fn test_engineer_summary_scenario() {
        let tickets = vec![
            assigned(1, TicketStatus::InProgress, 9, false),
            assigned(2, TicketStatus::InProgress, 9, true),
            assigned(3, TicketStatus::Closed, 9, false),
            Ticket::new(4, TicketStatus::Open),
        ];

        let summary = summarize_by_engineer(&tickets);
        assert_eq!(
            summary,
            vec![EngineerSummary {
                id: 9,
                name: "eng9".into(),
                assigned: 3,
                in_progress: 2,
                resolved: 1,
                breached: 1,
            }]
        );
    }

    #[test]
    fn test_customer_summary_keeps_first_encounter_order() {
        let tickets = vec![
            owned(1, TicketStatus::Open, 20),
            owned(2, TicketStatus::Resolved, 10),
            owned(3, TicketStatus::Closed, 20),
            Ticket::new(4, TicketStatus::Open),
        ];

        let summary = summarize_by_customer(&tickets);
        assert_eq!(summary.iter().map(|s| s.id).collect::<Vec<_>>(), vec![20, 10]);
        assert_eq!(summary[0].total, 2);
        assert_eq!(summary[0].open, 1);
        assert_eq!(summary[0].resolved, 1);
        assert_eq!(summary[1].name, "Customer 10");
    }

    #[test]
    fn test_engineer_directory_distinct() {
        let tickets = vec![
            assigned(1, TicketStatus::Open, 5, false),
            assigned(2, TicketStatus::Open, 6, false),
            assigned(3, TicketStatus::Open, 5, false),
        ];
        let ids: Vec<_> = engineer_directory(&tickets).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 6]);
    }

    #[test]
    fn test_status_counts() {
        let tickets = vec![
            Ticket::new(1, TicketStatus::Open),
            Ticket::new(2, TicketStatus::Open),
            Ticket::new(3, TicketStatus::Closed),
            Ticket::new(4, TicketStatus::Unknown("ON_HOLD".into())),
        ];
        let counts = StatusCounts::tally(&tickets);
        assert_eq!(counts.total, 4);
        assert_eq!(counts.open, 2);
        assert_eq!(counts.closed, 1);
        assert_eq!(counts.in_progress + counts.resolved, 0);
    }

    proptest! {
        #[test]
        fn prop_customer_counters_bounded(specs in proptest::collection::vec((0u8..5, 1u64..4), 0..50)) {
            let tickets: Vec<Ticket> = specs
                .iter()
                .enumerate()
                .map(|(i, (s, c))| {
                    let status = match s {
                        0 => TicketStatus::Open,
                        1 => TicketStatus::InProgress,
                        2 => TicketStatus::Resolved,
                        3 => TicketStatus::Closed,
                        _ => TicketStatus::Unknown("ESCALATED".into()),
                    };
                    owned(i as u64, status, *c)
                })
                .collect();

            let summary = summarize_by_customer(&tickets);
            prop_assert_eq!(summary.iter().map(|s| s.total).sum::<usize>(), tickets.len());
            for group in &summary {
                prop_assert!(group.open + group.resolved <= group.total);
            }
        }
    }
}
