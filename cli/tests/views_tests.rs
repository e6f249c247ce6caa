//! View tests against an in-memory backend.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use netdesk::views::actions::{perform, TicketWrite};
use netdesk::views::{create, dashboard, feedback, history, summary, tickets};
use netdesk::{ViewContext, ViewOutcome};
use netdesk_client::{
    AssignRequest, CancellationToken, ClientError, ClientResult, CreateTicketRequest,
    FeedbackRequest, PrioritySeverityRequest, StatusUpdateRequest, TicketBackend,
};
use netdesk_core::{
    AuthContext, Column, DisplayBucket, Feedback, FeedbackState, HistoryAction, HistoryEvent,
    IssueCategory, PolicyError, Priority, Role, Severity, Ticket, TicketAction, TicketId,
    TicketQuery, TicketStatus, Timestamp, UserRef,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

// =============================================================================
// In-memory backend
// =============================================================================

#[derive(Default)]
struct MemoryBackend {
    tickets: Mutex<Vec<Ticket>>,
    history: HashMap<TicketId, Vec<HistoryEvent>>,
    feedback: Mutex<HashMap<TicketId, Feedback>>,
    calls: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: bool,
    reject_writes: Option<Option<String>>,
}

impl MemoryBackend {
    fn with_tickets(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets: Mutex::new(tickets),
            ..Default::default()
        }
    }

    fn with_feedback(self, id: u64) -> Self {
        self.feedback.lock().unwrap().insert(
            TicketId::new(id),
            Feedback {
                rating: Some(5),
                ..Default::default()
            },
        );
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn ticket(&self, id: u64) -> Ticket {
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id.value() == id)
            .cloned()
            .unwrap()
    }

    fn read(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(ClientError::Status {
                status: 500,
                message: None,
            });
        }
        Ok(())
    }

    fn write(&self) -> ClientResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        match &self.reject_writes {
            Some(message) => Err(ClientError::Status {
                status: 400,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn update(&self, id: TicketId, f: impl FnOnce(&mut Ticket)) -> ClientResult<()> {
        let mut tickets = self.tickets.lock().unwrap();
        match tickets.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                f(t);
                Ok(())
            }
            None => Err(not_found()),
        }
    }
}

fn not_found() -> ClientError {
    ClientError::Status {
        status: 404,
        message: None,
    }
}

#[async_trait]
impl TicketBackend for MemoryBackend {
    async fn list_tickets(&self) -> ClientResult<Vec<Ticket>> {
        self.read()?;
        Ok(self.tickets.lock().unwrap().clone())
    }

    async fn get_ticket(&self, id: TicketId) -> ClientResult<Ticket> {
        self.read()?;
        self.tickets
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn ticket_history(&self, id: TicketId) -> ClientResult<Vec<HistoryEvent>> {
        self.read()?;
        Ok(self.history.get(&id).cloned().unwrap_or_default())
    }

    async fn create_ticket(&self, request: &CreateTicketRequest) -> ClientResult<()> {
        self.write()?;
        let mut tickets = self.tickets.lock().unwrap();
        let mut ticket = Ticket::new(tickets.len() as u64 + 100, TicketStatus::Open);
        ticket.description = request.description.clone();
        ticket.issue_category = Some(request.issue_category);
        ticket.customer = Some(UserRef::new(request.customer_id));
        tickets.push(ticket);
        Ok(())
    }

    async fn update_status(&self, id: TicketId, request: &StatusUpdateRequest) -> ClientResult<()> {
        self.write()?;
        self.update(id, |t| t.status = request.status.clone())
    }

    async fn assign_engineer(&self, id: TicketId, request: &AssignRequest) -> ClientResult<()> {
        self.write()?;
        self.update(id, |t| {
            t.assigned_engineer = Some(UserRef::new(request.engineer_id));
            t.status = TicketStatus::InProgress;
        })
    }

    async fn set_priority_severity(
        &self,
        id: TicketId,
        request: &PrioritySeverityRequest,
    ) -> ClientResult<()> {
        self.write()?;
        self.update(id, |t| {
            t.priority = request.priority;
            t.severity = request.severity;
        })
    }

    async fn get_feedback(&self, id: TicketId) -> ClientResult<Feedback> {
        self.read()?;
        self.feedback
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn submit_feedback(&self, id: TicketId, request: &FeedbackRequest) -> ClientResult<()> {
        self.write()?;
        self.feedback.lock().unwrap().insert(
            id,
            Feedback {
                ticket_id: Some(id),
                rating: Some(request.rating),
                comment: request.comment.clone(),
                submitted_at: None,
            },
        );
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

const CUSTOMER: u64 = 10;
const OTHER_CUSTOMER: u64 = 11;
const ENGINEER: u64 = 20;

fn now() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn ticket(id: u64, status: TicketStatus, customer: u64, engineer: Option<u64>) -> Ticket {
    let mut t = Ticket::new(id, status);
    t.description = format!("issue {id}");
    t.customer = Some(UserRef::new(customer).with_name(format!("Customer {customer}")));
    t.assigned_engineer = engineer.map(|e| UserRef::new(e).with_username(format!("eng{e}")));
    t
}

/// Mixed set: one per status, plus an SLA-carrying in-progress ticket.
fn fixture() -> Vec<Ticket> {
    let mut in_progress = ticket(2, TicketStatus::InProgress, CUSTOMER, Some(ENGINEER));
    in_progress.sla_due_time = Some(now() + Duration::hours(2));

    let mut resolved = ticket(3, TicketStatus::Resolved, CUSTOMER, Some(ENGINEER));
    resolved.sla_due_time = Some(now() - Duration::hours(1));
    resolved.sla_breached = true;

    vec![
        ticket(1, TicketStatus::Open, CUSTOMER, None),
        in_progress,
        resolved,
        ticket(4, TicketStatus::Closed, OTHER_CUSTOMER, Some(21)),
    ]
}

fn view(backend: &MemoryBackend, user: u64, role: Role) -> ViewContext<'_> {
    ViewContext::new(AuthContext::new(user, role), backend, CancellationToken::new()).at(now())
}

fn ids(page: &tickets::TicketListPage) -> Vec<u64> {
    page.rows.iter().map(|r| r.id.value()).collect()
}

// =============================================================================
// Page authorization
// =============================================================================

#[tokio::test]
async fn test_restricted_pages_make_no_backend_calls() {
    let backend = MemoryBackend::with_tickets(fixture());

    for role in [Role::Customer, Role::Engineer, Role::Agent] {
        let vc = view(&backend, 1, role);
        assert!(summary::customer_summary(&vc).await.is_unauthorized());
        assert!(summary::engineer_summary(&vc).await.is_unauthorized());
        assert!(feedback::show_feedback(&vc, TicketId::new(3)).await.is_unauthorized());
    }
    for role in [Role::Engineer, Role::Agent, Role::Admin] {
        let vc = view(&backend, 1, role);
        let outcome = create::create_ticket(&vc, "desc", Some(IssueCategory::Network)).await;
        assert!(outcome.is_unauthorized());
    }
    assert_eq!(backend.calls(), 0);
}

// =============================================================================
// Ticket list
// =============================================================================

#[tokio::test]
async fn test_customer_sees_own_tickets_without_staff_columns() {
    let backend = MemoryBackend::with_tickets(fixture());
    let page = tickets::ticket_list(&view(&backend, CUSTOMER, Role::Customer), TicketQuery::default())
        .await
        .ready()
        .unwrap();

    assert_eq!(ids(&page), vec![1, 2, 3]);
    assert!(!page.columns.contains(&Column::Engineer));
    assert!(!page.columns.contains(&Column::Sla));
    assert_eq!(page.rows[0].engineer, None);

    let resolved = page.row(TicketId::new(3)).unwrap();
    assert_eq!(resolved.feedback, FeedbackState::Absent);
    assert!(resolved
        .actions
        .iter()
        .any(|a| a.action == TicketAction::SubmitFeedback && a.enabled));
}

#[tokio::test]
async fn test_admin_list_sla_and_close_gating() {
    let backend = MemoryBackend::with_tickets(fixture());
    let page = tickets::ticket_list(&view(&backend, 1, Role::Admin), TicketQuery::default())
        .await
        .ready()
        .unwrap();

    assert_eq!(ids(&page), vec![1, 2, 3, 4]);
    let in_progress = page.row(TicketId::new(2)).unwrap();
    assert_eq!(in_progress.cell(Column::Sla), "2.0 h");
    assert_eq!(in_progress.cell(Column::Engineer), "eng20");
    assert_eq!(page.row(TicketId::new(1)).unwrap().cell(Column::Sla), "–");
    assert_eq!(page.row(TicketId::new(3)).unwrap().cell(Column::Sla), "breached");

    let close = page
        .row(TicketId::new(3))
        .unwrap()
        .actions
        .iter()
        .find(|a| a.action == TicketAction::Close)
        .copied()
        .unwrap();
    assert!(!close.enabled);
    assert!(page.row(TicketId::new(3)).unwrap().cell(Column::Actions).contains("close (needs feedback)"));
}

#[tokio::test]
async fn test_agent_skips_feedback_probes() {
    let backend = MemoryBackend::with_tickets(fixture());
    let page = tickets::ticket_list(&view(&backend, 1, Role::Agent), TicketQuery::default())
        .await
        .ready()
        .unwrap();

    assert_eq!(backend.calls(), 1);
    assert!(page.rows.iter().all(|r| r.feedback == FeedbackState::Unknown));
}

#[tokio::test]
async fn test_list_filters_combine() {
    let backend = MemoryBackend::with_tickets(fixture());
    let vc = view(&backend, 1, Role::Admin);

    let breached = tickets::ticket_list(&vc, TicketQuery::default().with_status(DisplayBucket::SlaBreached))
        .await
        .ready()
        .unwrap();
    assert_eq!(ids(&breached), vec![3]);

    let by_engineer = tickets::ticket_list(
        &vc,
        TicketQuery::default()
            .with_engineer(ENGINEER)
            .with_status(DisplayBucket::InProgress),
    )
    .await
    .ready()
    .unwrap();
    assert_eq!(ids(&by_engineer), vec![2]);
}

#[tokio::test]
async fn test_list_fetch_failure_alerts() {
    let backend = MemoryBackend {
        fail_reads: true,
        ..MemoryBackend::with_tickets(fixture())
    };
    match tickets::ticket_list(&view(&backend, 1, Role::Admin), TicketQuery::default()).await {
        ViewOutcome::Failed { alert } => assert!(alert.starts_with("Failed to load tickets")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cancelled_view_renders_nothing() {
    let backend = MemoryBackend::with_tickets(fixture());
    let vc = view(&backend, 1, Role::Admin);
    vc.cancel.cancel();
    assert_eq!(
        tickets::ticket_list(&vc, TicketQuery::default()).await,
        ViewOutcome::Cancelled
    );
}

#[tokio::test]
async fn test_engineer_picker_lists_distinct_engineers() {
    let backend = MemoryBackend::with_tickets(fixture());
    let dir = tickets::engineer_picker(&view(&backend, 1, Role::Agent))
        .await
        .ready()
        .unwrap();
    let found: Vec<u64> = dir.engineers.iter().map(|e| e.id).collect();
    assert_eq!(found, vec![ENGINEER, 21]);
}

// =============================================================================
// Write actions
// =============================================================================

#[tokio::test]
async fn test_admin_close_requires_feedback() {
    let backend = MemoryBackend::with_tickets(fixture());
    let outcome = perform(&view(&backend, 1, Role::Admin), TicketId::new(3), TicketWrite::Close).await;

    assert_eq!(
        outcome,
        ViewOutcome::Denied(PolicyError::FeedbackRequired(TicketId::new(3)))
    );
    assert_eq!(backend.writes(), 0);
}

#[tokio::test]
async fn test_admin_close_with_feedback_refetches() {
    let backend = MemoryBackend::with_tickets(fixture()).with_feedback(3);
    let page = perform(&view(&backend, 1, Role::Admin), TicketId::new(3), TicketWrite::Close)
        .await
        .ready()
        .unwrap();

    assert_eq!(backend.writes(), 1);
    assert_eq!(page.row(TicketId::new(3)).unwrap().status, TicketStatus::Closed);
}

#[tokio::test]
async fn test_close_rejection_uses_backend_message() {
    let backend = MemoryBackend {
        reject_writes: Some(Some("Feedback not submitted".into())),
        ..MemoryBackend::with_tickets(fixture()).with_feedback(3)
    };
    let outcome = perform(&view(&backend, 1, Role::Admin), TicketId::new(3), TicketWrite::Close).await;
    assert_eq!(outcome, ViewOutcome::failed("Feedback not submitted"));

    let silent = MemoryBackend {
        reject_writes: Some(None),
        ..MemoryBackend::with_tickets(fixture()).with_feedback(3)
    };
    let outcome = perform(&view(&silent, 1, Role::Admin), TicketId::new(3), TicketWrite::Close).await;
    assert_eq!(outcome, ViewOutcome::failed("Feedback required"));
}

#[tokio::test]
async fn test_agent_cannot_set_priority_on_resolved() {
    let backend = MemoryBackend::with_tickets(fixture());
    let outcome = perform(
        &view(&backend, 1, Role::Agent),
        TicketId::new(3),
        TicketWrite::Priority(Priority::High),
    )
    .await;

    assert!(matches!(
        outcome,
        ViewOutcome::Denied(PolicyError::ActionNotPermitted {
            action: TicketAction::SetPriority,
            role: Role::Agent,
            ..
        })
    ));
    assert_eq!(backend.writes(), 0);
}

#[tokio::test]
async fn test_agent_triage_keeps_existing_values() {
    let backend = MemoryBackend::with_tickets(fixture());
    let vc = view(&backend, 5, Role::Agent);

    perform(&vc, TicketId::new(1), TicketWrite::Priority(Priority::Low))
        .await
        .ready()
        .unwrap();
    perform(&vc, TicketId::new(1), TicketWrite::Severity(Severity::Major))
        .await
        .ready()
        .unwrap();
    perform(&vc, TicketId::new(1), TicketWrite::Assign { engineer_id: ENGINEER })
        .await
        .ready()
        .unwrap();

    let stored = backend.ticket(1);
    assert_eq!(stored.priority, Some(Priority::Low));
    assert_eq!(stored.severity, Some(Severity::Major));
    assert_eq!(stored.engineer_id(), Some(ENGINEER));

    // Once set, priority is no longer offered.
    let again = perform(&vc, TicketId::new(1), TicketWrite::Priority(Priority::High)).await;
    assert!(matches!(again, ViewOutcome::Denied(_)));
}

#[tokio::test]
async fn test_engineer_resolves_only_own_tickets() {
    let backend = MemoryBackend::with_tickets(fixture());

    let other = perform(&view(&backend, 99, Role::Engineer), TicketId::new(2), TicketWrite::Resolve).await;
    assert!(matches!(other, ViewOutcome::Denied(_)));

    let page = perform(&view(&backend, ENGINEER, Role::Engineer), TicketId::new(2), TicketWrite::Resolve)
        .await
        .ready()
        .unwrap();
    assert_eq!(page.row(TicketId::new(2)).unwrap().status, TicketStatus::Resolved);
}

// =============================================================================
// Create, feedback, history
// =============================================================================

#[tokio::test]
async fn test_create_ticket_validation_and_refresh() {
    let backend = MemoryBackend::with_tickets(fixture());
    let vc = view(&backend, CUSTOMER, Role::Customer);

    assert!(matches!(
        create::create_ticket(&vc, "   ", Some(IssueCategory::Hardware)).await,
        ViewOutcome::Failed { .. }
    ));
    assert!(matches!(
        create::create_ticket(&vc, "Switch dead", None).await,
        ViewOutcome::Failed { .. }
    ));
    assert_eq!(backend.writes(), 0);

    let page = create::create_ticket(&vc, "Switch dead", Some(IssueCategory::Hardware))
        .await
        .ready()
        .unwrap();
    assert_eq!(page.rows.len(), 4);
    assert_eq!(page.rows.last().unwrap().description, "Switch dead");
}

#[tokio::test]
async fn test_create_failure_generic_alert() {
    let backend = MemoryBackend {
        reject_writes: Some(None),
        ..MemoryBackend::with_tickets(Vec::new())
    };
    let outcome = create::create_ticket(
        &view(&backend, CUSTOMER, Role::Customer),
        "Router down",
        Some(IssueCategory::Network),
    )
    .await;
    assert_eq!(outcome, ViewOutcome::failed("Failed to create ticket"));
}

#[tokio::test]
async fn test_feedback_submitted_once() {
    let backend = MemoryBackend::with_tickets(fixture());
    let vc = view(&backend, CUSTOMER, Role::Customer);

    assert!(matches!(
        feedback::submit_feedback(&vc, TicketId::new(3), 9, None).await,
        ViewOutcome::Failed { .. }
    ));

    let page = feedback::submit_feedback(&vc, TicketId::new(3), 4, Some("quick fix".into()))
        .await
        .ready()
        .unwrap();
    assert_eq!(page.row(TicketId::new(3)).unwrap().feedback, FeedbackState::OnFile);

    let again = feedback::submit_feedback(&vc, TicketId::new(3), 5, None).await;
    assert_eq!(
        again,
        ViewOutcome::Denied(PolicyError::FeedbackAlreadySubmitted(TicketId::new(3)))
    );

    let admin = feedback::show_feedback(&view(&backend, 1, Role::Admin), TicketId::new(3))
        .await
        .ready()
        .unwrap();
    assert_eq!(admin.feedback.unwrap().comment.as_deref(), Some("quick fix"));
}

#[tokio::test]
async fn test_missing_feedback_is_empty_not_error() {
    let backend = MemoryBackend::with_tickets(fixture());
    let page = feedback::show_feedback(&view(&backend, 1, Role::Admin), TicketId::new(4))
        .await
        .ready()
        .unwrap();
    assert!(page.feedback.is_none());
}

#[tokio::test]
async fn test_engineer_history_shows_assignment_only() {
    let event = |action: HistoryAction, minutes: i64| HistoryEvent {
        id: None,
        action,
        action_time: now() - Duration::minutes(minutes),
        details: None,
        performed_by: None,
    };
    let mut backend = MemoryBackend::with_tickets(fixture());
    backend.history.insert(
        TicketId::new(2),
        vec![
            event(HistoryAction::EngineerAssigned, 10),
            event(HistoryAction::TicketCreated, 60),
            event(HistoryAction::StatusChanged, 5),
            event(HistoryAction::EngineerAssigned, 30),
        ],
    );

    let detail = history::ticket_detail(&view(&backend, ENGINEER, Role::Engineer), TicketId::new(2))
        .await
        .ready()
        .unwrap();
    assert_eq!(detail.history.len(), 2);
    assert_eq!(detail.assigned_at, Some(now() - Duration::minutes(30)));

    let full = history::ticket_detail(&view(&backend, 1, Role::Admin), TicketId::new(2))
        .await
        .ready()
        .unwrap();
    assert_eq!(full.history.len(), 4);
    assert_eq!(full.history[0].action, HistoryAction::TicketCreated);
    assert_eq!(full.assigned_at, None);
}

#[tokio::test]
async fn test_history_stays_within_role_scope() {
    let backend = MemoryBackend::with_tickets(fixture());

    let foreign = history::ticket_detail(&view(&backend, CUSTOMER, Role::Customer), TicketId::new(4)).await;
    assert_eq!(
        foreign,
        ViewOutcome::Denied(PolicyError::OutOfScope {
            ticket: TicketId::new(4),
            role: Role::Customer,
        })
    );

    let unassigned = history::ticket_detail(&view(&backend, ENGINEER, Role::Engineer), TicketId::new(4)).await;
    assert!(matches!(unassigned, ViewOutcome::Denied(PolicyError::OutOfScope { .. })));

    let own = history::ticket_detail(&view(&backend, OTHER_CUSTOMER, Role::Customer), TicketId::new(4)).await;
    assert!(own.ready().is_some());
}

#[tokio::test]
async fn test_history_requires_both_fetches() {
    let backend = MemoryBackend::with_tickets(fixture());
    let outcome = history::ticket_detail(&view(&backend, 1, Role::Admin), TicketId::new(404)).await;
    assert!(matches!(outcome, ViewOutcome::Failed { .. }));
}

// =============================================================================
// Dashboards and summaries
// =============================================================================

#[tokio::test]
async fn test_dashboards_scope_by_role() {
    let backend = MemoryBackend::with_tickets(fixture());

    let customer = dashboard::dashboard(&view(&backend, CUSTOMER, Role::Customer))
        .await
        .ready()
        .unwrap();
    assert_eq!(customer.count("Total"), Some(3));
    assert_eq!(customer.count("Closed"), Some(0));

    let engineer = dashboard::dashboard(&view(&backend, ENGINEER, Role::Engineer))
        .await
        .ready()
        .unwrap();
    assert_eq!(engineer.count("Total"), None);
    assert_eq!(engineer.count("In Progress"), Some(1));

    let admin = dashboard::dashboard(&view(&backend, 1, Role::Admin))
        .await
        .ready()
        .unwrap();
    assert_eq!(admin.count("Total"), Some(4));
    assert_eq!(admin.count("SLA Active"), Some(1));
    assert_eq!(admin.count("SLA Breached"), Some(1));
}

#[tokio::test]
async fn test_engineer_summary_scenario() {
    let e = 30;
    let mut breached = ticket(12, TicketStatus::Resolved, CUSTOMER, Some(e));
    breached.sla_breached = true;
    let backend = MemoryBackend::with_tickets(vec![
        ticket(10, TicketStatus::InProgress, CUSTOMER, Some(e)),
        ticket(11, TicketStatus::InProgress, CUSTOMER, Some(e)),
        breached,
        ticket(13, TicketStatus::Open, CUSTOMER, None),
    ]);

    let page = summary::engineer_summary(&view(&backend, 1, Role::Admin))
        .await
        .ready()
        .unwrap();
    assert_eq!(page.engineers.len(), 1);
    let row = &page.engineers[0];
    assert_eq!(
        (row.assigned, row.in_progress, row.resolved, row.breached),
        (3, 2, 1, 1)
    );
    assert_eq!(row.name, "eng30");
}

#[tokio::test]
async fn test_customer_summary_keeps_first_seen_order() {
    let backend = MemoryBackend::with_tickets(fixture());
    let page = summary::customer_summary(&view(&backend, 1, Role::Admin))
        .await
        .ready()
        .unwrap();

    let order: Vec<u64> = page.customers.iter().map(|c| c.id).collect();
    assert_eq!(order, vec![CUSTOMER, OTHER_CUSTOMER]);
    assert_eq!(page.customers[0].total, 3);
    assert_eq!(page.customers[0].open, 1);
    assert_eq!(page.customers[0].resolved, 1);
}
