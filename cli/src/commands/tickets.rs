//! Ticket commands

use super::finish;
use crate::TicketCommands;
use anyhow::Result;
use netdesk::output::OutputFormat;
use netdesk::views::actions::{perform, TicketWrite};
use netdesk::views::{create, history, tickets};
use netdesk::ViewContext;
use netdesk_core::{TicketId, TicketQuery};
use std::process::ExitCode;

pub async fn handle(action: TicketCommands, vc: &ViewContext<'_>, format: OutputFormat) -> Result<ExitCode> {
    let (id, write) = match action {
        TicketCommands::List {
            status,
            customer_id,
            engineer_id,
        } => {
            let query = TicketQuery {
                status,
                customer_id,
                engineer_id,
            };
            return finish(tickets::ticket_list(vc, query).await, format, None);
        }
        TicketCommands::Show { id } => {
            return finish(history::ticket_detail(vc, TicketId::new(id)).await, format, None);
        }
        TicketCommands::Create {
            description,
            category,
        } => {
            let outcome = create::create_ticket(vc, &description, category).await;
            return finish(outcome, format, Some("Ticket created".into()));
        }
        TicketCommands::Engineers => {
            return finish(tickets::engineer_picker(vc).await, format, None);
        }
        TicketCommands::Assign { id, engineer_id } => (id, TicketWrite::Assign { engineer_id }),
        TicketCommands::Priority { id, priority } => (id, TicketWrite::Priority(priority)),
        TicketCommands::Severity { id, severity } => (id, TicketWrite::Severity(severity)),
        TicketCommands::Resolve { id } => (id, TicketWrite::Resolve),
        TicketCommands::Close { id } => (id, TicketWrite::Close),
    };

    let id = TicketId::new(id);
    let done = format!("Ticket {id} {}", write.past_tense());
    finish(perform(vc, id, write).await, format, Some(done))
}
