//! Summary commands

use super::finish;
use crate::SummaryCommands;
use anyhow::Result;
use netdesk::output::OutputFormat;
use netdesk::views::summary;
use netdesk::ViewContext;
use std::process::ExitCode;

pub async fn handle(action: SummaryCommands, vc: &ViewContext<'_>, format: OutputFormat) -> Result<ExitCode> {
    match action {
        SummaryCommands::Customers => finish(summary::customer_summary(vc).await, format, None),
        SummaryCommands::Engineers => finish(summary::engineer_summary(vc).await, format, None),
    }
}
