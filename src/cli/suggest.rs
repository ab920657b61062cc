use std::path::PathBuf;

use anyhow::Result;

use super::terminal::TerminalPresenter;
use super::write_back::FileWriteBack;
use crate::core::AppConfig;
use crate::gateway::HttpGateway;
use crate::workflow::{Dispatcher, EventInput, EventKind, HostContext, Workflow};

/// Runs a single suggestion or summary for one subject.
pub async fn run(
    config: &AppConfig,
    host: HostContext,
    event: EventKind,
    input: EventInput,
    apply_to: Option<PathBuf>,
) -> Result<()> {
    let gateway = HttpGateway::from_config(config)?;
    let dispatcher = Dispatcher::default();
    let invocation = dispatcher.dispatch(&host, event, input)?;

    let write_back = apply_to.map(FileWriteBack::new);
    let mut workflow = Workflow::new(&gateway);
    if let Some(write_back) = &write_back {
        workflow = workflow.accept_effect(write_back);
    }

    let mut presenter = TerminalPresenter::new()?;
    let report = workflow.run(&mut presenter, &invocation).await;
    tracing::debug!(
        invocation_id = %report.invocation_id,
        state = %report.final_state(),
        finished = report.is_finished(),
        "Done"
    );

    Ok(())
}
