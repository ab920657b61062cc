use anyhow::Result;

use super::terminal::TerminalPresenter;
use crate::core::AppConfig;
use crate::gateway::{ChatFilters, HttpGateway};
use crate::workflow::{ChatSession, Dispatcher, HostContext, Notice, Presenter, Workflow};

pub async fn run(
    config: &AppConfig,
    host: HostContext,
    model: Option<String>,
    template: Option<String>,
    filters: ChatFilters,
) -> Result<()> {
    let gateway = HttpGateway::from_config(config)?;
    let dispatcher = Dispatcher::default();
    let workflow = Workflow::new(&gateway);
    let mut presenter = TerminalPresenter::new()?;

    let mut session = ChatSession::new(host)
        .model(model.or_else(|| Some(config.default_model.clone())))
        .template(template.as_deref().unwrap_or_default())
        .filters(filters);
    eprintln!(
        "Chatting about {} with template {}. Ctrl-D to quit.",
        session.host.subject.id, session.template_id
    );

    while let Some(line) = presenter.read_line(">>> ")? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(refusal) = session
            .send(&workflow, &dispatcher, &mut presenter, &line)
            .await
        {
            presenter.notify(&Notice::warning(&refusal.to_string()));
        }
    }

    Ok(())
}
