//! State for one assistant chat dialog.
use super::dispatch::{Dispatcher, EventInput, EventKind, HostContext, Refusal};
use super::driver::{Workflow, WorkflowReport};
use super::presenter::Presenter;
use super::request::ChatParams;
use crate::gateway::catalog::DEFAULT_TEMPLATE_ID;
use crate::gateway::{ChatFilters, ChatRole, ChatTurn};

#[derive(Clone, Debug, Default)]
pub struct Transcript(Vec<ChatTurn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.0.clone()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.0.push(turn)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct ChatSession {
    pub host: HostContext,
    pub model: Option<String>,
    pub template_id: String,
    pub filters: ChatFilters,
    pub transcript: Transcript,
}

impl ChatSession {
    pub fn new(host: HostContext) -> Self {
        Self {
            host,
            model: None,
            template_id: DEFAULT_TEMPLATE_ID.to_string(),
            filters: ChatFilters::default(),
            transcript: Transcript::new(),
        }
    }

    pub fn model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn template(mut self, template_id: &str) -> Self {
        let template_id = template_id.trim();
        if !template_id.is_empty() {
            self.template_id = template_id.to_string();
        }
        self
    }

    pub fn filters(mut self, filters: ChatFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Sends one message and runs the full workflow for the reply.
    ///
    /// The transcript only grows when the reply came back `ok`, so a
    /// failed turn can be retried without polluting the history.
    pub async fn send(
        &mut self,
        workflow: &Workflow<'_>,
        dispatcher: &Dispatcher,
        presenter: &mut dyn Presenter,
        message: &str,
    ) -> Result<WorkflowReport, Refusal> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Refusal::EmptyMessage);
        }

        let params = ChatParams {
            message: message.to_string(),
            model: self.model.clone(),
            template_id: Some(self.template_id.clone()),
            filters: self.filters.clone(),
            history: self.transcript.turns(),
        };
        let invocation =
            dispatcher.dispatch(&self.host, EventKind::AssistantChat, EventInput::Chat(params))?;
        let report = workflow.run(presenter, &invocation).await;

        if report.response.ok {
            self.transcript.push(ChatTurn::new(ChatRole::User, message));
            self.transcript
                .push(ChatTurn::new(ChatRole::Assistant, &report.response.content));
        }
        Ok(report)
    }
}
