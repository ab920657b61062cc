//! In-memory `Gateway` used by unit tests.
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{GatewayError, GatewayErrorKind};
use super::models::*;
use super::Gateway;

pub(crate) struct FakeGateway {
    response: Option<AssistiveResponse>,
    decision_reply: Option<DecisionReply>,
    templates: Option<Vec<PromptTemplate>>,
    models: Option<ModelsReply>,
    pub calls: Mutex<Vec<String>>,
    pub decisions: Mutex<Vec<DecisionRequest>>,
    pub chats: Mutex<Vec<ChatRequest>>,
}

impl FakeGateway {
    /// Every call fails at the transport level.
    pub fn offline() -> Self {
        Self {
            response: None,
            decision_reply: None,
            templates: None,
            models: None,
            calls: Mutex::new(Vec::new()),
            decisions: Mutex::new(Vec::new()),
            chats: Mutex::new(Vec::new()),
        }
    }

    pub fn responding(response: AssistiveResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::offline()
        }
    }

    pub fn with_decision_reply(mut self, reply: DecisionReply) -> Self {
        self.decision_reply = Some(reply);
        self
    }

    pub fn with_templates(mut self, templates: Vec<PromptTemplate>) -> Self {
        self.templates = Some(templates);
        self
    }

    pub fn with_models(mut self, models: ModelsReply) -> Self {
        self.models = Some(models);
        self
    }

    pub fn call_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn decision_requests(&self) -> Vec<DecisionRequest> {
        self.decisions.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn offline_error(name: &str) -> GatewayError {
        GatewayError::new(GatewayErrorKind::Connect, name, "connection refused")
    }

    fn respond(&self, name: &str) -> Result<AssistiveResponse, GatewayError> {
        self.record(name);
        self.response.clone().ok_or_else(|| Self::offline_error(name))
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn compliance_suggestion(
        &self,
        _request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError> {
        self.respond("get-compliance-suggestion")
    }

    async fn narrative_summary(
        &self,
        _request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError> {
        self.respond("get-narrative-summary")
    }

    async fn chat(&self, request: &ChatRequest) -> Result<AssistiveResponse, GatewayError> {
        self.chats.lock().unwrap().push(request.clone());
        self.respond("chat-with-assistant")
    }

    async fn prompt_templates(&self) -> Result<Vec<PromptTemplate>, GatewayError> {
        self.record("list-prompt-templates");
        self.templates
            .clone()
            .ok_or_else(|| Self::offline_error("list-prompt-templates"))
    }

    async fn available_models(&self) -> Result<ModelsReply, GatewayError> {
        self.record("list-available-models");
        self.models
            .clone()
            .ok_or_else(|| Self::offline_error("list-available-models"))
    }

    async fn set_decision(&self, request: &DecisionRequest) -> Result<DecisionReply, GatewayError> {
        self.record("set-decision");
        self.decisions.lock().unwrap().push(request.clone());
        self.decision_reply
            .clone()
            .ok_or_else(|| Self::offline_error("set-decision"))
    }
}
