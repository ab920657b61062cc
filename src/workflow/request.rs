use std::fmt;

use crate::gateway::{
    AssistiveResponse, ChatFilters, ChatRequest, ChatTurn, Gateway, SuggestionRequest,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SuggestionKind {
    ComplianceSuggestion,
    NarrativeSummary,
    ChatReply,
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SuggestionKind::ComplianceSuggestion => f.write_str("compliance-suggestion"),
            SuggestionKind::NarrativeSummary => f.write_str("narrative-summary"),
            SuggestionKind::ChatReply => f.write_str("chat-reply"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatParams {
    pub message: String,
    pub model: Option<String>,
    pub template_id: Option<String>,
    pub filters: ChatFilters,
    pub history: Vec<ChatTurn>,
}

/// The kind of request together with the parameters that kind takes.
#[derive(Clone, Debug, PartialEq)]
pub enum SuggestionQuery {
    Compliance { filters: Option<ChatFilters> },
    Narrative { filters: Option<ChatFilters> },
    Chat(ChatParams),
}

impl SuggestionQuery {
    pub fn kind(&self) -> SuggestionKind {
        match self {
            SuggestionQuery::Compliance { .. } => SuggestionKind::ComplianceSuggestion,
            SuggestionQuery::Narrative { .. } => SuggestionKind::NarrativeSummary,
            SuggestionQuery::Chat(_) => SuggestionKind::ChatReply,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Asks the gateway for a suggestion or reply about `subject_id`.
///
/// Never fails: a transport error, like an empty subject, resolves to
/// an `ok: false` response so there is always a "no suggestion"
/// rendering to fall back to.
pub async fn request_suggestion(
    gateway: &dyn Gateway,
    subject_id: &str,
    query: &SuggestionQuery,
) -> AssistiveResponse {
    let subject = subject_id.trim();
    let kind = query.kind();
    if subject.is_empty() {
        tracing::warn!(%kind, "Refusing assistive request without a subject");
        return AssistiveResponse::unavailable();
    }

    let result = match query {
        SuggestionQuery::Compliance { filters } => {
            let request = SuggestionRequest {
                subject: subject.to_string(),
                filters: filters.clone(),
            };
            gateway.compliance_suggestion(&request).await
        }
        SuggestionQuery::Narrative { filters } => {
            let request = SuggestionRequest {
                subject: subject.to_string(),
                filters: filters.clone(),
            };
            gateway.narrative_summary(&request).await
        }
        SuggestionQuery::Chat(params) => {
            let request = ChatRequest {
                subject: subject.to_string(),
                message: params.message.trim().to_string(),
                model: non_empty(&params.model),
                template_id: non_empty(&params.template_id),
                filters: params.filters.clone(),
                history: params.history.clone(),
            };
            gateway.chat(&request).await
        }
    };

    match result {
        Ok(response) => {
            tracing::debug!(
                %kind,
                subject = %subject,
                ok = response.ok,
                provider = %response.provider,
                redaction_count = response.gateway.redaction_count,
                prompt_hash = response.gateway.prompt_hash.as_deref().unwrap_or(""),
                response_hash = response.gateway.response_hash.as_deref().unwrap_or(""),
                assistive_only = response.assistive_only,
                decision_required = response.decision_required,
                interaction_log = %response.interaction_log,
                "Assistive response received"
            );
            response
        }
        Err(e) => {
            tracing::warn!(%kind, subject = %subject, "Assistive request failed: {}", e);
            AssistiveResponse::unavailable()
        }
    }
}
