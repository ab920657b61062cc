//! Wire types shared by every gateway call.
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque id of a server-held interaction log entry. Empty means the
/// exchange was not logged and no decision can be attached to it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InteractionLogRef(String);

impl InteractionLogRef {
    pub fn new(id: &str) -> Self {
        Self(id.trim().to_string())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InteractionLogRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The gateway sends `null` for interactions it did not log
fn null_as_empty<'de, D>(deserializer: D) -> Result<InteractionLogRef, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| InteractionLogRef::new(&v)).unwrap_or_default())
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GatewayMeta {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub redaction_count: u32,
    #[serde(default)]
    pub prompt_hash: Option<String>,
    #[serde(default)]
    pub response_hash: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceCounts {
    #[serde(default)]
    pub missing_or_stale_tests: u64,
    #[serde(default)]
    pub missing_or_expired_required_certificates: u64,
    #[serde(default)]
    pub expired_certificates: u64,
    #[serde(default)]
    pub open_nonconformance: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Findings {
    #[serde(default)]
    pub counts: ComplianceCounts,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryCounts {
    #[serde(default)]
    pub lots: u64,
    #[serde(default)]
    pub qc_tests: u64,
    #[serde(default)]
    pub certificates: u64,
    #[serde(default)]
    pub nonconformance: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SummaryContext {
    #[serde(default)]
    pub counts: SummaryCounts,
}

/// The payload returned for every assistive request.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssistiveResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub warning: Option<String>,
    // Suggestion calls answer with `suggestion`, chat with `reply`
    #[serde(default, alias = "suggestion", alias = "reply")]
    pub content: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub gateway: GatewayMeta,
    #[serde(default, alias = "interactionLog", deserialize_with = "null_as_empty")]
    pub interaction_log: InteractionLogRef,
    #[serde(default)]
    pub findings: Option<Findings>,
    #[serde(default)]
    pub context: Option<SummaryContext>,
    #[serde(default)]
    pub assistive_only: bool,
    #[serde(default)]
    pub decision_required: bool,
}

impl AssistiveResponse {
    /// The "no suggestion available" response every failed request
    /// resolves to.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn warning_text(&self) -> Option<&str> {
        self.warning
            .as_deref()
            .map(str::trim)
            .filter(|w| !w.is_empty())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accepted,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accepted => "accepted",
            Decision::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DecisionRequest {
    pub interaction_log: InteractionLogRef,
    pub decision: Decision,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DecisionReply {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub decision: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

fn coerce_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(serde_json::Value::String(s)) => {
            !matches!(s.trim().to_lowercase().as_str(), "" | "0" | "false" | "no")
        }
        Some(_) => true,
    })
}

/// Filters forwarded untouched to the gateway. Dates are opaque
/// strings and an empty string means unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatFilters {
    #[serde(default, deserialize_with = "coerce_bool")]
    pub include_expired_certificates: bool,
    #[serde(default, deserialize_with = "coerce_bool")]
    pub include_closed_nonconformance: bool,
    #[serde(default)]
    pub from_date: String,
    #[serde(default)]
    pub to_date: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SuggestionRequest {
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ChatFilters>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest {
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    pub filters: ChatFilters,
    pub history: Vec<ChatTurn>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub template_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TemplatesReply {
    #[serde(default)]
    pub templates: Vec<PromptTemplate>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ModelsReply {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub default_model: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggestion_response_deserialization() {
        let resp: AssistiveResponse = serde_json::from_value(json!({
            "ok": true,
            "task": "compliance-check",
            "provider": "ollama",
            "warning": "",
            "suggestion": "Review stale moisture tests.",
            "interaction_log": "AIL-0001",
            "findings": {"counts": {"missing_or_stale_tests": 2, "open_nonconformance": 1}},
            "gateway": {"redaction_count": 3, "prompt_hash": "abc"}
        }))
        .unwrap();

        assert!(resp.ok);
        assert_eq!(resp.content, "Review stale moisture tests.");
        assert_eq!(resp.interaction_log.as_str(), "AIL-0001");
        assert_eq!(resp.gateway.redaction_count, 3);
        assert_eq!(resp.warning_text(), None);
        let counts = resp.findings.unwrap().counts;
        assert_eq!(counts.missing_or_stale_tests, 2);
        assert_eq!(counts.expired_certificates, 0);
        assert_eq!(counts.open_nonconformance, 1);
    }

    #[test]
    fn test_chat_response_deserialization() {
        let resp: AssistiveResponse = serde_json::from_value(json!({
            "ok": true,
            "reply": "Check certificate CERT-9.",
            "interactionLog": "AIL-CHAT-0001",
            "gateway": {"model": "llama3.2:3b", "template_id": "general_assistant"}
        }))
        .unwrap();

        assert_eq!(resp.content, "Check certificate CERT-9.");
        assert_eq!(resp.interaction_log.as_str(), "AIL-CHAT-0001");
        assert_eq!(resp.gateway.model.as_deref(), Some("llama3.2:3b"));
    }

    #[test]
    fn test_reads_hashes_and_review_flags() {
        let resp: AssistiveResponse = serde_json::from_value(json!({
            "ok": true,
            "gateway": {"prompt_hash": "p1", "response_hash": "r1"},
            "assistive_only": true,
            "decision_required": true
        }))
        .unwrap();
        assert_eq!(resp.gateway.prompt_hash.as_deref(), Some("p1"));
        assert_eq!(resp.gateway.response_hash.as_deref(), Some("r1"));
        assert!(resp.assistive_only);
        assert!(resp.decision_required);
    }

    #[test]
    fn test_missing_fields_mean_not_ok_and_not_logged() {
        let resp: AssistiveResponse =
            serde_json::from_value(json!({"interaction_log": null})).unwrap();
        assert!(!resp.ok);
        assert!(resp.interaction_log.is_empty());
        assert_eq!(resp.gateway.redaction_count, 0);
    }

    #[test]
    fn test_decision_wire_format() {
        let decision: Decision = serde_json::from_str(r#""rejected""#).unwrap();
        assert_eq!(decision, Decision::Rejected);
        assert_eq!(
            serde_json::to_string(&Decision::Accepted).unwrap(),
            r#""accepted""#
        );
    }

    #[test]
    fn test_chat_filters_coerce_booleans() {
        let filters: ChatFilters = serde_json::from_value(json!({
            "include_expired_certificates": 1,
            "include_closed_nonconformance": "0",
            "from_date": "2026-02-01"
        }))
        .unwrap();

        assert!(filters.include_expired_certificates);
        assert!(!filters.include_closed_nonconformance);
        assert_eq!(filters.from_date, "2026-02-01");
        assert_eq!(filters.to_date, "");
    }

    #[test]
    fn test_chat_request_serialization() {
        let req = ChatRequest {
            subject: "LOT-001".to_string(),
            message: "What is missing?".to_string(),
            model: None,
            template_id: Some("general_assistant".to_string()),
            filters: ChatFilters::default(),
            history: vec![ChatTurn::new(ChatRole::User, "hi")],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value.get("model").is_none());
        assert_eq!(value["template_id"], "general_assistant");
        assert_eq!(value["history"][0]["role"], "user");
        assert_eq!(value["filters"]["include_expired_certificates"], false);
    }
}
