use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::GatewayError;
use super::models::{
    AssistiveResponse, ChatRequest, DecisionReply, DecisionRequest, ModelsReply,
    PromptTemplate, SuggestionRequest, TemplatesReply,
};
use super::Gateway;
use crate::core::AppConfig;

/// Decodes a gateway reply, unwrapping the `{"message": ...}`
/// envelope the host framework puts around RPC results.
fn decode_reply<T: DeserializeOwned>(status: u16, url: &str, body: &str) -> Result<T, GatewayError> {
    let value: Value = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(body).map_err(|e| GatewayError::decode_error(status, url, e, body))?
    };
    let value = match value {
        Value::Object(mut map) if matches!(map.get("message"), Some(Value::Object(_))) => {
            map.remove("message").unwrap_or_default()
        }
        other => other,
    };
    serde_json::from_value(value).map_err(|e| GatewayError::decode_error(status, url, e, body))
}

async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| GatewayError::from_reqwest(err, &url))?;

    if !status.is_success() {
        return Err(GatewayError::status_error(status.as_u16(), &url, &body));
    }

    decode_reply(status.as_u16(), &url, &body)
}

/// `Gateway` over HTTP. Every call is a single JSON request and
/// response, nothing is streamed.
#[derive(Clone)]
pub struct HttpGateway {
    api_key: String,
    http: reqwest::Client,
    url_compliance: String,
    url_narrative: String,
    url_chat: String,
    url_templates: String,
    url_models: String,
    url_decision: String,
}

impl HttpGateway {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let base = base_url.trim_end_matches('/');
        Ok(Self {
            api_key: api_key.to_string(),
            http,
            url_compliance: format!("{}/get-compliance-suggestion", base),
            url_narrative: format!("{}/get-narrative-summary", base),
            url_chat: format!("{}/chat-with-assistant", base),
            url_templates: format!("{}/list-prompt-templates", base),
            url_models: format!("{}/list-available-models", base),
            url_decision: format!("{}/set-decision", base),
        })
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Self::new(
            &config.gateway_url,
            &config.api_key,
            Duration::from_secs(config.gateway_timeout_secs),
        )
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.api_key)
        }
    }

    async fn post<B, T>(&self, url: &str, body: &B) -> Result<T, GatewayError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(url = %url, "gateway request");
        let req = self
            .http
            .post(url)
            .header("Content-Type", "application/json")
            .json(body);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| GatewayError::from_reqwest(err, url))?;
        tracing::debug!(url = %url, status = %resp.status(), "gateway response");
        parse_response(resp).await
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, GatewayError> {
        tracing::debug!(url = %url, "gateway request");
        let req = self.http.get(url).header("Accept", "application/json");
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| GatewayError::from_reqwest(err, url))?;
        tracing::debug!(url = %url, status = %resp.status(), "gateway response");
        parse_response(resp).await
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn compliance_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError> {
        self.post(&self.url_compliance, request).await
    }

    async fn narrative_summary(
        &self,
        request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError> {
        self.post(&self.url_narrative, request).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<AssistiveResponse, GatewayError> {
        self.post(&self.url_chat, request).await
    }

    async fn prompt_templates(&self) -> Result<Vec<PromptTemplate>, GatewayError> {
        let reply: TemplatesReply = self.get(&self.url_templates).await?;
        Ok(reply.templates)
    }

    async fn available_models(&self) -> Result<ModelsReply, GatewayError> {
        self.get(&self.url_models).await
    }

    async fn set_decision(&self, request: &DecisionRequest) -> Result<DecisionReply, GatewayError> {
        self.post(&self.url_decision, request).await
    }
}
