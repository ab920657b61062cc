//! The request/response contract with the AI gateway. The workflow
//! only ever talks to the `Gateway` trait so any transport can sit
//! behind it; `HttpGateway` is the one shipped here.
use async_trait::async_trait;

pub mod catalog;
pub mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod http;
pub mod models;

pub use catalog::{CatalogSource, ModelCatalog, TemplateCatalog};
pub use error::{GatewayError, GatewayErrorKind};
pub use http::HttpGateway;
pub use models::*;

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn compliance_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError>;

    async fn narrative_summary(
        &self,
        request: &SuggestionRequest,
    ) -> Result<AssistiveResponse, GatewayError>;

    async fn chat(&self, request: &ChatRequest) -> Result<AssistiveResponse, GatewayError>;

    async fn prompt_templates(&self) -> Result<Vec<PromptTemplate>, GatewayError>;

    async fn available_models(&self) -> Result<ModelsReply, GatewayError>;

    /// Records a decision event. Append-only: calling this twice for
    /// the same log records two events.
    async fn set_decision(&self, request: &DecisionRequest) -> Result<DecisionReply, GatewayError>;
}
