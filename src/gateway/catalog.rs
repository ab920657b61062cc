//! Prompt templates and models offered to the chat dialog. Both
//! lists degrade to local defaults when the gateway can't be reached
//! so the dialog can still open.
use std::fmt;

use serde::Serialize;

use super::Gateway;
use super::models::PromptTemplate;

pub const DEFAULT_TEMPLATE_ID: &str = "general_assistant";

const BUILTIN_TEMPLATES: &[(&str, &str, &str, &[&str])] = &[
    (
        "general_assistant",
        "General Assistant",
        "General assistive guidance with governance guardrails.",
        &["general", "assistive"],
    ),
    (
        "lot_compliance",
        "Lot Compliance Check",
        "Checks likely compliance gaps for lot-level quality and traceability.",
        &["compliance", "lot", "qa"],
    ),
    (
        "capa_draft",
        "CAPA Draft",
        "Drafts a corrective and preventive action recommendation.",
        &["capa", "quality"],
    ),
    (
        "evidence_summary",
        "Evidence Summary",
        "Summarizes evidence into an auditor-friendly narrative.",
        &["evidence", "audit"],
    ),
    (
        "risk_audit",
        "Risk Audit",
        "Highlights likely operational and compliance risks with suggested checks.",
        &["risk", "compliance"],
    ),
];

pub fn builtin_templates() -> Vec<PromptTemplate> {
    BUILTIN_TEMPLATES
        .iter()
        .map(|(id, name, description, tags)| PromptTemplate {
            template_id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogSource {
    Gateway,
    LocalFallback,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CatalogSource::Gateway => f.write_str("gateway"),
            CatalogSource::LocalFallback => f.write_str("local-fallback"),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TemplateCatalog {
    pub source: CatalogSource,
    pub templates: Vec<PromptTemplate>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModelCatalog {
    pub source: CatalogSource,
    pub provider: String,
    pub default_model: String,
    pub models: Vec<String>,
}

pub async fn list_prompt_templates(gateway: &dyn Gateway) -> TemplateCatalog {
    match gateway.prompt_templates().await {
        Ok(templates) if !templates.is_empty() => TemplateCatalog {
            source: CatalogSource::Gateway,
            templates,
        },
        // An empty list from the gateway still means it answered
        Ok(_) => TemplateCatalog {
            source: CatalogSource::Gateway,
            templates: builtin_templates(),
        },
        Err(e) => {
            tracing::warn!("Falling back to built-in prompt templates: {}", e);
            TemplateCatalog {
                source: CatalogSource::LocalFallback,
                templates: builtin_templates(),
            }
        }
    }
}

pub async fn list_available_models(gateway: &dyn Gateway, default_model: &str) -> ModelCatalog {
    match gateway.available_models().await {
        Ok(reply) => ModelCatalog {
            source: CatalogSource::Gateway,
            provider: reply.provider.unwrap_or_else(|| String::from("gateway")),
            default_model: reply
                .default_model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| default_model.to_string()),
            models: reply.models,
        },
        Err(e) => {
            tracing::warn!("Falling back to the configured default model: {}", e);
            ModelCatalog {
                source: CatalogSource::LocalFallback,
                provider: CatalogSource::LocalFallback.to_string(),
                default_model: default_model.to_string(),
                models: vec![default_model.to_string()],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::gateway::models::ModelsReply;

    #[test]
    fn test_builtin_templates() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 5);
        assert_eq!(templates[0].template_id, DEFAULT_TEMPLATE_ID);
        assert!(templates.iter().any(|t| t.template_id == "capa_draft"));
    }

    #[tokio::test]
    async fn it_uses_gateway_templates() {
        let gateway = FakeGateway::offline().with_templates(vec![PromptTemplate {
            template_id: "site_onboarding".to_string(),
            name: "Site Onboarding".to_string(),
            description: String::new(),
            tags: vec![],
        }]);

        let catalog = list_prompt_templates(&gateway).await;
        assert_eq!(catalog.source, CatalogSource::Gateway);
        assert_eq!(catalog.templates.len(), 1);
        assert_eq!(catalog.templates[0].template_id, "site_onboarding");
    }

    #[tokio::test]
    async fn it_falls_back_to_builtin_templates() {
        let gateway = FakeGateway::offline();
        let catalog = list_prompt_templates(&gateway).await;
        assert_eq!(catalog.source, CatalogSource::LocalFallback);
        assert_eq!(catalog.templates, builtin_templates());

        let gateway = FakeGateway::offline().with_templates(vec![]);
        let catalog = list_prompt_templates(&gateway).await;
        assert_eq!(catalog.source, CatalogSource::Gateway);
        assert_eq!(catalog.templates.len(), 5);
    }

    #[tokio::test]
    async fn it_uses_gateway_models() {
        let gateway = FakeGateway::offline().with_models(ModelsReply {
            models: vec!["llama3.2:3b".to_string(), "qwen2.5:7b".to_string()],
            default_model: Some("qwen2.5:7b".to_string()),
            provider: Some("ollama".to_string()),
        });

        let catalog = list_available_models(&gateway, "llama3.2:3b").await;
        assert_eq!(catalog.source, CatalogSource::Gateway);
        assert_eq!(catalog.provider, "ollama");
        assert_eq!(catalog.default_model, "qwen2.5:7b");
        assert_eq!(catalog.models.len(), 2);
    }

    #[tokio::test]
    async fn it_falls_back_to_default_model() {
        let gateway = FakeGateway::offline();
        let catalog = list_available_models(&gateway, "llama3.2:3b").await;
        assert_eq!(catalog.source, CatalogSource::LocalFallback);
        assert_eq!(catalog.provider, "local-fallback");
        assert_eq!(catalog.models, vec!["llama3.2:3b".to_string()]);
    }
}
