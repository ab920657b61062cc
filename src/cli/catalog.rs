use anyhow::Result;

use crate::core::AppConfig;
use crate::gateway::HttpGateway;
use crate::gateway::catalog::{list_available_models, list_prompt_templates};

pub async fn templates(config: &AppConfig) -> Result<()> {
    let gateway = HttpGateway::from_config(config)?;
    let catalog = list_prompt_templates(&gateway).await;

    println!("Prompt templates ({})", catalog.source);
    for template in catalog.templates {
        println!("  {:<20} {}", template.template_id, template.name);
        if !template.description.is_empty() {
            println!("  {:<20} {}", "", template.description);
        }
    }
    Ok(())
}

pub async fn models(config: &AppConfig) -> Result<()> {
    let gateway = HttpGateway::from_config(config)?;
    let catalog = list_available_models(&gateway, &config.default_model).await;

    println!("Models from {} ({})", catalog.provider, catalog.source);
    for model in catalog.models {
        let marker = if model == catalog.default_model { "*" } else { " " };
        println!("{} {}", marker, model);
    }
    Ok(())
}
