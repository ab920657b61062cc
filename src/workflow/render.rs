//! Renders assistive responses as HTML fragments using Handlebars.
//! Every `{{value}}` goes through Handlebars' HTML escaping, which is
//! what keeps AI generated or otherwise untrusted text from being
//! interpreted as markup. Never use triple-stash `{{{value}}}` here.

use std::fmt;

use anyhow::Result;
use handlebars::Handlebars;
use serde::Serialize;

use super::notice::Notice;
use crate::gateway::{AssistiveResponse, InteractionLogRef};

/// Shown on every successful assistive render. This is a compliance
/// requirement and must stay verbatim.
pub const DISCLAIMER: &str = "Assistive only — Review required";

pub const NO_SUGGESTION: &str = "No suggestion available.";

#[derive(Debug)]
pub enum View {
    AssistiveResponse,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Sections are in a fixed order: warning, disclaimer, content,
// counts, provider footer, interaction log.
const ASSISTIVE_RESPONSE_VIEW: &str = r#"{{#if warning}}<div class="assist-warning">{{warning}}</div>
{{/if}}<div class="assist-disclaimer"><strong>{{disclaimer}}</strong></div>
<pre class="assist-content">{{content}}</pre>
{{#if counts}}<hr>
{{#each counts}}<div class="assist-count">{{label}}: {{value}}</div>
{{/each}}{{/if}}<div class="assist-meta">Provider: {{provider}}{{#if model}} | Model: {{model}}{{/if}}{{#if template_id}} | Template: {{template_id}}{{/if}} | Redactions: {{redaction_count}}</div>
<div class="assist-meta">Interaction Log: {{#if interaction_log}}{{interaction_log}}{{else}}Not available{{/if}}</div>
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(&View::AssistiveResponse.to_string(), ASSISTIVE_RESPONSE_VIEW)
        .expect("Failed to register template");
    registry
}

#[derive(Serialize)]
struct CountRow {
    label: &'static str,
    value: u64,
}

// Every field is always present so strict mode never trips on a
// missing key. Empty strings and lists are falsy for `#if`.
#[derive(Serialize)]
struct ResponseView<'a> {
    warning: &'a str,
    disclaimer: &'static str,
    content: &'a str,
    counts: Vec<CountRow>,
    provider: &'a str,
    model: &'a str,
    template_id: &'a str,
    redaction_count: u32,
    interaction_log: &'a str,
}

fn count_rows(response: &AssistiveResponse) -> Vec<CountRow> {
    let mut rows = Vec::new();
    if let Some(findings) = &response.findings {
        let c = &findings.counts;
        rows.push(CountRow {
            label: "Missing/Stale Tests",
            value: c.missing_or_stale_tests,
        });
        rows.push(CountRow {
            label: "Missing/Expired Required Certificates",
            value: c.missing_or_expired_required_certificates,
        });
        rows.push(CountRow {
            label: "Expired Certificates",
            value: c.expired_certificates,
        });
        rows.push(CountRow {
            label: "Open Nonconformance",
            value: c.open_nonconformance,
        });
    }
    if let Some(context) = &response.context {
        let c = &context.counts;
        rows.push(CountRow {
            label: "Lots",
            value: c.lots,
        });
        rows.push(CountRow {
            label: "QC Tests",
            value: c.qc_tests,
        });
        rows.push(CountRow {
            label: "Certificates",
            value: c.certificates,
        });
        rows.push(CountRow {
            label: "Nonconformance",
            value: c.nonconformance,
        });
    }
    rows
}

#[derive(Debug)]
pub enum RenderOutcome {
    /// Nothing usable came back. The invocation ends here and no
    /// decision is asked for.
    NoResponse(Notice),
    Rendered {
        html: String,
        interaction_log: InteractionLogRef,
    },
}

pub fn render_assistive_response(response: &AssistiveResponse) -> Result<RenderOutcome> {
    if !response.ok {
        return Ok(RenderOutcome::NoResponse(Notice::info(NO_SUGGESTION)));
    }

    let view = ResponseView {
        warning: response.warning_text().unwrap_or(""),
        disclaimer: DISCLAIMER,
        content: &response.content,
        counts: count_rows(response),
        provider: &response.provider,
        model: response.gateway.model.as_deref().unwrap_or(""),
        template_id: response.gateway.template_id.as_deref().unwrap_or(""),
        redaction_count: response.gateway.redaction_count,
        interaction_log: response.interaction_log.as_str(),
    };
    let html = templates().render(&View::AssistiveResponse.to_string(), &view)?;

    Ok(RenderOutcome::Rendered {
        html,
        interaction_log: response.interaction_log.clone(),
    })
}
