//! Asking for and recording the human's accept/reject decision.
use anyhow::Result;
use async_trait::async_trait;

use super::notice::Notice;
use super::presenter::{ConfirmAnswer, Presenter};
use crate::gateway::{Decision, DecisionRequest, Gateway, InteractionLogRef};

pub const EFFECT_FAILED: &str = "Suggestion was not saved, but decision will still be logged.";
pub const DECISION_UNAVAILABLE: &str = "AI decision log update is not available.";
pub const DECISION_FAILED: &str = "Could not update AI decision log.";

impl ConfirmAnswer {
    /// Dismissing the confirmation counts as a rejection so every
    /// prompted interaction ends up with a recorded decision.
    pub fn resolve(self) -> Decision {
        match self {
            ConfirmAnswer::Yes => Decision::Accepted,
            ConfirmAnswer::No | ConfirmAnswer::Dismissed => Decision::Rejected,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// No interaction log, nothing was sent.
    Skipped,
    /// The gateway recorded the decision, as echoed back.
    Recorded(String),
    /// The gateway answered but can't record decisions.
    Unavailable,
    /// The gateway couldn't be reached.
    Failed(String),
}

impl DecisionOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            DecisionOutcome::Skipped => None,
            DecisionOutcome::Recorded(decision) => Some(Notice::success(&format!(
                "AI decision logged: {}",
                decision
            ))),
            DecisionOutcome::Unavailable => Some(Notice::warning(DECISION_UNAVAILABLE)),
            DecisionOutcome::Failed(_) => Some(Notice::error(DECISION_FAILED)),
        }
    }
}

pub async fn submit_decision(
    gateway: &dyn Gateway,
    interaction_log: &InteractionLogRef,
    decision: Decision,
) -> DecisionOutcome {
    if interaction_log.is_empty() {
        return DecisionOutcome::Skipped;
    }

    let request = DecisionRequest {
        interaction_log: interaction_log.clone(),
        decision,
    };
    match gateway.set_decision(&request).await {
        Ok(reply) if reply.ok => {
            let recorded = reply
                .decision
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| decision.to_string());
            tracing::info!(interaction_log = %interaction_log, decision = %recorded, "AI decision logged");
            DecisionOutcome::Recorded(recorded)
        }
        Ok(reply) => {
            tracing::warn!(
                interaction_log = %interaction_log,
                status = reply.status.as_deref().unwrap_or(""),
                "AI decision logging is not available"
            );
            DecisionOutcome::Unavailable
        }
        Err(e) => {
            tracing::error!(interaction_log = %interaction_log, "Could not update AI decision log: {}", e);
            DecisionOutcome::Failed(e.to_string())
        }
    }
}

/// Runs before an accepted decision is submitted, e.g. to write the
/// accepted text back into the record it was generated for.
#[async_trait]
pub trait AcceptEffect: Send + Sync {
    async fn apply(&self, content: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionRecord {
    pub decision: Decision,
    pub answer: ConfirmAnswer,
    pub outcome: DecisionOutcome,
}

/// Asks the human to accept or reject and records the answer.
///
/// Returns `None` without asking when there is no interaction log.
/// Otherwise exactly one decision is submitted. A failing accept
/// effect only produces a warning, the decision is still logged.
pub async fn prompt_decision(
    presenter: &mut dyn Presenter,
    gateway: &dyn Gateway,
    interaction_log: &InteractionLogRef,
    question: &str,
    content: &str,
    effect: Option<&dyn AcceptEffect>,
) -> Option<DecisionRecord> {
    if interaction_log.is_empty() {
        tracing::debug!("No interaction log, skipping decision prompt");
        return None;
    }

    let answer = presenter.confirm(question);
    let decision = answer.resolve();
    if answer == ConfirmAnswer::Dismissed {
        tracing::debug!(interaction_log = %interaction_log, "Confirmation dismissed, recording rejection");
    }

    if decision == Decision::Accepted
        && let Some(effect) = effect
        && !content.trim().is_empty()
        && let Err(e) = effect.apply(content).await
    {
        tracing::warn!(interaction_log = %interaction_log, "Accept effect failed: {}", e);
        presenter.notify(&Notice::warning(EFFECT_FAILED));
    }

    let outcome = submit_decision(gateway, interaction_log, decision).await;
    if let Some(notice) = outcome.notice() {
        presenter.notify(&notice);
    }

    Some(DecisionRecord {
        decision,
        answer,
        outcome,
    })
}
