use uuid::Uuid;

use super::decision::{AcceptEffect, DecisionRecord, prompt_decision};
use super::notice::Notice;
use super::presenter::Presenter;
use super::render::{RenderOutcome, render_assistive_response};
use super::request::{SuggestionQuery, request_suggestion};
use super::state::{StateMachine, WorkflowState};
use crate::gateway::{AssistiveResponse, Decision, Gateway};

/// Everything needed to run one assistive interaction. Built by a
/// dispatch handler from the host context.
#[derive(Clone, Debug, PartialEq)]
pub struct Invocation {
    pub subject_id: String,
    pub query: SuggestionQuery,
    pub title: String,
    pub freeze_message: String,
    pub confirm_question: String,
    /// Run the accept effect before logging an accepted decision.
    pub apply_on_accept: bool,
}

#[derive(Debug)]
pub struct WorkflowReport {
    pub invocation_id: Uuid,
    pub trace: Vec<WorkflowState>,
    pub response: AssistiveResponse,
    pub decision: Option<DecisionRecord>,
}

impl WorkflowReport {
    pub fn final_state(&self) -> WorkflowState {
        self.trace.last().copied().unwrap_or(WorkflowState::Idle)
    }

    /// True once the invocation reached a state it can't leave.
    pub fn is_finished(&self) -> bool {
        self.final_state()
            .ends_invocation(!self.response.interaction_log.is_empty())
    }
}

fn step(machine: &mut StateMachine, next: WorkflowState, invocation_id: &Uuid) {
    if let Err(e) = machine.advance(next) {
        tracing::error!(%invocation_id, "{}", e);
    }
}

/// Drives one invocation from request to recorded decision.
///
/// Nothing escapes as an error: every path ends in a rendered
/// response, a notice, or both.
pub struct Workflow<'a> {
    gateway: &'a dyn Gateway,
    accept_effect: Option<&'a dyn AcceptEffect>,
}

impl<'a> Workflow<'a> {
    pub fn new(gateway: &'a dyn Gateway) -> Self {
        Self {
            gateway,
            accept_effect: None,
        }
    }

    pub fn accept_effect(mut self, effect: &'a dyn AcceptEffect) -> Self {
        self.accept_effect = Some(effect);
        self
    }

    pub async fn run(
        &self,
        presenter: &mut dyn Presenter,
        invocation: &Invocation,
    ) -> WorkflowReport {
        let invocation_id = Uuid::new_v4();
        let kind = invocation.query.kind();
        let mut machine = StateMachine::new();
        tracing::info!(
            %invocation_id,
            %kind,
            subject = %invocation.subject_id,
            "Starting assistive interaction"
        );

        step(&mut machine, WorkflowState::Requesting, &invocation_id);
        presenter.freeze(&invocation.freeze_message);
        let response =
            request_suggestion(self.gateway, &invocation.subject_id, &invocation.query).await;
        presenter.unfreeze();

        let outcome = render_assistive_response(&response).unwrap_or_else(|e| {
            tracing::error!(%invocation_id, "Failed to render assistive response: {}", e);
            RenderOutcome::NoResponse(Notice::info(super::render::NO_SUGGESTION))
        });

        let (html, interaction_log) = match outcome {
            RenderOutcome::NoResponse(notice) => {
                presenter.notify(&notice);
                step(&mut machine, WorkflowState::NoResponse, &invocation_id);
                return WorkflowReport {
                    invocation_id,
                    trace: machine.into_trace(),
                    response,
                    decision: None,
                };
            }
            RenderOutcome::Rendered {
                html,
                interaction_log,
            } => (html, interaction_log),
        };

        presenter.show(&invocation.title, &html);
        step(&mut machine, WorkflowState::Rendered, &invocation_id);

        if interaction_log.is_empty() {
            tracing::debug!(%invocation_id, "Response not logged, no decision to record");
            return WorkflowReport {
                invocation_id,
                trace: machine.into_trace(),
                response,
                decision: None,
            };
        }

        step(&mut machine, WorkflowState::AwaitingDecision, &invocation_id);
        let effect = if invocation.apply_on_accept {
            self.accept_effect
        } else {
            None
        };
        let decision = prompt_decision(
            presenter,
            self.gateway,
            &interaction_log,
            &invocation.confirm_question,
            &response.content,
            effect,
        )
        .await;

        if let Some(record) = &decision {
            let terminal = match record.decision {
                Decision::Accepted => WorkflowState::Accepted,
                Decision::Rejected => WorkflowState::Rejected,
            };
            step(&mut machine, terminal, &invocation_id);
        }

        tracing::info!(%invocation_id, state = %machine.current(), "Assistive interaction finished");
        WorkflowReport {
            invocation_id,
            trace: machine.into_trace(),
            response,
            decision,
        }
    }
}
