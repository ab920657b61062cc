//! Maps (entity, event) pairs to the handlers that turn a host
//! context into a workflow invocation.
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::driver::Invocation;
use super::request::{ChatParams, SuggestionQuery};
use crate::gateway::ChatFilters;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Lot,
    EvidencePack,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Lot => f.write_str("lot"),
            EntityKind::EvidencePack => f.write_str("evidence-pack"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    ComplianceSuggestion,
    NarrativeSummary,
    AssistantChat,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EventKind::ComplianceSuggestion => f.write_str("compliance-suggestion"),
            EventKind::NarrativeSummary => f.write_str("narrative-summary"),
            EventKind::AssistantChat => f.write_str("assistant-chat"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subject {
    pub entity: EntityKind,
    pub id: String,
    /// Not saved yet, so the gateway has nothing to look up.
    pub is_new: bool,
}

impl Subject {
    pub fn new(entity: EntityKind, id: &str) -> Self {
        Self {
            entity,
            id: id.trim().to_string(),
            is_new: false,
        }
    }
}

/// Passed explicitly into every handler in place of ambient UI state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostContext {
    pub user: String,
    pub subject: Subject,
    /// The human can't edit the subject. Accept write-back is
    /// suppressed but decisions are still logged.
    pub read_only: bool,
}

impl HostContext {
    pub fn new(user: &str, subject: Subject) -> Self {
        Self {
            user: user.to_string(),
            subject,
            read_only: false,
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// Extra input gathered by the caller before dispatching.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventInput {
    #[default]
    None,
    Filters(ChatFilters),
    Chat(ChatParams),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Refusal {
    #[error("Save the {0} before asking for AI assistance")]
    UnsavedSubject(EntityKind),
    #[error("No AI assistance is available for {event} on {entity}")]
    NoHandler { entity: EntityKind, event: EventKind },
    #[error("Please enter a message.")]
    EmptyMessage,
    #[error("Unexpected input for {0}")]
    InputMismatch(EventKind),
}

pub type Handler = fn(&HostContext, EventInput) -> Result<Invocation, Refusal>;

fn compliance_suggestion(host: &HostContext, input: EventInput) -> Result<Invocation, Refusal> {
    let filters = match input {
        EventInput::None => None,
        EventInput::Filters(filters) => Some(filters),
        EventInput::Chat(_) => return Err(Refusal::InputMismatch(EventKind::ComplianceSuggestion)),
    };
    Ok(Invocation {
        subject_id: host.subject.id.clone(),
        query: SuggestionQuery::Compliance { filters },
        title: String::from("AI Compliance Suggestion"),
        freeze_message: String::from("Generating assistive compliance suggestion..."),
        confirm_question: String::from("Do you accept this AI compliance suggestion?"),
        apply_on_accept: false,
    })
}

fn narrative_summary(host: &HostContext, input: EventInput) -> Result<Invocation, Refusal> {
    let filters = match input {
        EventInput::None => None,
        EventInput::Filters(filters) => Some(filters),
        EventInput::Chat(_) => return Err(Refusal::InputMismatch(EventKind::NarrativeSummary)),
    };
    Ok(Invocation {
        subject_id: host.subject.id.clone(),
        query: SuggestionQuery::Narrative { filters },
        title: String::from("AI Narrative Summary"),
        freeze_message: String::from("Generating assistive evidence summary..."),
        confirm_question: String::from("Do you accept this AI evidence summary suggestion?"),
        apply_on_accept: !host.read_only,
    })
}

fn assistant_chat(host: &HostContext, input: EventInput) -> Result<Invocation, Refusal> {
    let EventInput::Chat(params) = input else {
        return Err(Refusal::InputMismatch(EventKind::AssistantChat));
    };
    if params.message.trim().is_empty() {
        return Err(Refusal::EmptyMessage);
    }
    Ok(Invocation {
        subject_id: host.subject.id.clone(),
        query: SuggestionQuery::Chat(params),
        title: String::from("AI Assistant Chat"),
        freeze_message: String::from("Waiting for AI assistant..."),
        confirm_question: String::from("Do you accept this AI assistant reply?"),
        apply_on_accept: false,
    })
}

pub struct Dispatcher {
    handlers: HashMap<(EntityKind, EventKind), Handler>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.register(
            EntityKind::Lot,
            EventKind::ComplianceSuggestion,
            compliance_suggestion,
        );
        dispatcher.register(
            EntityKind::EvidencePack,
            EventKind::NarrativeSummary,
            narrative_summary,
        );
        dispatcher.register(EntityKind::Lot, EventKind::AssistantChat, assistant_chat);
        dispatcher
    }
}

impl Dispatcher {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Replaces any handler already registered for the pair.
    pub fn register(&mut self, entity: EntityKind, event: EventKind, handler: Handler) {
        self.handlers.insert((entity, event), handler);
    }

    pub fn dispatch(
        &self,
        host: &HostContext,
        event: EventKind,
        input: EventInput,
    ) -> Result<Invocation, Refusal> {
        let entity = host.subject.entity;
        let handler = self
            .handlers
            .get(&(entity, event))
            .ok_or(Refusal::NoHandler { entity, event })?;
        if host.subject.is_new || host.subject.id.trim().is_empty() {
            return Err(Refusal::UnsavedSubject(entity));
        }
        tracing::debug!(%entity, %event, user = %host.user, subject = %host.subject.id, "Dispatching");
        handler(host, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot() -> HostContext {
        HostContext::new("qa@example.com", Subject::new(EntityKind::Lot, "LOT-001"))
    }

    fn pack() -> HostContext {
        HostContext::new(
            "qa@example.com",
            Subject::new(EntityKind::EvidencePack, "EP-0001"),
        )
    }

    #[test]
    fn it_dispatches_registered_pairs() {
        let dispatcher = Dispatcher::default();

        let compliance = dispatcher
            .dispatch(&lot(), EventKind::ComplianceSuggestion, EventInput::None)
            .unwrap();
        assert_eq!(compliance.subject_id, "LOT-001");
        assert_eq!(compliance.title, "AI Compliance Suggestion");
        assert!(!compliance.apply_on_accept);

        let summary = dispatcher
            .dispatch(&pack(), EventKind::NarrativeSummary, EventInput::None)
            .unwrap();
        assert_eq!(summary.query, SuggestionQuery::Narrative { filters: None });
        assert_eq!(
            summary.confirm_question,
            "Do you accept this AI evidence summary suggestion?"
        );
        assert!(summary.apply_on_accept);
    }

    #[test]
    fn it_refuses_unknown_pairs() {
        let dispatcher = Dispatcher::default();
        let err = dispatcher
            .dispatch(&pack(), EventKind::ComplianceSuggestion, EventInput::None)
            .unwrap_err();
        assert_eq!(
            err,
            Refusal::NoHandler {
                entity: EntityKind::EvidencePack,
                event: EventKind::ComplianceSuggestion
            }
        );
    }

    #[test]
    fn it_refuses_unsaved_subjects() {
        let dispatcher = Dispatcher::default();
        let mut host = lot();
        host.subject.is_new = true;
        let err = dispatcher
            .dispatch(&host, EventKind::ComplianceSuggestion, EventInput::None)
            .unwrap_err();
        assert_eq!(err, Refusal::UnsavedSubject(EntityKind::Lot));
        assert_eq!(err.to_string(), "Save the lot before asking for AI assistance");
    }

    #[test]
    fn it_suppresses_write_back_when_read_only() {
        let dispatcher = Dispatcher::default();
        let invocation = dispatcher
            .dispatch(
                &pack().read_only(true),
                EventKind::NarrativeSummary,
                EventInput::None,
            )
            .unwrap();
        assert!(!invocation.apply_on_accept);
    }

    #[test]
    fn it_passes_filters_through() {
        let dispatcher = Dispatcher::default();
        let filters = ChatFilters {
            include_expired_certificates: true,
            ..Default::default()
        };
        let invocation = dispatcher
            .dispatch(
                &lot(),
                EventKind::ComplianceSuggestion,
                EventInput::Filters(filters.clone()),
            )
            .unwrap();
        assert_eq!(
            invocation.query,
            SuggestionQuery::Compliance {
                filters: Some(filters)
            }
        );
    }

    #[test]
    fn it_refuses_empty_chat_messages() {
        let dispatcher = Dispatcher::default();
        let input = EventInput::Chat(ChatParams {
            message: "   ".to_string(),
            ..Default::default()
        });
        let err = dispatcher
            .dispatch(&lot(), EventKind::AssistantChat, input)
            .unwrap_err();
        assert_eq!(err, Refusal::EmptyMessage);

        let err = dispatcher
            .dispatch(&lot(), EventKind::AssistantChat, EventInput::None)
            .unwrap_err();
        assert_eq!(err, Refusal::InputMismatch(EventKind::AssistantChat));
    }

    #[test]
    fn it_lets_callers_register_handlers() {
        fn summary_for_lot(host: &HostContext, _input: EventInput) -> Result<Invocation, Refusal> {
            Ok(Invocation {
                subject_id: host.subject.id.clone(),
                query: SuggestionQuery::Narrative { filters: None },
                title: "Lot Summary".to_string(),
                freeze_message: String::new(),
                confirm_question: "Accept?".to_string(),
                apply_on_accept: false,
            })
        }

        let mut dispatcher = Dispatcher::empty();
        assert!(
            dispatcher
                .dispatch(&lot(), EventKind::NarrativeSummary, EventInput::None)
                .is_err()
        );
        dispatcher.register(EntityKind::Lot, EventKind::NarrativeSummary, summary_for_lot);
        let invocation = dispatcher
            .dispatch(&lot(), EventKind::NarrativeSummary, EventInput::None)
            .unwrap();
        assert_eq!(invocation.title, "Lot Summary");
    }
}
