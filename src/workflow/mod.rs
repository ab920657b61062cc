//! The assistive interaction workflow: request a suggestion, render
//! it for review, and record the human's decision.
pub mod chat;
pub mod decision;
pub mod dispatch;
pub mod driver;
pub mod notice;
pub mod presenter;
pub mod render;
pub mod request;
pub mod state;

pub use chat::{ChatSession, Transcript};
pub use decision::{AcceptEffect, DecisionOutcome, DecisionRecord, prompt_decision, submit_decision};
pub use dispatch::{Dispatcher, EntityKind, EventInput, EventKind, HostContext, Refusal, Subject};
pub use driver::{Invocation, Workflow, WorkflowReport};
pub use notice::{Notice, Severity};
pub use presenter::{ConfirmAnswer, Presenter};
pub use render::{RenderOutcome, render_assistive_response};
pub use request::{ChatParams, SuggestionKind, SuggestionQuery, request_suggestion};
pub use state::{InvalidTransition, StateMachine, WorkflowState};
