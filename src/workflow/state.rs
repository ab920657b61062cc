//! Per-invocation state machine:
//!
//! `Idle -> Requesting -> NoResponse`
//! `Idle -> Requesting -> Rendered -> AwaitingDecision -> Accepted | Rejected`
//!
//! `Rendered` ends the invocation when the response wasn't logged.
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Requesting,
    NoResponse,
    Rendered,
    AwaitingDecision,
    Accepted,
    Rejected,
}

impl WorkflowState {
    /// Whether an invocation sitting in this state is over. `logged`
    /// is whether the response carried an interaction log, since an
    /// unlogged `Rendered` response has no decision left to wait for.
    pub fn ends_invocation(&self, logged: bool) -> bool {
        match self {
            WorkflowState::NoResponse | WorkflowState::Accepted | WorkflowState::Rejected => true,
            WorkflowState::Rendered => !logged,
            WorkflowState::Idle | WorkflowState::Requesting | WorkflowState::AwaitingDecision => {
                false
            }
        }
    }

    pub fn can_advance_to(&self, next: WorkflowState) -> bool {
        use WorkflowState::*;
        matches!(
            (self, next),
            (Idle, Requesting)
                | (Requesting, NoResponse)
                | (Requesting, Rendered)
                | (Rendered, AwaitingDecision)
                | (AwaitingDecision, Accepted)
                | (AwaitingDecision, Rejected)
        )
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("Invalid workflow transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: WorkflowState,
    pub to: WorkflowState,
}

/// Tracks the current state and every state visited so far.
#[derive(Debug)]
pub struct StateMachine {
    trace: Vec<WorkflowState>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            trace: vec![WorkflowState::Idle],
        }
    }

    pub fn current(&self) -> WorkflowState {
        // Never empty, seeded with `Idle`
        self.trace.last().copied().unwrap_or(WorkflowState::Idle)
    }

    pub fn advance(&mut self, next: WorkflowState) -> Result<WorkflowState, InvalidTransition> {
        let from = self.current();
        if !from.can_advance_to(next) {
            return Err(InvalidTransition { from, to: next });
        }
        self.trace.push(next);
        Ok(next)
    }

    pub fn trace(&self) -> &[WorkflowState] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<WorkflowState> {
        self.trace
    }
}
