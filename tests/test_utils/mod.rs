//! Test utilities for integration tests
use std::time::Duration;

use trace_assist::gateway::HttpGateway;
use trace_assist::workflow::{ConfirmAnswer, Notice, Presenter};

pub fn test_gateway(server: &mockito::Server) -> HttpGateway {
    HttpGateway::new(&server.url(), "test-key", Duration::from_secs(2))
        .expect("Failed to build gateway")
}

/// Answers every confirmation the same way and keeps what it was
/// asked to show.
pub struct ScriptedPresenter {
    pub answer: ConfirmAnswer,
    pub frozen: bool,
    pub shown: Vec<(String, String)>,
    pub notices: Vec<Notice>,
    pub questions: Vec<String>,
}

impl ScriptedPresenter {
    pub fn answering(answer: ConfirmAnswer) -> Self {
        Self {
            answer,
            frozen: false,
            shown: Vec::new(),
            notices: Vec::new(),
            questions: Vec::new(),
        }
    }
}

impl Presenter for ScriptedPresenter {
    fn freeze(&mut self, _message: &str) {
        self.frozen = true;
    }

    fn unfreeze(&mut self) {
        self.frozen = false;
    }

    fn show(&mut self, title: &str, html: &str) {
        assert!(!self.frozen, "Shown while still frozen");
        self.shown.push((title.to_string(), html.to_string()));
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());
    }

    fn confirm(&mut self, question: &str) -> ConfirmAnswer {
        self.questions.push(question.to_string());
        self.answer
    }
}
