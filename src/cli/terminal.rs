use anyhow::Result;
use htmd::HtmlToMarkdown;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::workflow::{ConfirmAnswer, Notice, Presenter};

/// Presents the workflow on a terminal. Responses are converted from
/// HTML to markdown, notices and busy messages go to stderr.
pub struct TerminalPresenter {
    editor: DefaultEditor,
    converter: HtmlToMarkdown,
}

impl TerminalPresenter {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        let converter = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style", "img", "svg"])
            .build();
        Ok(Self { editor, converter })
    }

    /// Reads one line. `None` when the user hits Ctrl-C or Ctrl-D.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn parse_answer(line: &str) -> ConfirmAnswer {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" => ConfirmAnswer::Yes,
        _ => ConfirmAnswer::No,
    }
}

impl Presenter for TerminalPresenter {
    fn freeze(&mut self, message: &str) {
        if !message.is_empty() {
            eprintln!("{}", message);
        }
    }

    fn unfreeze(&mut self) {}

    fn show(&mut self, title: &str, html: &str) {
        let body = self.converter.convert(html).unwrap_or_else(|e| {
            tracing::warn!("Failed to convert response to markdown: {}", e);
            html.to_string()
        });
        println!("## {}\n\n{}\n", title, body.trim());
    }

    fn notify(&mut self, notice: &Notice) {
        eprintln!("{}", notice);
    }

    fn confirm(&mut self, question: &str) -> ConfirmAnswer {
        match self.editor.readline(&format!("{} [y/N] ", question)) {
            Ok(line) => parse_answer(&line),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => ConfirmAnswer::Dismissed,
            Err(err) => {
                tracing::warn!("Failed to read confirmation: {:?}", err);
                ConfirmAnswer::Dismissed
            }
        }
    }
}
