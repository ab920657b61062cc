//! The seam between the workflow and whatever shows it to a human.
use super::notice::Notice;

/// The human's answer to a yes/no confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
    /// Closed without answering.
    Dismissed,
}

/// Everything the workflow needs from a UI. Implementations are
/// injected by the caller; the workflow never reaches for ambient
/// UI state.
pub trait Presenter {
    /// Marks the UI busy while a remote call is in flight.
    fn freeze(&mut self, message: &str);

    fn unfreeze(&mut self);

    /// Shows an already escaped HTML fragment.
    fn show(&mut self, title: &str, html: &str);

    fn notify(&mut self, notice: &Notice);

    /// Blocks until the human answers. There is no timeout.
    fn confirm(&mut self, question: &str) -> ConfirmAnswer;
}
