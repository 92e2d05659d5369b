//! Navigation and confirmation collaborators

use async_trait::async_trait;
use std::sync::Mutex;

/// Moves the user to another view
pub trait Navigator: Send + Sync {
    fn go_to_url(&self, path: &str);
}

/// Navigator that records the target; the web layer turns it into a redirect
#[derive(Debug, Default)]
pub struct PendingRedirect {
    target: Mutex<Option<String>>,
}

impl PendingRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the view asked to go, if anywhere
    pub fn target(&self) -> Option<String> {
        self.target.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Navigator for PendingRedirect {
    fn go_to_url(&self, path: &str) {
        log::debug!("Navigating to {}", path);
        *self.target.lock().unwrap_or_else(|e| e.into_inner()) = Some(path.to_string());
    }
}

/// Asks the user to affirm a destructive action
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Confirmation whose answer is known up front (a submitted form field)
///
/// The question is remembered so a declined request can render it.
#[derive(Debug)]
pub struct PresetConfirm {
    answer: bool,
    asked: Mutex<Option<String>>,
}

impl PresetConfirm {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(None),
        }
    }

    /// The last question asked
    pub fn prompt(&self) -> Option<String> {
        self.asked.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Confirm for PresetConfirm {
    async fn confirm(&self, message: &str) -> bool {
        *self.asked.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
        self.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_redirect_keeps_last_target() {
        let redirect = PendingRedirect::new();
        assert_eq!(redirect.target(), None);

        redirect.go_to_url("/tags");
        redirect.go_to_url("/transactions");
        assert_eq!(redirect.target().as_deref(), Some("/transactions"));
    }

    #[tokio::test]
    async fn test_preset_confirm_records_prompt() {
        let confirm = PresetConfirm::new(false);
        assert!(!confirm.confirm("Delete?").await);
        assert_eq!(confirm.prompt().as_deref(), Some("Delete?"));
    }
}
