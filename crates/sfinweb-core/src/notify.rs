//! User-facing notices (toasts)

use serde::Serialize;
use std::sync::Mutex;

use crate::error::CoreError;

/// Notice level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Reporter used by the views
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);

    fn success(&self, message: &str);

    /// Report a failed backend call
    fn api_error(&self, error: &CoreError);
}

/// Notifier that keeps notices until the view is rendered
#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: NoticeLevel, message: String) {
        let mut notices = self.notices.lock().unwrap_or_else(|e| e.into_inner());
        notices.push(Notice { level, message });
    }

    /// Snapshot of the collected notices
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Most recent success message, if any
    pub fn last_success(&self) -> Option<String> {
        self.notices()
            .into_iter()
            .rev()
            .find(|n| n.level == NoticeLevel::Success)
            .map(|n| n.message)
    }
}

impl Notifier for NoticeBoard {
    fn info(&self, message: &str) {
        log::info!(target: "sfinweb::notice", "{}", message);
        self.push(NoticeLevel::Info, message.to_string());
    }

    fn success(&self, message: &str) {
        log::info!(target: "sfinweb::notice", "{}", message);
        self.push(NoticeLevel::Success, message.to_string());
    }

    fn api_error(&self, error: &CoreError) {
        log::warn!(
            target: "sfinweb::notice",
            "API error [{}] ({}): {}",
            error.code(),
            error.severity(),
            error
        );
        self.push(NoticeLevel::Error, error.to_string());
    }
}
