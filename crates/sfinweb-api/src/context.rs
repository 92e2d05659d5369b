//! Per-request collaborators of the views
//!
//! Every request builds its own notice board, redirect slot and preset
//! confirmation. After the controller ran, the pending redirect becomes the
//! HTTP answer and the collected notices are rendered otherwise.

use std::sync::Arc;

use sfinweb_core::controllers::transaction_batch::TRANSACTIONS_SAVED;
use sfinweb_core::controllers::transaction_detail::{TRANSACTION_DELETED, TRANSACTION_SAVED};
use sfinweb_core::{
    Notice, NoticeBoard, PendingRedirect, PresetConfirm, Services, ViewContext,
};

/// Success messages a redirect may carry as `flash`
const FLASH_MESSAGES: [&str; 3] = [TRANSACTION_SAVED, TRANSACTION_DELETED, TRANSACTIONS_SAVED];

pub struct RequestContext {
    pub notices: Arc<NoticeBoard>,
    pub redirect: Arc<PendingRedirect>,
    pub confirm: Arc<PresetConfirm>,
    view: ViewContext,
}

impl RequestContext {
    /// `confirmed` is the answer to any confirmation asked during the request
    pub fn new(services: &Services, confirmed: bool) -> Self {
        let notices = Arc::new(NoticeBoard::new());
        let redirect = Arc::new(PendingRedirect::new());
        let confirm = Arc::new(PresetConfirm::new(confirmed));
        let view = ViewContext {
            services: services.clone(),
            notifier: notices.clone(),
            navigator: redirect.clone(),
            confirm: confirm.clone(),
        };
        Self {
            notices,
            redirect,
            confirm,
            view,
        }
    }

    pub fn view(&self) -> &ViewContext {
        &self.view
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.notices()
    }

    /// Redirect target with the last success message carried as `flash`
    pub fn redirect_target(&self) -> Option<String> {
        let target = self.redirect.target()?;
        Some(match self.notices.last_success() {
            Some(message) => with_flash(&target, &message),
            None => target,
        })
    }
}

/// The flash message if it is one the views produce; anything else is dropped
pub fn known_flash(message: &str) -> Option<&'static str> {
    FLASH_MESSAGES.iter().copied().find(|known| *known == message)
}

pub fn with_flash(target: &str, message: &str) -> String {
    let separator = if target.contains('?') { '&' } else { '?' };
    format!("{}{}flash={}", target, separator, urlencoding::encode(message))
}
