//! View controllers
//!
//! A controller is built from the data its route resolved and the
//! collaborators of the current view ([`ViewContext`]). Operations report
//! their result to the user through the notifier and return an outcome the
//! caller can render.

pub mod tag_list;
pub mod transaction_batch;
pub mod transaction_detail;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::location::{Confirm, Navigator};
use crate::notify::Notifier;
use crate::services::Services;

pub use tag_list::TagListController;
pub use transaction_batch::TransactionBatchController;
pub use transaction_detail::TransactionDetailController;

/// Collaborators injected into every controller
#[derive(Clone)]
pub struct ViewContext {
    pub services: Services,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub confirm: Arc<dyn Confirm>,
}

/// Result of a save operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Backend accepted the data, navigation requested
    Saved,
    /// No row differed from the skeleton, backend not called
    NothingToSave,
    /// Backend call failed and was reported
    Failed,
    /// Another action of this controller is still pending
    Busy,
}

/// Result of a remove operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Deleted,
    /// The user did not confirm, backend not called
    Declined,
    Failed,
    Busy,
}

/// At most one pending backend action per controller
#[derive(Debug, Default)]
pub(crate) struct InFlight(AtomicBool);

impl InFlight {
    pub(crate) fn begin(&self) -> Option<InFlightGuard<'_>> {
        if self.0.swap(true, Ordering::AcqRel) {
            log::debug!("Action ignored, another one is pending");
            return None;
        }
        Some(InFlightGuard(&self.0))
    }
}

pub(crate) struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use crate::error::CoreResult;
    use crate::location::{PendingRedirect, PresetConfirm};
    use crate::memory::InMemoryBackend;
    use crate::models::Transaction;
    use crate::notify::NoticeBoard;
    use crate::services::TransactionService;

    /// Writes stay pending for one poll, so a second action can overlap
    pub struct YieldingWrites(pub Arc<InMemoryBackend>);

    #[async_trait]
    impl TransactionService for YieldingWrites {
        async fn list(&self) -> CoreResult<Vec<Transaction>> {
            self.0.list().await
        }

        async fn get_all_descriptions(&self) -> CoreResult<Vec<String>> {
            self.0.get_all_descriptions().await
        }

        async fn skeleton(&self) -> CoreResult<Transaction> {
            self.0.skeleton().await
        }

        async fn get(&self, id: i64) -> CoreResult<Transaction> {
            self.0.get(id).await
        }

        async fn create(&self, transaction: &Transaction) -> CoreResult<Transaction> {
            tokio::task::yield_now().await;
            self.0.create(transaction).await
        }

        async fn update(&self, transaction: &Transaction) -> CoreResult<Transaction> {
            tokio::task::yield_now().await;
            self.0.update(transaction).await
        }

        async fn delete(&self, transaction: &Transaction) -> CoreResult<()> {
            tokio::task::yield_now().await;
            self.0.delete(transaction).await
        }

        async fn create_batch(&self, transactions: &[Transaction]) -> CoreResult<()> {
            tokio::task::yield_now().await;
            self.0.create_batch(transactions).await
        }
    }

    pub struct Harness {
        pub backend: Arc<InMemoryBackend>,
        pub notices: Arc<NoticeBoard>,
        pub redirect: Arc<PendingRedirect>,
        pub confirm: Arc<PresetConfirm>,
        pub context: ViewContext,
    }

    pub fn harness(confirmed: bool) -> Harness {
        let backend = Arc::new(InMemoryBackend::seeded());
        let services = Services::from_backend(backend.clone());
        build(backend, services, confirmed)
    }

    /// Harness whose backend writes yield before completing
    pub fn yielding_harness(confirmed: bool) -> Harness {
        let backend = Arc::new(InMemoryBackend::seeded());
        let services = Services::new(
            backend.clone(),
            backend.clone(),
            Arc::new(YieldingWrites(backend.clone())),
        );
        build(backend, services, confirmed)
    }

    fn build(backend: Arc<InMemoryBackend>, services: Services, confirmed: bool) -> Harness {
        let notices = Arc::new(NoticeBoard::new());
        let redirect = Arc::new(PendingRedirect::new());
        let confirm = Arc::new(PresetConfirm::new(confirmed));
        let context = ViewContext {
            services,
            notifier: notices.clone(),
            navigator: redirect.clone(),
            confirm: confirm.clone(),
        };
        Harness {
            backend,
            notices,
            redirect,
            confirm,
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_allows_one_action() {
        let in_flight = InFlight::default();

        let guard = in_flight.begin();
        assert!(guard.is_some());
        assert!(in_flight.begin().is_none());

        drop(guard);
        assert!(in_flight.begin().is_some());
    }
}
