//! Create, edit and delete a single transaction

use std::sync::Arc;

use crate::controllers::{InFlight, RemoveOutcome, SaveOutcome, ViewContext};
use crate::location::{Confirm, Navigator};
use crate::models::{Account, Tag, Transaction, TransactionId};
use crate::notify::Notifier;
use crate::resolve::{TransactionDetailData, TRANSACTION_LIST_URL};
use crate::services::TransactionService;

pub const TRANSACTION_SAVED: &str = "Transaction is saved.";
pub const TRANSACTION_DELETED: &str = "Transaction is deleted.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this transaction?";

pub struct TransactionDetailController {
    accounts: Vec<Account>,
    descriptions: Vec<String>,
    tags: Vec<Tag>,
    transaction_id: TransactionId,
    is_new: bool,
    transaction: Transaction,
    transaction_service: Arc<dyn TransactionService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    confirm: Arc<dyn Confirm>,
    in_flight: InFlight,
}

impl TransactionDetailController {
    pub fn new(data: TransactionDetailData, context: &ViewContext) -> Self {
        Self {
            accounts: data.accounts,
            descriptions: data.descriptions,
            tags: data.tags,
            transaction_id: data.transaction_id,
            is_new: data.is_new,
            transaction: data.transaction,
            transaction_service: context.services.transactions.clone(),
            notifier: context.notifier.clone(),
            navigator: context.navigator.clone(),
            confirm: context.confirm.clone(),
            in_flight: InFlight::default(),
        }
    }

    /// Create or update, depending on how the view was opened
    pub async fn save(&self) -> SaveOutcome {
        let Some(_guard) = self.in_flight.begin() else {
            return SaveOutcome::Busy;
        };

        let result = if self.is_new {
            self.transaction_service.create(&self.transaction).await
        } else {
            self.transaction_service.update(&self.transaction).await
        };

        match result {
            Ok(saved) => {
                log::info!("Transaction {:?} saved", saved.id);
                self.notifier.success(TRANSACTION_SAVED);
                self.navigator.go_to_url(TRANSACTION_LIST_URL);
                SaveOutcome::Saved
            }
            Err(e) => {
                self.notifier.api_error(&e);
                SaveOutcome::Failed
            }
        }
    }

    /// Delete after the user confirmed
    pub async fn remove(&self) -> RemoveOutcome {
        if !self.confirm.confirm(DELETE_PROMPT).await {
            return RemoveOutcome::Declined;
        }

        let Some(_guard) = self.in_flight.begin() else {
            return RemoveOutcome::Busy;
        };

        match self.transaction_service.delete(&self.transaction).await {
            Ok(()) => {
                log::info!("Transaction {} deleted", self.transaction_id);
                self.notifier.success(TRANSACTION_DELETED);
                self.navigator.go_to_url(TRANSACTION_LIST_URL);
                RemoveOutcome::Deleted
            }
            Err(e) => {
                self.notifier.api_error(&e);
                RemoveOutcome::Failed
            }
        }
    }

    pub fn suggest_description(&self, term: &str) -> Vec<String> {
        self.transaction_service.suggest_description(&self.descriptions, term)
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn transaction_mut(&mut self) -> &mut Transaction {
        &mut self.transaction
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}
