//! Batch entry of transactions
//!
//! The view offers a number of blank rows, each a copy of the skeleton with
//! its own copy of the tag options. Rows left equal to the skeleton are
//! treated as empty and never submitted.

use std::sync::Arc;

use crate::controllers::{InFlight, SaveOutcome, ViewContext};
use crate::location::Navigator;
use crate::models::{Account, Tag, Transaction};
use crate::notify::Notifier;
use crate::resolve::{TransactionBatchData, TRANSACTION_LIST_URL};
use crate::services::TransactionService;

pub const NOTHING_TO_SAVE: &str = "Nothing to save.";
pub const TRANSACTIONS_SAVED: &str = "Transactions are saved.";

pub struct TransactionBatchController {
    accounts: Vec<Account>,
    descriptions: Vec<String>,
    tags: Vec<Tag>,
    skeleton: Transaction,
    tag_options: Vec<Vec<Tag>>,
    transactions: Vec<Transaction>,
    transaction_service: Arc<dyn TransactionService>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    in_flight: InFlight,
}

impl TransactionBatchController {
    /// Build the view and offer `initial_rows` blank rows
    pub fn new(data: TransactionBatchData, context: &ViewContext, initial_rows: usize) -> Self {
        let mut controller = Self {
            accounts: data.accounts,
            descriptions: data.descriptions,
            tags: data.tags,
            skeleton: data.skeleton,
            tag_options: Vec::new(),
            transactions: Vec::new(),
            transaction_service: context.services.transactions.clone(),
            notifier: context.notifier.clone(),
            navigator: context.navigator.clone(),
            in_flight: InFlight::default(),
        };
        controller.extend_transaction_list(initial_rows);
        controller
    }

    /// Append `count` blank rows
    pub fn extend_transaction_list(&mut self, count: usize) {
        for _ in 0..count {
            self.tag_options.push(self.tags.clone());
            self.transactions.push(self.skeleton.clone());
        }
    }

    /// Submit every row the user touched in one batch request
    pub async fn save(&self) -> SaveOutcome {
        let Some(_guard) = self.in_flight.begin() else {
            return SaveOutcome::Busy;
        };

        let filtered: Vec<Transaction> = self
            .transactions
            .iter()
            .cloned()
            .filter(|tx| self.provided_input(tx))
            .collect();

        if filtered.is_empty() {
            self.notifier.info(NOTHING_TO_SAVE);
            return SaveOutcome::NothingToSave;
        }

        log::info!("Submitting batch of {} transactions", filtered.len());
        match self.transaction_service.create_batch(&filtered).await {
            Ok(()) => {
                self.notifier.success(TRANSACTIONS_SAVED);
                self.navigator.go_to_url(TRANSACTION_LIST_URL);
                SaveOutcome::Saved
            }
            Err(e) => {
                self.notifier.api_error(&e);
                SaveOutcome::Failed
            }
        }
    }

    fn provided_input(&self, transaction: &Transaction) -> bool {
        transaction != &self.skeleton
    }

    /// Check if a row was left untouched
    pub fn is_row_empty(&self, index: usize) -> bool {
        self.transactions
            .get(index)
            .map_or(true, |tx| !self.provided_input(tx))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.transactions
    }

    /// Tag choices per row, parallel to [`Self::transactions`]
    pub fn tag_options(&self) -> &[Vec<Tag>] {
        &self.tag_options
    }

    pub fn row_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Descriptions of earlier transactions containing `term`
    pub fn suggest_description(&self, term: &str) -> Vec<String> {
        self.transaction_service.suggest_description(&self.descriptions, term)
    }

    pub fn skeleton(&self) -> &Transaction {
        &self.skeleton
    }
}
