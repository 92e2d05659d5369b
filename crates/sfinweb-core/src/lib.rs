//! Views of the sfinapp finance tracker
//!
//! Routes resolve their data from the backend services, controllers hold
//! the view state and run the user's actions:
//! - tag list: display only
//! - transaction batch: bulk entry of new transactions
//! - transaction detail: create, update, delete one transaction

pub mod controllers;
pub mod error;
pub mod location;
pub mod memory;
pub mod models;
pub mod notify;
pub mod resolve;
pub mod services;

pub use controllers::{
    RemoveOutcome, SaveOutcome, TagListController, TransactionBatchController,
    TransactionDetailController, ViewContext,
};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use location::{Confirm, Navigator, PendingRedirect, PresetConfirm};
pub use models::{Account, Tag, Transaction, TransactionId, TransactionType};
pub use notify::{Notice, NoticeBoard, NoticeLevel, Notifier};
pub use resolve::{
    resolve_tag_list, resolve_transaction_batch, resolve_transaction_detail,
    resolve_transaction_list, Route, TagListData, TransactionBatchData, TransactionDetailData,
    TransactionListData, TRANSACTION_LIST_URL,
};
pub use services::{
    suggest_descriptions, AccountService, Services, TagService, TransactionService,
};
