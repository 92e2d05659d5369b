//! Transaction routes - list, batch entry, create/edit/delete
//!
//! Structure:
//! - api.rs: Form posts and HTMX fragments
//! - page.rs: Full page rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_batch_description_suggest,
    htmx_description_suggest,
    htmx_transaction_batch_store,
    htmx_transaction_delete,
    htmx_transaction_store,
};

pub use page::{
    page_transaction_batch,
    page_transaction_detail,
    page_transactions,
};
