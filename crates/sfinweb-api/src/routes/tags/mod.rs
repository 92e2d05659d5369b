//! Tag routes - display only

pub mod page;

pub use page::page_tags;
