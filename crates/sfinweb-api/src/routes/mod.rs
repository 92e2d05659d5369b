//! Route modules of the web server
//!
//! Each module follows the same structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: HTMX form posts and fragments
//! - page.rs: Page rendering

pub mod tags;
pub mod transactions;
