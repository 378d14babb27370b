//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON endpoints of the remote collection
//! - page.rs: HTMX page and partial rendering

pub mod accounts;
pub mod transactions;
