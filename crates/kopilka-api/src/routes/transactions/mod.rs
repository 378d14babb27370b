//! Transaction routes
//!
//! Features:
//! - `transaction` collection of the remote API
//! - Row removal from the transactions page
//! - Income and expense create forms
//!
//! Structure:
//! - api.rs: JSON API and HTMX actions
//! - page.rs: Widget and create modal rendering

pub mod api;
pub mod page;

pub use api::{
    api_transaction_create,
    api_transaction_remove,
    api_transactions,
    htmx_page_remove_transaction,
    htmx_transaction_store,
};
pub use page::{
    htmx_transaction_create_form,
    transactions_widget,
};
