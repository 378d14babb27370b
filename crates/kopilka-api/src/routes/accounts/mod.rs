//! Account routes
//!
//! Features:
//! - `account` collection of the remote API
//! - Account list widget
//! - The transactions page region, driven by the server-side page controller
//!
//! Structure:
//! - api.rs: JSON API and the widget partial
//! - page.rs: Page region rendering and its actions

pub mod api;
pub mod page;

pub use api::{
    api_account,
    api_account_create,
    api_account_remove,
    api_accounts,
    htmx_accounts_widget,
};
pub use page::{
    htmx_page,
    htmx_page_clear,
    htmx_page_remove_account,
    page_account,
    page_region,
};
