//! Page controllers, templating and collaborator contracts
//!
//! The transactions page shows the incomes and expenses of one account. It
//! is built from a [`dom::PageRoot`] and a set of injected
//! [`accessors::Collaborators`], so the same controller runs against the
//! real remote API or against fakes.

pub mod accessors;
pub mod dom;
pub mod error;
pub mod events;
pub mod form;
pub mod models;
pub mod page;
pub mod render;
pub mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use accessors::{AccountAccessor, Collaborators, Confirm, Coordinator, TransactionAccessor};
pub use dom::{ClickTarget, MemoryRoot, PageRoot};
pub use error::{CoreError, CoreResult, DefaultErrorLogger, ErrorCode, ErrorDetails, ErrorLogger};
pub use form::{CreateTransactionForm, FormRoot, MemoryForm, TransactionFields};
pub use models::{
    AccountFilter, AccountSummary, DisplayContext, Identifier, ItemResponse, ListResponse,
    NewAccount, NewTransaction, RemoveResponse, RenderOptions, TransactionKind, TransactionRecord,
};
pub use page::TransactionsPage;
pub use time::format_date;
