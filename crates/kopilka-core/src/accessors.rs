//! Contracts of the collaborators a page controller is built from
//!
//! Every remote call completes with `Ok(response)` or `Err(CoreError)`; a
//! response may still carry `success: false` or no `data`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{CoreResult, DefaultErrorLogger, ErrorLogger};
use crate::models::{
    AccountFilter, AccountSummary, ItemResponse, ListResponse, NewTransaction, RemoveResponse,
    TransactionRecord,
};

/// Remote `account` collection
#[async_trait]
pub trait AccountAccessor: Send + Sync {
    async fn list(&self, filter: &AccountFilter) -> CoreResult<ListResponse<AccountSummary>>;

    async fn get(&self, id: &str) -> CoreResult<ItemResponse<AccountSummary>>;

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse>;
}

/// Remote `transaction` collection
#[async_trait]
pub trait TransactionAccessor: Send + Sync {
    /// Transactions of one account
    async fn list(&self, account_id: &str) -> CoreResult<ListResponse<TransactionRecord>>;

    async fn create(&self, fields: &NewTransaction) -> CoreResult<ItemResponse<TransactionRecord>>;

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse>;
}

/// Yes/no consent asked before a destructive action
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, message: &str) -> bool;
}

/// Application-level refresh of sibling regions; fire-and-forget
pub trait Coordinator: Send + Sync {
    fn update_widgets(&self);

    fn update_forms(&self);

    fn update_pages(&self) {}

    /// Refresh everything
    fn update(&self) {
        self.update_widgets();
        self.update_forms();
        self.update_pages();
    }
}

/// Everything a controller needs besides its root element
#[derive(Clone)]
pub struct Collaborators {
    pub accounts: Arc<dyn AccountAccessor>,
    pub transactions: Arc<dyn TransactionAccessor>,
    pub confirm: Arc<dyn Confirm>,
    pub coordinator: Arc<dyn Coordinator>,
    pub logger: Arc<dyn ErrorLogger>,
}

impl Collaborators {
    /// Collaborators reporting through the `log` crate
    pub fn new(
        accounts: Arc<dyn AccountAccessor>,
        transactions: Arc<dyn TransactionAccessor>,
        confirm: Arc<dyn Confirm>,
        coordinator: Arc<dyn Coordinator>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            confirm,
            coordinator,
            logger: Arc::new(DefaultErrorLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }
}
