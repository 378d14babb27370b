//! Server-side collaborators of the page controllers

use async_trait::async_trait;
use kopilka_core::time::now_timestamp;
use kopilka_core::{
    AccountAccessor, AccountFilter, AccountSummary, Confirm, Coordinator, CoreError, CoreResult,
    ItemResponse, ListResponse, NewTransaction, RemoveResponse, TransactionAccessor,
    TransactionRecord,
};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::store::Store;

/// Accessor backed by the process-local [`Store`]
#[derive(Clone)]
pub struct StoreAccessor {
    store: Arc<RwLock<Store>>,
}

impl StoreAccessor {
    pub fn new(store: Arc<RwLock<Store>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AccountAccessor for StoreAccessor {
    async fn list(&self, filter: &AccountFilter) -> CoreResult<ListResponse<AccountSummary>> {
        Ok(ListResponse::ok(self.store.read().await.accounts(filter)))
    }

    async fn get(&self, id: &str) -> CoreResult<ItemResponse<AccountSummary>> {
        self.store
            .read()
            .await
            .account(id)
            .map(ItemResponse::ok)
            .ok_or_else(|| CoreError::AccountNotFound { id: id.to_string() })
    }

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse> {
        let success = self.store.write().await.remove_account(id);
        Ok(RemoveResponse { success })
    }
}

#[async_trait]
impl TransactionAccessor for StoreAccessor {
    async fn list(&self, account_id: &str) -> CoreResult<ListResponse<TransactionRecord>> {
        Ok(ListResponse::ok(self.store.read().await.transactions(account_id)))
    }

    async fn create(&self, fields: &NewTransaction) -> CoreResult<ItemResponse<TransactionRecord>> {
        let record = self.store.write().await.add_transaction(fields, now_timestamp())?;
        Ok(ItemResponse::ok(record))
    }

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse> {
        let success = self.store.write().await.remove_transaction(id);
        Ok(RemoveResponse { success })
    }
}

/// The browser asks before sending a destructive request (`hx-confirm` or
/// the row click handler), so a request that arrives is already confirmed.
pub struct ClientConfirmed;

#[async_trait]
impl Confirm for ClientConfirmed {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub const UPDATE_WIDGETS: &str = "updateWidgets";
pub const UPDATE_FORMS: &str = "updateForms";
pub const UPDATE_PAGES: &str = "updatePages";

/// Collects refresh signals and hands them to the browser as `HX-Trigger`
/// events
#[derive(Debug, Default)]
pub struct HtmxCoordinator {
    pending: Mutex<Vec<&'static str>>,
}

impl HtmxCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: &'static str) {
        let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !pending.contains(&event) {
            pending.push(event);
        }
    }

    /// Pending events as an `HX-Trigger` value, emptying the queue
    pub fn drain(&self) -> Option<String> {
        let mut pending = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if pending.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut *pending).join(", "))
    }
}

impl Coordinator for HtmxCoordinator {
    fn update_widgets(&self) {
        self.push(UPDATE_WIDGETS);
    }

    fn update_forms(&self) {
        self.push(UPDATE_FORMS);
    }

    fn update_pages(&self) {
        self.push(UPDATE_PAGES);
    }
}
