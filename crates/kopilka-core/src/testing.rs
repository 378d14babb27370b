//! Fake collaborators for controller tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::accessors::{AccountAccessor, Collaborators, Confirm, Coordinator, TransactionAccessor};
use crate::error::{CoreError, CoreResult, ErrorContext, ErrorLogger};
use crate::models::{
    AccountFilter, AccountSummary, ItemResponse, ListResponse, NewTransaction, RemoveResponse,
    TransactionRecord,
};

/// In-memory remote that records every call as `collection.op:arg`
#[derive(Default)]
pub struct FakeRemote {
    accounts: Mutex<Vec<AccountSummary>>,
    transactions: Mutex<Vec<TransactionRecord>>,
    calls: Mutex<Vec<String>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    failing: Mutex<HashSet<String>>,
    refuse_removal: AtomicBool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(self, id: &str, name: &str) -> Self {
        self.accounts.lock().unwrap().push(AccountSummary {
            id: id.to_string(),
            name: name.to_string(),
            sum: None,
        });
        self
    }

    pub fn with_transaction(self, id: &str, account_id: &str, name: &str, kind: &str) -> Self {
        self.transactions.lock().unwrap().push(TransactionRecord {
            id: id.to_string(),
            account_id: account_id.to_string(),
            name: name.to_string(),
            sum: 100.0,
            kind: kind.to_string(),
            created_at: "2019-03-10 03:20:41".to_string(),
        });
        self
    }

    /// Hold the given call until the returned handle is notified
    pub fn gate(&self, call: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(call.to_string(), notify.clone());
        notify
    }

    /// Make the given call fail with a transport error
    pub fn fail(&self, call: &str) {
        self.failing.lock().unwrap().insert(call.to_string());
    }

    /// Answer removals with `success: false`
    pub fn refuse_removal(&self) {
        self.refuse_removal.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn account_ids(&self) -> Vec<String> {
        self.accounts.lock().unwrap().iter().map(|a| a.id.clone()).collect()
    }

    pub fn transaction_ids(&self) -> Vec<String> {
        self.transactions.lock().unwrap().iter().map(|t| t.id.clone()).collect()
    }

    async fn enter(&self, call: String) -> CoreResult<()> {
        self.calls.lock().unwrap().push(call.clone());
        let gate = self.gates.lock().unwrap().remove(&call);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.lock().unwrap().contains(&call) {
            return Err(CoreError::Transport { message: format!("{} failed", call) });
        }
        Ok(())
    }
}

#[async_trait]
impl AccountAccessor for FakeRemote {
    async fn list(&self, _filter: &AccountFilter) -> CoreResult<ListResponse<AccountSummary>> {
        self.enter("account.list".to_string()).await?;
        Ok(ListResponse::ok(self.accounts.lock().unwrap().clone()))
    }

    async fn get(&self, id: &str) -> CoreResult<ItemResponse<AccountSummary>> {
        self.enter(format!("account.get:{}", id)).await?;
        let found = self.accounts.lock().unwrap().iter().find(|a| a.id == id).cloned();
        Ok(ItemResponse { success: found.is_some(), data: found })
    }

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse> {
        self.enter(format!("account.remove:{}", id)).await?;
        if self.refuse_removal.load(Ordering::SeqCst) {
            return Ok(RemoveResponse { success: false });
        }
        self.accounts.lock().unwrap().retain(|a| a.id != id);
        self.transactions.lock().unwrap().retain(|t| t.account_id != id);
        Ok(RemoveResponse { success: true })
    }
}

#[async_trait]
impl TransactionAccessor for FakeRemote {
    async fn list(&self, account_id: &str) -> CoreResult<ListResponse<TransactionRecord>> {
        self.enter(format!("transaction.list:{}", account_id)).await?;
        let items = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect();
        Ok(ListResponse::ok(items))
    }

    async fn create(&self, fields: &NewTransaction) -> CoreResult<ItemResponse<TransactionRecord>> {
        self.enter(format!("transaction.create:{}", fields.account_id)).await?;
        let mut transactions = self.transactions.lock().unwrap();
        let record = TransactionRecord {
            id: format!("t{}", transactions.len() + 1),
            account_id: fields.account_id.clone(),
            name: fields.name.clone(),
            sum: fields.sum,
            kind: fields.kind.to_string(),
            created_at: "2024-05-01 09:00:00".to_string(),
        };
        transactions.push(record.clone());
        Ok(ItemResponse::ok(record))
    }

    async fn remove(&self, id: &str) -> CoreResult<RemoveResponse> {
        self.enter(format!("transaction.remove:{}", id)).await?;
        if self.refuse_removal.load(Ordering::SeqCst) {
            return Ok(RemoveResponse { success: false });
        }
        self.transactions.lock().unwrap().retain(|t| t.id != id);
        Ok(RemoveResponse { success: true })
    }
}

/// Confirmation that always gives the same answer
pub struct ScriptedConfirm {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub fn answering(answer: bool) -> Self {
        Self { answer, asked: Mutex::new(vec![]) }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl Confirm for ScriptedConfirm {
    async fn confirm(&self, message: &str) -> bool {
        self.asked.lock().unwrap().push(message.to_string());
        self.answer
    }
}

#[derive(Default)]
pub struct CountingCoordinator {
    pub widgets: AtomicUsize,
    pub forms: AtomicUsize,
    pub pages: AtomicUsize,
}

impl CountingCoordinator {
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.widgets.load(Ordering::SeqCst),
            self.forms.load(Ordering::SeqCst),
            self.pages.load(Ordering::SeqCst),
        )
    }
}

impl Coordinator for CountingCoordinator {
    fn update_widgets(&self) {
        self.widgets.fetch_add(1, Ordering::SeqCst);
    }

    fn update_forms(&self) {
        self.forms.fetch_add(1, Ordering::SeqCst);
    }

    fn update_pages(&self) {
        self.pages.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub errors: Mutex<Vec<String>>,
}

impl ErrorLogger for RecordingLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        self.errors.lock().unwrap().push(format!("{}: {}", context.operation, error));
    }

    fn log_warning(&self, _message: &str, _context: &ErrorContext) {}
}

/// Fakes wired together, with handles kept for assertions
pub struct Harness {
    pub remote: Arc<FakeRemote>,
    pub confirm: Arc<ScriptedConfirm>,
    pub coordinator: Arc<CountingCoordinator>,
    pub logger: Arc<RecordingLogger>,
}

impl Harness {
    pub fn new(remote: FakeRemote, confirm: bool) -> Self {
        Self {
            remote: Arc::new(remote),
            confirm: Arc::new(ScriptedConfirm::answering(confirm)),
            coordinator: Arc::new(CountingCoordinator::default()),
            logger: Arc::new(RecordingLogger::default()),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new(
            self.remote.clone(),
            self.remote.clone(),
            self.confirm.clone(),
            self.coordinator.clone(),
        )
        .with_logger(self.logger.clone())
    }

    pub fn logged_errors(&self) -> Vec<String> {
        self.logger.errors.lock().unwrap().clone()
    }
}
