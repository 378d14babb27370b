//! Create-transaction form controller
//!
//! One form per direction (income or expense). The form offers the current
//! accounts in a picker and submits new transactions to the remote API.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::accessors::Collaborators;
use crate::error::{CoreError, CoreResult, ErrorContext};
use crate::models::{AccountFilter, ListResponse, NewTransaction, TransactionKind, TransactionRecord};
use crate::render::account_options_html;

const CREATE_FAILED: &str = "Не удалось создать транзакцию";

/// Raw values typed into the form
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct TransactionFields {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sum: String,
}

impl TransactionFields {
    /// Validate and convert into the remote payload
    pub fn into_new_transaction(self, kind: TransactionKind) -> CoreResult<NewTransaction> {
        if self.account_id.trim().is_empty() {
            return Err(CoreError::InvalidFormat { message: "account is not selected".to_string() });
        }
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidFormat { message: "name is empty".to_string() });
        }
        let sum = self
            .sum
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .map_err(|_| CoreError::InvalidFormat { message: format!("'{}' is not a number", self.sum) })?;
        if !sum.is_finite() {
            return Err(CoreError::InvalidFormat { message: format!("'{}' is not a number", self.sum) });
        }

        Ok(NewTransaction {
            account_id: self.account_id.trim().to_string(),
            name,
            sum,
            kind,
        })
    }
}

/// Form element and the modal it lives in
pub trait FormRoot: Send + Sync {
    /// Replace the options of the account picker; false when it is missing
    fn replace_account_options(&self, html: &str) -> bool;

    fn reset(&self);

    fn close_modal(&self);

    fn show_notice(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    pub options: String,
    pub resets: usize,
    pub closed: bool,
    pub notices: Vec<String>,
}

/// In-memory form
#[derive(Debug, Default)]
pub struct MemoryForm {
    state: Mutex<FormSnapshot>,
}

impl MemoryForm {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FormSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.lock().clone()
    }
}

impl FormRoot for MemoryForm {
    fn replace_account_options(&self, html: &str) -> bool {
        self.lock().options = html.to_string();
        true
    }

    fn reset(&self) {
        self.lock().resets += 1;
    }

    fn close_modal(&self) {
        self.lock().closed = true;
    }

    fn show_notice(&self, message: &str) {
        self.lock().notices.push(message.to_string());
    }
}

pub struct CreateTransactionForm {
    root: Arc<dyn FormRoot>,
    kind: TransactionKind,
    deps: Collaborators,
}

impl CreateTransactionForm {
    pub fn new(
        root: Option<Arc<dyn FormRoot>>,
        kind: TransactionKind,
        deps: Collaborators,
    ) -> CoreResult<Self> {
        let root = root.ok_or_else(|| CoreError::invalid_argument("form element is missing"))?;
        Ok(Self { root, kind, deps })
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Refill the account picker from the remote account list
    pub async fn render_accounts_list(&self) {
        self.root.replace_account_options("");

        match self.deps.accounts.list(&AccountFilter::default()).await {
            Ok(ListResponse { data: Some(accounts), .. }) => {
                self.root.replace_account_options(&account_options_html(&accounts));
            }
            Ok(_) => log::debug!("Account list came back without data"),
            Err(error) => self
                .deps
                .logger
                .log_warning(&error.to_string(), &ErrorContext::new("render_accounts_list")),
        }
    }

    /// Create the transaction; on success refresh the app, reset the form and
    /// close its modal
    pub async fn submit(&self, fields: TransactionFields) -> Option<TransactionRecord> {
        let payload = match fields.into_new_transaction(self.kind) {
            Ok(payload) => payload,
            Err(error) => {
                self.root.show_notice(&format!("{}: {}", CREATE_FAILED, error));
                return None;
            }
        };

        match self.deps.transactions.create(&payload).await {
            Ok(response) if response.success => {
                self.deps.coordinator.update();
                self.root.reset();
                self.root.close_modal();
                response.data
            }
            Ok(_) => {
                self.report(&CoreError::Remote { status: 200, message: "creation refused".to_string() }, &payload);
                None
            }
            Err(error) => {
                self.report(&error, &payload);
                None
            }
        }
    }

    fn report(&self, error: &CoreError, payload: &NewTransaction) {
        self.deps.logger.log_error(
            error,
            &ErrorContext::new("create_transaction")
                .with_data("account_id", serde_json::json!(payload.account_id)),
        );
        self.root.show_notice(&format!("{}: {}", CREATE_FAILED, error));
    }
}
