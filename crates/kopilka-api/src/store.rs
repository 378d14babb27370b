//! In-memory backing store of the `account` and `transaction` collections

use kopilka_core::{
    AccountFilter, AccountSummary, CoreError, CoreResult, NewAccount, NewTransaction,
    TransactionKind, TransactionRecord,
};

#[derive(Debug, Clone)]
struct StoredAccount {
    id: String,
    name: String,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: Vec<StoredAccount>,
    transactions: Vec<TransactionRecord>,
    next_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// A couple of accounts with a few transactions each
    pub fn with_demo_data() -> Self {
        let mut store = Self::new();
        let demo = [
            (
                "Наличные",
                vec![
                    ("Зарплата", 50000.0, TransactionKind::Income, "2019-03-05 10:15:00"),
                    ("Продукты", 2350.5, TransactionKind::Expense, "2019-03-10 03:20:41"),
                ],
            ),
            (
                "Карта",
                vec![
                    ("Кэшбэк", 420.0, TransactionKind::Income, "2019-04-01 12:00:00"),
                    ("Такси", 380.0, TransactionKind::Expense, "2019-04-02 23:41:07"),
                ],
            ),
        ];

        for (account_name, transactions) in demo {
            let account = store.insert_account(account_name);
            for (name, sum, kind, created_at) in transactions {
                let id = store.next_id();
                store.transactions.push(TransactionRecord {
                    id,
                    account_id: account.clone(),
                    name: name.to_string(),
                    sum,
                    kind: kind.to_string(),
                    created_at: created_at.to_string(),
                });
            }
        }

        log::debug!("Seeded {} demo accounts", store.accounts.len());
        store
    }

    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn insert_account(&mut self, name: &str) -> String {
        let id = self.next_id();
        self.accounts.push(StoredAccount { id: id.clone(), name: name.to_string() });
        id
    }

    /// Incomes minus expenses of one account
    fn balance(&self, account_id: &str) -> f64 {
        self.transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .map(|t| if t.is_expense() { -t.sum } else { t.sum })
            .sum()
    }

    fn summary(&self, account: &StoredAccount) -> AccountSummary {
        AccountSummary {
            id: account.id.clone(),
            name: account.name.clone(),
            sum: Some(self.balance(&account.id)),
        }
    }

    pub fn accounts(&self, filter: &AccountFilter) -> Vec<AccountSummary> {
        self.accounts
            .iter()
            .map(|a| self.summary(a))
            .filter(|a| filter.matches(a))
            .collect()
    }

    pub fn account(&self, id: &str) -> Option<AccountSummary> {
        self.accounts.iter().find(|a| a.id == id).map(|a| self.summary(a))
    }

    pub fn add_account(&mut self, fields: &NewAccount) -> CoreResult<AccountSummary> {
        let name = fields.name.trim();
        if name.is_empty() {
            return Err(CoreError::invalid_argument("account name is empty"));
        }
        let id = self.insert_account(name);
        log::info!("Account {} created", id);
        Ok(AccountSummary { id, name: name.to_string(), sum: Some(0.0) })
    }

    /// Removes the account together with its transactions
    pub fn remove_account(&mut self, id: &str) -> bool {
        let before = self.accounts.len();
        self.accounts.retain(|a| a.id != id);
        if self.accounts.len() == before {
            return false;
        }
        self.transactions.retain(|t| t.account_id != id);
        true
    }

    pub fn transactions(&self, account_id: &str) -> Vec<TransactionRecord> {
        self.transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn add_transaction(
        &mut self,
        fields: &NewTransaction,
        created_at: String,
    ) -> CoreResult<TransactionRecord> {
        if !self.accounts.iter().any(|a| a.id == fields.account_id) {
            return Err(CoreError::AccountNotFound { id: fields.account_id.clone() });
        }
        if fields.name.trim().is_empty() {
            return Err(CoreError::invalid_argument("transaction name is empty"));
        }

        let record = TransactionRecord {
            id: self.next_id(),
            account_id: fields.account_id.clone(),
            name: fields.name.trim().to_string(),
            sum: fields.sum,
            kind: fields.kind.to_string(),
            created_at,
        };
        self.transactions.push(record.clone());
        Ok(record)
    }

    pub fn remove_transaction(&mut self, id: &str) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.id != id);
        self.transactions.len() != before
    }
}
