//! Data models shared by the page controllers and the remote API

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of an account or a transaction
pub type Identifier = String;

/// Accept identifiers sent either as JSON strings or as JSON numbers
fn deserialize_id<'de, D>(deserializer: D) -> Result<Identifier, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<Identifier>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] Identifier);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
}

/// Context-like value handed to `render`; may or may not name an account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub account_id: Option<Identifier>,
}

impl RenderOptions {
    pub fn for_account(id: impl Into<Identifier>) -> Self {
        Self { account_id: Some(id.into()) }
    }

    /// Promote to a display context when an account id is present
    pub fn display_context(&self) -> Option<DisplayContext> {
        match self.account_id.as_deref() {
            Some(id) if kopilka_utils::is_present(Some(id)) => Some(DisplayContext {
                account_id: id.to_string(),
            }),
            _ => None,
        }
    }
}

/// Which account's ledger is currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayContext {
    pub account_id: Identifier,
}

impl DisplayContext {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions::for_account(self.account_id.clone())
    }
}

/// Account projection returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Identifier,
    pub name: String,
    /// Current balance, when the API reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sum: Option<f64>,
}

/// Income or expense record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: Identifier,
    #[serde(deserialize_with = "deserialize_id")]
    pub account_id: Identifier,
    pub name: String,
    pub sum: f64,
    /// "income" or "expense"; other values are kept as sent
    #[serde(rename = "type")]
    pub kind: String,
    /// Wall-clock timestamp, `YYYY-MM-DD HH:MM:SS`
    pub created_at: String,
}

impl TransactionRecord {
    /// Anything that is not spelled "expense" (in any case) counts as income
    pub fn is_expense(&self) -> bool {
        self.kind.eq_ignore_ascii_case("expense")
    }
}

/// Transaction direction chosen in the create form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl Default for TransactionKind {
    fn default() -> Self {
        TransactionKind::Income
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// Fields submitted to create a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(deserialize_with = "deserialize_id")]
    pub account_id: Identifier,
    pub name: String,
    pub sum: f64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

/// Fields submitted to create an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
}

/// Filter for account listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountFilter {
    /// Case-insensitive substring of the account name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl AccountFilter {
    pub fn matches(&self, account: &AccountSummary) -> bool {
        match self.name.as_deref() {
            Some(needle) if !needle.is_empty() => account
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// `{success, data: [..]}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ListResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<T>>,
}

impl<T> ListResponse<T> {
    pub fn ok(data: Vec<T>) -> Self {
        Self { success: true, data: Some(data) }
    }
}

/// `{success, data: {..}}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ItemResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data) }
    }
}

/// `{success}` envelope of a deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub success: bool,
}

// ==================== Tests ====================
