//! HTML fragments for transaction rows and account pickers

use crate::models::{AccountSummary, TransactionRecord};
use crate::time::format_date;
use kopilka_utils::escape_html;

/// Visual category of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Income,
    Expense,
}

impl RowStyle {
    /// Only an explicit "expense" styles as expense; unknown types fall back
    /// to income
    pub fn of(record: &TransactionRecord) -> Self {
        if record.is_expense() {
            RowStyle::Expense
        } else {
            RowStyle::Income
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RowStyle::Income => "transaction_income",
            RowStyle::Expense => "transaction_expense",
        }
    }
}

/// Markup of one transaction row
pub fn transaction_html(item: &TransactionRecord, currency_symbol: &str) -> String {
    let id = escape_html(&item.id);
    format!(
        r#"<div class="transaction {} row" data-id="{}">
  <div class="col-md-7 transaction__details">
    <div class="transaction__icon">
      <span class="fa fa-money fa-2x"></span>
    </div>
    <div class="transaction__info">
      <h4 class="transaction__title">{}</h4>
      <div class="transaction__date">{}</div>
    </div>
  </div>
  <div class="col-md-3">
    <div class="transaction__summ">
      {} <span class="currency">{}</span>
    </div>
  </div>
  <div class="col-md-2 transaction__controls">
    <button class="btn btn-danger transaction__remove" data-id="{}">
      <i class="fa fa-trash"></i>
    </button>
  </div>
</div>
"#,
        RowStyle::of(item).css_class(),
        id,
        escape_html(&item.name),
        format_date(&item.created_at),
        item.sum,
        escape_html(currency_symbol),
        id,
    )
}

/// Markup of the whole list, in the given order
pub fn transactions_html(items: &[TransactionRecord], currency_symbol: &str) -> String {
    items
        .iter()
        .map(|item| transaction_html(item, currency_symbol))
        .collect()
}

/// `<option>` list for the account picker of the create form
pub fn account_options_html(accounts: &[AccountSummary]) -> String {
    accounts
        .iter()
        .map(|a| format!(r#"<option value="{}">{}</option>"#, escape_html(&a.id), escape_html(&a.name)))
        .collect()
}
