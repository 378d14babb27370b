//! Transactions widget and the create modal

use crate::remote::HtmxCoordinator;
use crate::session::collaborators;
use crate::{ApiError, AppState};
use axum::extract::{Query, State};
use axum::response::Html;
use kopilka_core::form::FormSnapshot;
use kopilka_core::{CreateTransactionForm, FormRoot, MemoryForm, TransactionFields, TransactionKind};
use kopilka_utils::escape_html;
use std::collections::HashMap;
use std::sync::Arc;

/// `type` parameter of the create form; income when absent
pub(crate) fn parse_kind(value: Option<&str>) -> Result<TransactionKind, ApiError> {
    match value {
        None | Some("") => Ok(TransactionKind::Income),
        Some(value) => value
            .parse()
            .map_err(|message| ApiError::BadRequest { message }),
    }
}

fn modal_title(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "Новый доход",
        TransactionKind::Expense => "Новый расход",
    }
}

/// "New income" and "new expense" buttons
pub fn transactions_widget() -> String {
    r##"<div class="transactions-widget btn-group" role="group">
    <button class="btn btn-success create-income-button" hx-get="/transactions/create?type=income" hx-target="#modal" hx-swap="innerHTML">
        <span class="fa fa-thumbs-o-up"></span> Доход
    </button>
    <button class="btn btn-danger create-expense-button" hx-get="/transactions/create?type=expense" hx-target="#modal" hx-swap="innerHTML">
        <span class="fa fa-thumbs-o-down"></span> Расход
    </button>
</div>"##
        .to_string()
}

/// Modal with the create form; typed values and the chosen account survive a
/// failed submission
pub(crate) fn create_modal_html(
    kind: TransactionKind,
    form: &FormSnapshot,
    fields: &TransactionFields,
) -> String {
    let mut options = form.options.clone();
    if !fields.account_id.is_empty() {
        let chosen = format!(r#"<option value="{}">"#, escape_html(&fields.account_id));
        let selected = format!(r#"<option value="{}" selected>"#, escape_html(&fields.account_id));
        options = options.replacen(&chosen, &selected, 1);
    }

    let notices: String = form
        .notices
        .iter()
        .map(|n| format!(r#"<div class="alert alert-danger notice">{}</div>"#, escape_html(n)))
        .collect();

    format!(
        r##"<div id="create-transaction-modal" class="modal" style="display: block" hx-get="/transactions/create?type={kind}" hx-trigger="updateForms from:body" hx-target="#modal" hx-swap="innerHTML">
    <div class="modal-dialog">
        <div class="modal-content">
            <div class="modal-header">
                <button type="button" class="close" onclick="document.getElementById('modal').innerHTML = ''">&times;</button>
                <h4 class="modal-title">{title}</h4>
            </div>
            <form class="create-transaction-form" hx-post="/transactions" hx-target="#modal" hx-swap="innerHTML">
                <div class="modal-body">
                    {notices}
                    <input type="hidden" name="type" value="{kind}">
                    <div class="form-group">
                        <label>Счёт</label>
                        <select class="form-control accounts-select" name="account_id" required>{options}</select>
                    </div>
                    <div class="form-group">
                        <label>Название</label>
                        <input class="form-control" name="name" value="{name}" required>
                    </div>
                    <div class="form-group">
                        <label>Сумма</label>
                        <input class="form-control" name="sum" value="{sum}" required>
                    </div>
                </div>
                <div class="modal-footer">
                    <button type="submit" class="btn btn-primary">Создать</button>
                </div>
            </form>
        </div>
    </div>
</div>"##,
        kind = kind,
        title = modal_title(kind),
        notices = notices,
        options = options,
        name = escape_html(&fields.name),
        sum = escape_html(&fields.sum),
    )
}

/// Open the create modal, refreshed on `updateForms`
pub async fn htmx_transaction_create_form(
    State(state): State<AppState>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Html<String>, ApiError> {
    let kind = parse_kind(query.get("type").map(String::as_str))?;

    let root = Arc::new(MemoryForm::new());
    let form = CreateTransactionForm::new(
        Some(root.clone() as Arc<dyn FormRoot>),
        kind,
        collaborators(&state.accessor, Arc::new(HtmxCoordinator::new())),
    )?;
    form.render_accounts_list().await;

    Ok(Html(create_modal_html(kind, &root.snapshot(), &TransactionFields::default())))
}
