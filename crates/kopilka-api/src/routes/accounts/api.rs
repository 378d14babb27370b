//! Accounts API endpoints - JSON API and HTMX partial responses

use crate::{ApiError, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{Html, Json};
use kopilka_core::{
    AccountAccessor, AccountFilter, AccountSummary, CoreError, ItemResponse, ListResponse, NewAccount,
    RemoveResponse,
};
use kopilka_utils::escape_html;

pub async fn api_accounts(
    State(state): State<AppState>,
    Query(filter): Query<AccountFilter>,
) -> Json<ListResponse<AccountSummary>> {
    let store = state.store.read().await;
    Json(ListResponse::ok(store.accounts(&filter)))
}

pub async fn api_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse<AccountSummary>>, ApiError> {
    let store = state.store.read().await;
    store
        .account(&id)
        .map(|account| Json(ItemResponse::ok(account)))
        .ok_or_else(|| CoreError::AccountNotFound { id: id.clone() }.into())
}

pub async fn api_account_create(
    State(state): State<AppState>,
    Json(fields): Json<NewAccount>,
) -> Result<Json<ItemResponse<AccountSummary>>, ApiError> {
    let account = state.store.write().await.add_account(&fields)?;
    Ok(Json(ItemResponse::ok(account)))
}

/// Also removes the account's transactions
pub async fn api_account_remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let success = state.store.write().await.remove_account(&id);
    if success {
        log::info!("Account {} removed through the API", id);
    }
    Json(RemoveResponse { success })
}

/// Account list widget, refreshed on `updateWidgets`
pub async fn htmx_accounts_widget(State(state): State<AppState>) -> Html<String> {
    let accounts = match AccountAccessor::list(state.accessor.as_ref(), &AccountFilter::default()).await {
        Ok(ListResponse { data: Some(accounts), .. }) => accounts,
        Ok(_) => vec![],
        Err(e) => {
            log::warn!("Failed to list accounts: {}", e);
            vec![]
        }
    };

    Html(render_accounts_widget(&accounts, &state.config.page.currency_symbol))
}

fn render_accounts_widget(accounts: &[AccountSummary], currency_symbol: &str) -> String {
    if accounts.is_empty() {
        return r#"<div class="accounts-widget"><h3>Счета</h3><p class="text-muted">Счетов пока нет</p></div>"#
            .to_string();
    }

    let items: String = accounts
        .iter()
        .map(|account| {
            let id = urlencoding::encode(&account.id);
            format!(
                r##"<li class="list-group-item account" data-id="{}"><a href="/accounts/{}" hx-get="/accounts/{}" hx-target="#transactions-page" hx-swap="outerHTML">{}</a><span class="badge">{:.2} {}</span></li>"##,
                escape_html(&account.id),
                id,
                id,
                escape_html(&account.name),
                account.sum.unwrap_or(0.0),
                escape_html(currency_symbol)
            )
        })
        .collect();

    format!(
        r#"<div class="accounts-widget"><h3>Счета</h3><ul class="list-group">{}</ul></div>"#,
        items
    )
}
