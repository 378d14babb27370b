//! Transactions API endpoints - JSON API and HTMX actions

use crate::remote::HtmxCoordinator;
use crate::routes::accounts::page_region;
use crate::session::{collaborators, Session};
use crate::{with_triggers, ApiError, AppState};
use axum::extract::{Form, Path, Query, State};
use axum::response::{Html, IntoResponse, Json, Response};
use kopilka_core::time::now_timestamp;
use kopilka_core::{
    ClickTarget, CreateTransactionForm, FormRoot, ItemResponse, ListResponse, MemoryForm,
    NewTransaction, RemoveResponse, TransactionFields, TransactionRecord,
};
use std::sync::Arc;

use super::page::{create_modal_html, parse_kind};

#[derive(Debug, serde::Deserialize)]
pub struct TransactionQuery {
    pub account_id: Option<String>,
}

/// Transactions of one account
pub async fn api_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<ListResponse<TransactionRecord>>, ApiError> {
    let account_id = query
        .account_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::BadRequest { message: "account_id is required".to_string() })?;

    let store = state.store.read().await;
    Ok(Json(ListResponse::ok(store.transactions(&account_id))))
}

/// Stamps `created_at` with the server's local time
pub async fn api_transaction_create(
    State(state): State<AppState>,
    Json(fields): Json<NewTransaction>,
) -> Result<Json<ItemResponse<TransactionRecord>>, ApiError> {
    let record = state.store.write().await.add_transaction(&fields, now_timestamp())?;
    log::info!("Transaction {} created in account {}", record.id, record.account_id);
    Ok(Json(ItemResponse::ok(record)))
}

pub async fn api_transaction_remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<RemoveResponse> {
    let success = state.store.write().await.remove_transaction(&id);
    Json(RemoveResponse { success })
}

/// Click on `.transaction__remove` inside row `id`; the browser has already
/// confirmed
pub async fn htmx_page_remove_transaction(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<String>,
) -> Response {
    let target = ClickTarget::with_classes(&["btn", "btn-danger", "transaction__remove"]).in_row(id);
    session.page.dispatch(&target).await;
    with_triggers(&session.coordinator, page_region(&state, &session))
}

/// Create form submission
#[derive(Debug, Default, serde::Deserialize)]
pub struct CreateSubmission {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sum: String,
}

/// Store a new transaction; an empty answer closes the modal, a failed one
/// re-renders it with the notice
pub async fn htmx_transaction_store(
    State(state): State<AppState>,
    Form(submission): Form<CreateSubmission>,
) -> Result<Response, ApiError> {
    let kind = parse_kind(submission.kind.as_deref())?;
    let fields = TransactionFields {
        account_id: submission.account_id,
        name: submission.name,
        sum: submission.sum,
    };

    let coordinator = Arc::new(HtmxCoordinator::new());
    let root = Arc::new(MemoryForm::new());
    let form = CreateTransactionForm::new(
        Some(root.clone() as Arc<dyn FormRoot>),
        kind,
        collaborators(&state.accessor, coordinator.clone()),
    )?;

    if form.submit(fields.clone()).await.is_some() {
        return Ok(with_triggers(&coordinator, String::new()));
    }

    form.render_accounts_list().await;
    Ok(Html(create_modal_html(kind, &root.snapshot(), &fields)).into_response())
}
