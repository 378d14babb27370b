//! The transactions page region
//!
//! Every action runs the page controller of the requesting page's session and
//! answers with the repainted region plus that session's coordinator signals.

use crate::session::{PageSession, Session};
use crate::{page_response, with_triggers, AppState};
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use kopilka_core::{ClickTarget, PageRoot, RenderOptions};
use kopilka_utils::escape_html;

const PAGE_TITLE: &str = "Транзакции";
const STALE_ACCOUNT: &str = "Не удалось удалить счёт: на странице открыт другой счёт";

/// Current state of the session's root as HTML; pending notices are consumed
pub fn page_region(state: &AppState, session: &PageSession) -> String {
    let root = &session.root;
    let notices: String = root
        .take_notices()
        .iter()
        .map(|notice| {
            format!(
                r#"<div class="alert alert-danger notice" role="alert">{}</div>"#,
                escape_html(notice)
            )
        })
        .collect();
    let title = root.title().unwrap_or_default();
    let content = root.content().unwrap_or_default();
    let labels = &state.config.page;
    let remove_url = match session.page.context() {
        Some(context) => format!(
            "/page/account?account_id={}",
            urlencoding::encode(&context.account_id)
        ),
        None => "/page/account".to_string(),
    };

    format!(
        r##"<section id="transactions-page" class="transactions-page" hx-get="/page" hx-trigger="updatePages from:body" hx-swap="outerHTML" data-confirm-remove="{}">
    {}
    <div class="page-header clearfix">
        <button class="btn btn-danger remove-account pull-right" hx-delete="{}" hx-confirm="{}" hx-target="#transactions-page" hx-swap="outerHTML">Удалить счёт</button>
        <h1 class="content-title">{}</h1>
    </div>
    <div class="content">{}</div>
</section>"##,
        escape_html(&labels.confirm_remove_transaction),
        notices,
        escape_html(&remove_url),
        escape_html(&labels.confirm_remove_account),
        escape_html(&title),
        content
    )
}

/// Show the transactions of one account
pub async fn page_account(
    State(state): State<AppState>,
    Session(session): Session,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    session.page.render(Some(&RenderOptions::for_account(id))).await;
    let body = page_response(&headers, &session.id, PAGE_TITLE, &page_region(&state, &session));
    with_triggers(&session.coordinator, body)
}

/// Repaint the displayed account, refreshed on `updatePages`
pub async fn htmx_page(State(state): State<AppState>, Session(session): Session) -> Response {
    session.page.update().await;
    with_triggers(&session.coordinator, page_region(&state, &session))
}

pub async fn htmx_page_clear(State(state): State<AppState>, Session(session): Session) -> Response {
    session.page.clear();
    with_triggers(&session.coordinator, page_region(&state, &session))
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct RemoveAccountQuery {
    /// Account the page showed when the button was rendered
    pub account_id: Option<String>,
}

/// Click on `.remove-account`; the browser has already confirmed. Refused
/// when the page has moved on to another account since.
pub async fn htmx_page_remove_account(
    State(state): State<AppState>,
    Session(session): Session,
    Query(query): Query<RemoveAccountQuery>,
) -> Response {
    let displayed = session.page.context().map(|context| context.account_id);
    match query.account_id {
        Some(requested) if displayed.as_deref() != Some(requested.as_str()) => {
            log::warn!(
                "Refusing to remove account {} from page {}: it shows {:?}",
                requested,
                session.id,
                displayed
            );
            session.root.show_notice(STALE_ACCOUNT);
        }
        _ => session.page.dispatch(&ClickTarget::remove_account()).await,
    }
    with_triggers(&session.coordinator, page_region(&state, &session))
}
