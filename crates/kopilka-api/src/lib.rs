//! HTTP server: the remote resource API and the HTMX pages
//!
//! Routes are organized into modules:
//! - routes::accounts: account collection, account widget, the transactions page region
//! - routes::transactions: transaction collection, row removal, create form

pub mod error;
pub mod remote;
pub mod routes;
pub mod session;
pub mod store;

use axum::{
    http::{HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use kopilka_config::Config;
use kopilka_core::CoreResult;
use kopilka_utils::escape_html;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

pub use error::ApiError;
use remote::{HtmxCoordinator, StoreAccessor};
use session::{Sessions, SESSION_HEADER};
use store::Store;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<RwLock<Store>>,
    pub accessor: Arc<StoreAccessor>,
    /// Page controllers, one per open browser page
    pub sessions: Arc<Sessions>,
}

impl AppState {
    /// Fails when a page controller cannot be built from the configuration
    pub fn new(config: Config, store: Store) -> CoreResult<Self> {
        let store = Arc::new(RwLock::new(store));
        let accessor = Arc::new(StoreAccessor::new(store.clone()));
        let sessions = Arc::new(Sessions::new(accessor.clone(), config.page.clone()));
        // Surfaces controller construction errors at startup
        sessions.open(None)?;

        Ok(Self {
            config,
            store,
            accessor,
            sessions,
        })
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{
        api_account, api_account_create, api_account_remove, api_accounts, htmx_accounts_widget,
        htmx_page, htmx_page_clear, htmx_page_remove_account, page_account,
    };
    use routes::transactions::{
        api_transaction_create, api_transaction_remove, api_transactions,
        htmx_page_remove_transaction, htmx_transaction_create_form, htmx_transaction_store,
    };

    let remote_api = Router::new()
        .route("/account", get(api_accounts).put(api_account_create))
        .route("/account/:id", get(api_account).delete(api_account_remove))
        .route("/transaction", get(api_transactions).put(api_transaction_create))
        .route("/transaction/:id", delete(api_transaction_remove))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/api/health", get(health_check))
        // HTMX page routes
        .route("/", get(index_page))
        .route("/accounts/:id", get(page_account))
        // HTMX partial routes
        .route("/widgets/accounts", get(htmx_accounts_widget))
        .route("/page", get(htmx_page))
        .route("/page/clear", post(htmx_page_clear))
        .route("/page/account", delete(htmx_page_remove_account))
        .route("/page/transactions/:id", delete(htmx_page_remove_transaction))
        .route("/transactions/create", get(htmx_transaction_create_form))
        .route("/transactions", post(htmx_transaction_store))
        .merge(remote_api)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="ru">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Копилка</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@3.4.1/dist/css/bootstrap.min.css">
    <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/font-awesome@4.7.0/css/font-awesome.min.css">
    <style>
        .transaction {{ padding: 10px 0; border-bottom: 1px solid #eee; }}
        .transaction_income .transaction__summ {{ color: #3c763d; }}
        .transaction_expense .transaction__summ {{ color: #a94442; }}
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body>
    {}
    <div id="modal"></div>
</body>
</html>"#,
        escape_html(title),
        content
    )
}

/// Check if request is from HTMX (partial page update)
pub(crate) fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers.get("hx-request").is_some()
}

/// Full page on a plain request, the bare fragment on an HTMX request
pub fn page_response(headers: &HeaderMap, session_id: &str, title: &str, inner_content: &str) -> String {
    if is_htmx_request(headers) {
        inner_content.to_string()
    } else {
        base_html(title, &layout(session_id, inner_content))
    }
}

/// Account widget on the left, transactions widget and page on the right
fn layout(session_id: &str, page: &str) -> String {
    let session_id = escape_html(session_id);
    format!(
        r#"<div class="container-fluid" data-session="{session}" hx-headers='{{"{header}": "{session}"}}'>
    <div class="row">
        <aside class="col-md-3">
            <div hx-get="/widgets/accounts" hx-trigger="load, updateWidgets from:body" hx-swap="innerHTML"></div>
        </aside>
        <main class="col-md-9">
            {widget}
            {page}
        </main>
    </div>
</div>
<script>
// Rows are re-rendered on every update, so the listener sits on the document
document.addEventListener('click', function (e) {{
    const button = e.target.closest('.transaction__remove');
    const row = button && button.closest('.transaction');
    const page = document.getElementById('transactions-page');
    if (!row || !page) return;
    if (!confirm(page.dataset.confirmRemove)) return;
    htmx.ajax('DELETE', '/page/transactions/' + encodeURIComponent(row.dataset.id), {{
        target: '#transactions-page',
        swap: 'outerHTML',
        headers: {{ '{header}': page.closest('[data-session]').dataset.session }},
    }});
}});
</script>"#,
        session = session_id,
        header = SESSION_HEADER,
        widget = routes::transactions::transactions_widget(),
        page = page
    )
}

/// Attach pending coordinator signals as `HX-Trigger`
pub(crate) fn with_triggers(coordinator: &HtmxCoordinator, body: String) -> Response {
    let mut response = Html(body).into_response();
    if let Some(events) = coordinator.drain() {
        match HeaderValue::from_str(&events) {
            Ok(value) => {
                response.headers_mut().insert("HX-Trigger", value);
            }
            Err(e) => log::warn!("Dropping HX-Trigger '{}': {}", events, e),
        }
    }
    response
}

/// Index page: account list and the transactions page region
async fn index_page(
    state: axum::extract::State<AppState>,
    session::Session(session): session::Session,
    headers: HeaderMap,
) -> Html<String> {
    let region = routes::accounts::page_region(&state, &session);
    Html(page_response(&headers, &session.id, "Транзакции", &region))
}

/// Start the HTTP server
///
/// Creates the router, binds to the configured address and serves until the
/// listener fails.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let store = if config.data.seed_demo {
        Store::with_demo_data()
    } else {
        Store::new()
    };
    let state = AppState::new(config, store).map_err(|e| {
        log::error!("Failed to build the transactions page: {}", e.to_details());
        e
    })?;

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting Kopilka server on http://{}", addr);
    log::info!("Remote API under /account and /transaction");

    axum::serve(listener, router).await?;
    log::info!("Server stopped");
    Ok(())
}
