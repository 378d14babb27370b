//! Transactions page controller
//!
//! Shows the incomes and expenses of one account and handles removal of the
//! account itself or of single transactions.
//!
//! State machine:
//! - `Empty` (no display context) → `render(valid)` → `Bound`
//! - `Bound` → `render(valid)` → `Bound` (context replaced)
//! - `Bound` → `clear()` or successful `remove_account()` → `Empty`
//! - `render` with unusable options changes nothing in either state

use kopilka_config::PageConfig;
use std::sync::{Arc, Mutex};

use crate::accessors::Collaborators;
use crate::dom::{ClickTarget, PageRoot, REMOVE_ACCOUNT, TRANSACTION_REMOVE};
use crate::error::{CoreError, CoreResult, ErrorContext};
use crate::events::{EventRoutes, Handler, PageAction};
use crate::models::{DisplayContext, ItemResponse, ListResponse, RenderOptions};
use crate::render::transactions_html;

const REMOVE_ACCOUNT_FAILED: &str = "Не удалось удалить счёт";
const REMOVE_TRANSACTION_FAILED: &str = "Не удалось удалить транзакцию";

pub struct TransactionsPage {
    root: Arc<dyn PageRoot>,
    deps: Collaborators,
    labels: PageConfig,
    routes: EventRoutes,
    last_options: Mutex<Option<DisplayContext>>,
}

impl TransactionsPage {
    /// Fails with `InvalidArgument` when the root element is absent or has
    /// no account removal control.
    pub fn new(
        root: Option<Arc<dyn PageRoot>>,
        deps: Collaborators,
        labels: PageConfig,
    ) -> CoreResult<Self> {
        let root = root.ok_or_else(|| {
            CoreError::invalid_argument("transactions page root element is missing")
        })?;
        let routes = Self::register_events(root.as_ref())?;

        Ok(Self {
            root,
            deps,
            labels,
            routes,
            last_options: Mutex::new(None),
        })
    }

    fn register_events(root: &dyn PageRoot) -> CoreResult<EventRoutes> {
        if !root.has_node(REMOVE_ACCOUNT) {
            return Err(CoreError::invalid_argument(format!(
                "transactions page root has no {} control",
                REMOVE_ACCOUNT
            )));
        }

        Ok(EventRoutes::new()
            .on(REMOVE_ACCOUNT, Handler::RemoveAccount)
            .on(TRANSACTION_REMOVE, Handler::RemoveTransaction))
    }

    /// Bindings registered at construction
    pub fn routes(&self) -> &EventRoutes {
        &self.routes
    }

    /// Currently displayed account, if any
    pub fn context(&self) -> Option<DisplayContext> {
        self.last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store_context(&self, context: Option<DisplayContext>) {
        *self
            .last_options
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = context;
    }

    fn is_current(&self, snapshot: &DisplayContext) -> bool {
        self.context().as_ref() == Some(snapshot)
    }

    /// Route a click that bubbled up to the root
    pub async fn dispatch(&self, target: &ClickTarget) {
        match self.routes.resolve(target) {
            Some(PageAction::RemoveAccount) => self.remove_account().await,
            Some(PageAction::RemoveTransaction(id)) => self.remove_transaction(&id).await,
            None => {}
        }
    }

    /// Re-render the stored context
    pub async fn update(&self) {
        if let Some(context) = self.context() {
            self.render(Some(&context.to_options())).await;
        }
    }

    /// Fetch the account and its transactions and paint them. Does nothing
    /// unless the options name an account.
    pub async fn render(&self, options: Option<&RenderOptions>) {
        let Some(context) = options.and_then(RenderOptions::display_context) else {
            return;
        };

        log::debug!("Rendering transactions of account {}", context.account_id);
        self.store_context(Some(context.clone()));

        tokio::join!(self.load_title(&context), self.load_transactions(&context));
    }

    async fn load_title(&self, snapshot: &DisplayContext) {
        let result = self.deps.accounts.get(&snapshot.account_id).await;
        if !self.is_current(snapshot) {
            log::debug!("Discarding title of superseded account {}", snapshot.account_id);
            return;
        }

        match result {
            Ok(ItemResponse { data: Some(account), .. }) => self.render_title(&account.name),
            Ok(_) => log::debug!("Account {} came back without data", snapshot.account_id),
            Err(error) => self.deps.logger.log_warning(
                &error.to_string(),
                &Self::context_for("render_title", &snapshot.account_id),
            ),
        }
    }

    async fn load_transactions(&self, snapshot: &DisplayContext) {
        let result = self.deps.transactions.list(&snapshot.account_id).await;
        if !self.is_current(snapshot) {
            log::debug!("Discarding transactions of superseded account {}", snapshot.account_id);
            return;
        }

        match result {
            Ok(ListResponse { data: Some(items), .. }) => {
                self.root
                    .replace_content(&transactions_html(&items, &self.labels.currency_symbol));
            }
            Ok(_) => log::debug!("Transactions of {} came back without data", snapshot.account_id),
            Err(error) => self.deps.logger.log_warning(
                &error.to_string(),
                &Self::context_for("render_transactions", &snapshot.account_id),
            ),
        }
    }

    /// Empty list, placeholder title, no context
    pub fn clear(&self) {
        self.root.replace_content("");
        self.render_title(&self.labels.placeholder_title);
        self.store_context(None);
    }

    fn render_title(&self, name: &str) {
        self.root.set_title(name);
    }

    /// Remove the displayed account after the user agrees
    pub async fn remove_account(&self) {
        let Some(context) = self.context() else {
            return;
        };
        if !self.deps.confirm.confirm(&self.labels.confirm_remove_account).await {
            return;
        }

        let account_id = context.account_id.clone();
        match self.deps.accounts.remove(&account_id).await {
            Ok(response) if response.success => {
                log::info!("Account {} removed", account_id);
                if self.is_current(&context) {
                    self.clear();
                }
                self.deps.coordinator.update_widgets();
                self.deps.coordinator.update_forms();
            }
            Ok(_) => self.report(
                &CoreError::Remote { status: 200, message: "removal refused".to_string() },
                "remove_account",
                &account_id,
                REMOVE_ACCOUNT_FAILED,
            ),
            Err(error) => self.report(&error, "remove_account", &account_id, REMOVE_ACCOUNT_FAILED),
        }
    }

    /// Remove one transaction after the user agrees, then repaint
    pub async fn remove_transaction(&self, id: &str) {
        if !self.deps.confirm.confirm(&self.labels.confirm_remove_transaction).await {
            return;
        }

        match self.deps.transactions.remove(id).await {
            Ok(response) if response.success => {
                log::info!("Transaction {} removed", id);
                self.update().await;
                self.deps.coordinator.update_widgets();
            }
            Ok(_) => self.report(
                &CoreError::Remote { status: 200, message: "removal refused".to_string() },
                "remove_transaction",
                id,
                REMOVE_TRANSACTION_FAILED,
            ),
            Err(error) => self.report(&error, "remove_transaction", id, REMOVE_TRANSACTION_FAILED),
        }
    }

    fn report(&self, error: &CoreError, operation: &str, id: &str, notice: &str) {
        self.deps.logger.log_error(error, &Self::context_for(operation, id));
        self.root.show_notice(&format!("{}: {}", notice, error));
    }

    fn context_for(operation: &str, id: &str) -> ErrorContext {
        ErrorContext::new(operation).with_data("id", serde_json::json!(id))
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{MemoryRoot, CONTENT, TITLE};
    use crate::testing::{FakeRemote, Harness};

    const PLACEHOLDER: &str = "Название счёта";

    fn remote() -> FakeRemote {
        FakeRemote::new()
            .with_account("1", "Наличные")
            .with_account("2", "Карта")
            .with_transaction("10", "1", "Зарплата", "income")
            .with_transaction("11", "1", "Продукты", "EXPENSE")
            .with_transaction("12", "1", "Кафе", "expense")
            .with_transaction("20", "2", "Кешбэк", "income")
    }

    fn page(harness: &Harness) -> (TransactionsPage, Arc<MemoryRoot>) {
        let root = Arc::new(MemoryRoot::new(PLACEHOLDER));
        let page = TransactionsPage::new(
            Some(root.clone() as Arc<dyn PageRoot>),
            harness.collaborators(),
            PageConfig::default(),
        )
        .unwrap();
        (page, root)
    }

    fn account(id: &str) -> RenderOptions {
        RenderOptions::for_account(id)
    }

    #[test]
    fn test_missing_root_is_invalid_argument() {
        let harness = Harness::new(remote(), true);
        let err = TransactionsPage::new(None, harness.collaborators(), PageConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_root_without_remove_control_is_invalid_argument() {
        let harness = Harness::new(remote(), true);
        let root = Arc::new(MemoryRoot::new(PLACEHOLDER).without(REMOVE_ACCOUNT));
        let err = TransactionsPage::new(
            Some(root as Arc<dyn PageRoot>),
            harness.collaborators(),
            PageConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
    }

    #[test]
    fn test_construction_wires_handlers_once_and_starts_empty() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        assert_eq!(page.routes().len(), 2);
        assert_eq!(page.context(), None);
        assert_eq!(root.snapshot().writes, 0);
        assert!(harness.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_render_paints_rows_in_fetched_order() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);

        page.render(Some(&account("1"))).await;

        assert_eq!(root.title().as_deref(), Some("Наличные"));
        assert_eq!(root.row_ids(), vec!["10", "11", "12"]);
        let content = root.content().unwrap();
        assert_eq!(content.matches("transaction_expense").count(), 2);
        assert_eq!(content.matches("transaction_income").count(), 1);
        assert!(content.contains("10 марта 2019 г. в 03:20"));
        assert_eq!(page.context(), Some(DisplayContext { account_id: "1".to_string() }));
    }

    #[tokio::test]
    async fn test_render_replaces_previous_rows() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);

        page.render(Some(&account("1"))).await;
        page.render(Some(&account("2"))).await;

        assert_eq!(root.title().as_deref(), Some("Карта"));
        assert_eq!(root.row_ids(), vec!["20"]);
    }

    #[tokio::test]
    async fn test_unusable_options_change_nothing() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("2"))).await;
        let before = root.snapshot();

        page.render(None).await;
        page.render(Some(&RenderOptions::default())).await;
        page.render(Some(&RenderOptions { account_id: None })).await;
        page.render(Some(&account(""))).await;

        assert_eq!(root.snapshot(), before);
        assert_eq!(page.context(), Some(DisplayContext { account_id: "2".to_string() }));
        assert_eq!(harness.remote.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_its_portion_untouched() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;

        harness.remote.fail("transaction.list:2");
        page.render(Some(&account("2"))).await;

        assert_eq!(root.title().as_deref(), Some("Карта"));
        assert_eq!(root.row_ids(), vec!["10", "11", "12"]);
    }

    #[tokio::test]
    async fn test_missing_payload_leaves_title_untouched() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);

        page.render(Some(&account("404"))).await;

        assert_eq!(root.title().as_deref(), Some(PLACEHOLDER));
        assert!(root.row_ids().is_empty());
    }

    #[tokio::test]
    async fn test_missing_nodes_are_skipped() {
        let harness = Harness::new(remote(), true);
        let root = Arc::new(MemoryRoot::new(PLACEHOLDER).without(TITLE).without(CONTENT));
        let page = TransactionsPage::new(
            Some(root.clone() as Arc<dyn PageRoot>),
            harness.collaborators(),
            PageConfig::default(),
        )
        .unwrap();

        page.render(Some(&account("1"))).await;

        assert_eq!(root.snapshot().writes, 0);
        assert!(page.context().is_some());
    }

    #[tokio::test]
    async fn test_superseded_fetches_are_discarded() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        let title_gate = harness.remote.gate("account.get:1");
        let list_gate = harness.remote.gate("transaction.list:1");

        let (first, second) = (account("1"), account("2"));
        tokio::join!(page.render(Some(&first)), async {
            page.render(Some(&second)).await;
            title_gate.notify_one();
            list_gate.notify_one();
        });

        assert_eq!(root.title().as_deref(), Some("Карта"));
        assert_eq!(root.row_ids(), vec!["20"]);
        assert_eq!(page.context(), Some(DisplayContext { account_id: "2".to_string() }));
    }

    #[tokio::test]
    async fn test_clear_discards_pending_fetches() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        let gate = harness.remote.gate("transaction.list:1");

        let first = account("1");
        tokio::join!(page.render(Some(&first)), async {
            page.clear();
            gate.notify_one();
        });

        assert!(root.row_ids().is_empty());
        assert_eq!(page.context(), None);
    }

    #[tokio::test]
    async fn test_update_without_context_is_noop() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);

        page.update().await;

        assert!(harness.remote.calls().is_empty());
        assert_eq!(root.snapshot().writes, 0);
    }

    #[tokio::test]
    async fn test_update_repaints_same_context() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;
        let first = root.snapshot();

        page.update().await;

        let second = root.snapshot();
        assert_eq!(second.title, first.title);
        assert_eq!(second.content, first.content);
        assert_eq!(
            harness.remote.calls(),
            vec!["account.get:1", "transaction.list:1", "account.get:1", "transaction.list:1"]
        );
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;

        page.clear();
        let once = root.snapshot();
        page.clear();
        let twice = root.snapshot();

        assert_eq!(once.title.as_deref(), Some(PLACEHOLDER));
        assert_eq!(once.content.as_deref(), Some(""));
        assert_eq!((once.title, once.content), (twice.title, twice.content));
        assert_eq!(page.context(), None);
        assert_eq!(harness.remote.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_remove_account_without_context_is_noop() {
        let harness = Harness::new(remote(), true);
        let (page, _root) = page(&harness);

        page.remove_account().await;

        assert!(harness.confirm.asked().is_empty());
        assert!(harness.remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_declined_account_removal() {
        let harness = Harness::new(remote(), false);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;
        let before = root.snapshot();

        page.dispatch(&ClickTarget::remove_account()).await;

        assert_eq!(harness.confirm.asked(), vec!["Вы действительно хотите удалить счёт?"]);
        assert_eq!(harness.remote.calls().len(), 2);
        assert_eq!(root.snapshot(), before);
        assert_eq!(page.context(), Some(DisplayContext { account_id: "1".to_string() }));
    }

    #[tokio::test]
    async fn test_successful_account_removal_clears_and_notifies() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;

        page.dispatch(&ClickTarget::remove_account()).await;

        assert_eq!(harness.remote.account_ids(), vec!["2"]);
        assert_eq!(root.title().as_deref(), Some(PLACEHOLDER));
        assert!(root.row_ids().is_empty());
        assert_eq!(page.context(), None);
        assert_eq!(harness.coordinator.counts(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_account_removal_after_switch_keeps_new_account() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;
        let gate = harness.remote.gate("account.remove:1");

        tokio::join!(page.remove_account(), async {
            page.render(Some(&account("2"))).await;
            gate.notify_one();
        });

        assert_eq!(harness.remote.account_ids(), vec!["2"]);
        assert_eq!(root.title().as_deref(), Some("Карта"));
        assert_eq!(root.row_ids(), vec!["20"]);
        assert_eq!(page.context(), Some(DisplayContext { account_id: "2".to_string() }));
        assert_eq!(harness.coordinator.counts(), (1, 1, 0));
    }

    #[tokio::test]
    async fn test_failed_account_removal_keeps_state() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;
        harness.remote.fail("account.remove:1");

        page.remove_account().await;

        assert_eq!(root.row_ids(), vec!["10", "11", "12"]);
        assert_eq!(page.context(), Some(DisplayContext { account_id: "1".to_string() }));
        assert_eq!(harness.coordinator.counts(), (0, 0, 0));
        assert_eq!(harness.logged_errors().len(), 1);
        let notices = root.take_notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].starts_with("Не удалось удалить счёт"));
    }

    #[tokio::test]
    async fn test_refused_account_removal_keeps_state() {
        let harness = Harness::new(remote(), true);
        let (page, _root) = page(&harness);
        page.render(Some(&account("1"))).await;
        harness.remote.refuse_removal();

        page.remove_account().await;

        assert!(page.context().is_some());
        assert_eq!(harness.coordinator.counts(), (0, 0, 0));
    }

    #[tokio::test]
    async fn test_declined_transaction_removal() {
        let harness = Harness::new(remote(), false);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;

        let target = root.remove_button("11").unwrap();
        page.dispatch(&target).await;

        assert_eq!(harness.confirm.asked(), vec!["Вы действительно хотите удалить эту транзакцию?"]);
        assert_eq!(harness.remote.calls().len(), 2);
        assert_eq!(root.row_ids(), vec!["10", "11", "12"]);
    }

    #[tokio::test]
    async fn test_transaction_removal_repaints_and_notifies_widgets() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;

        let target = root.remove_button("11").unwrap();
        page.dispatch(&target).await;

        assert_eq!(root.row_ids(), vec!["10", "12"]);
        assert_eq!(harness.coordinator.counts(), (1, 0, 0));
        assert!(harness.remote.calls().contains(&"transaction.remove:11".to_string()));
    }

    #[tokio::test]
    async fn test_failed_transaction_removal_skips_repaint() {
        let harness = Harness::new(remote(), true);
        let (page, root) = page(&harness);
        page.render(Some(&account("1"))).await;
        harness.remote.fail("transaction.remove:11");
        let writes = root.snapshot().writes;

        page.remove_transaction("11").await;

        assert_eq!(root.snapshot().writes, writes);
        assert_eq!(harness.coordinator.counts(), (0, 0, 0));
        assert_eq!(harness.logged_errors().len(), 1);
        assert_eq!(root.take_notices().len(), 1);
    }

    #[tokio::test]
    async fn test_clicks_outside_bound_controls_are_ignored() {
        let harness = Harness::new(remote(), true);
        let (page, _root) = page(&harness);
        page.render(Some(&account("1"))).await;

        page.dispatch(&ClickTarget::with_classes(&["transaction__title"]).in_row("10")).await;

        assert!(harness.confirm.asked().is_empty());
        assert_eq!(harness.remote.calls().len(), 2);
    }
}
