//! The DOM surface the page controllers paint into
//!
//! Controllers only talk to [`PageRoot`]. [`MemoryRoot`] keeps the nodes in
//! memory; the server returns its snapshot to the browser as HTML.

use std::sync::{Mutex, MutexGuard};

/// Title target
pub const TITLE: &str = ".content-title";
/// Transaction list target
pub const CONTENT: &str = ".content";
/// Account removal control
pub const REMOVE_ACCOUNT: &str = ".remove-account";
/// One rendered transaction row
pub const TRANSACTION: &str = ".transaction";
/// Per-row delete control
pub const TRANSACTION_REMOVE: &str = ".transaction__remove";

/// Root element of the transactions page
pub trait PageRoot: Send + Sync {
    /// Whether a node matching the selector exists under the root
    fn has_node(&self, selector: &str) -> bool;

    /// Set the text of the title node; false when it is missing
    fn set_title(&self, text: &str) -> bool;

    /// Replace the markup of the list node; false when it is missing
    fn replace_content(&self, html: &str) -> bool;

    /// Show a user-visible message
    fn show_notice(&self, message: &str);
}

/// Element a click landed on, as seen by delegated listeners
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClickTarget {
    pub classes: Vec<String>,
    /// `data-id` of the closest `.transaction` ancestor
    pub closest_row_id: Option<String>,
}

impl ClickTarget {
    pub fn with_classes(classes: &[&str]) -> Self {
        Self {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            closest_row_id: None,
        }
    }

    pub fn in_row(mut self, id: impl Into<String>) -> Self {
        self.closest_row_id = Some(id.into());
        self
    }

    /// The account removal button
    pub fn remove_account() -> Self {
        Self::with_classes(&["btn", "btn-danger", "remove-account"])
    }

    /// Class selector match (`.name`)
    pub fn matches(&self, selector: &str) -> bool {
        match selector.strip_prefix('.') {
            Some(class) => self.classes.iter().any(|c| c == class),
            None => false,
        }
    }
}

/// Observable state of a [`MemoryRoot`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootSnapshot {
    pub title: Option<String>,
    pub content: Option<String>,
    pub notices: Vec<String>,
    /// Number of writes to title or content so far
    pub writes: usize,
}

#[derive(Debug)]
struct Nodes {
    title: Option<String>,
    content: Option<String>,
    remove_account: bool,
    notices: Vec<String>,
    writes: usize,
}

/// In-memory page root
#[derive(Debug)]
pub struct MemoryRoot {
    nodes: Mutex<Nodes>,
}

impl MemoryRoot {
    /// A root with every node present, titled with the placeholder
    pub fn new(placeholder_title: &str) -> Self {
        Self {
            nodes: Mutex::new(Nodes {
                title: Some(placeholder_title.to_string()),
                content: Some(String::new()),
                remove_account: true,
                notices: vec![],
                writes: 0,
            }),
        }
    }

    /// Drop a node from the tree
    pub fn without(self, selector: &str) -> Self {
        {
            let mut nodes = self.lock();
            match selector {
                TITLE => nodes.title = None,
                CONTENT => nodes.content = None,
                REMOVE_ACCOUNT => nodes.remove_account = false,
                _ => {}
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, Nodes> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> RootSnapshot {
        let nodes = self.lock();
        RootSnapshot {
            title: nodes.title.clone(),
            content: nodes.content.clone(),
            notices: nodes.notices.clone(),
            writes: nodes.writes,
        }
    }

    pub fn title(&self) -> Option<String> {
        self.lock().title.clone()
    }

    pub fn content(&self) -> Option<String> {
        self.lock().content.clone()
    }

    /// Notices shown since the last call
    pub fn take_notices(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().notices)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl MemoryRoot {
    /// `data-id` of every rendered row, in document order
    pub fn row_ids(&self) -> Vec<String> {
        use once_cell::sync::OnceCell;
        use regex::Regex;

        static ROW: OnceCell<Regex> = OnceCell::new();
        let re = ROW.get_or_init(|| {
            Regex::new(r#"<div class="transaction [^"]*" data-id="([^"]*)""#)
                .expect("row pattern is valid")
        });

        match self.content() {
            Some(html) => re
                .captures_iter(&html)
                .map(|cap| cap[1].to_string())
                .collect(),
            None => vec![],
        }
    }

    /// Click target of the delete button of a rendered row
    pub fn remove_button(&self, id: &str) -> Option<ClickTarget> {
        let escaped = kopilka_utils::escape_html(id);
        if self.row_ids().iter().any(|row| *row == escaped) {
            Some(ClickTarget::with_classes(&["btn", "btn-danger", "transaction__remove"]).in_row(id))
        } else {
            None
        }
    }
}

impl PageRoot for MemoryRoot {
    fn has_node(&self, selector: &str) -> bool {
        let nodes = self.lock();
        match selector {
            TITLE => nodes.title.is_some(),
            CONTENT => nodes.content.is_some(),
            REMOVE_ACCOUNT => nodes.remove_account,
            _ => false,
        }
    }

    fn set_title(&self, text: &str) -> bool {
        let mut nodes = self.lock();
        if nodes.title.is_none() {
            return false;
        }
        nodes.title = Some(text.to_string());
        nodes.writes += 1;
        true
    }

    fn replace_content(&self, html: &str) -> bool {
        let mut nodes = self.lock();
        if nodes.content.is_none() {
            return false;
        }
        nodes.content = Some(html.to_string());
        nodes.writes += 1;
        true
    }

    fn show_notice(&self, message: &str) {
        self.lock().notices.push(message.to_string());
    }
}
