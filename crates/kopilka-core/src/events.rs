//! Delegated click bindings
//!
//! Bindings hang off the root rather than individual rows, so they keep
//! working after the list is re-rendered.

use crate::dom::ClickTarget;
use crate::models::Identifier;

/// What a click asks the page to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    RemoveAccount,
    RemoveTransaction(Identifier),
}

/// Handler kinds a selector can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    RemoveAccount,
    /// Needs the id of the closest `.transaction` row
    RemoveTransaction,
}

#[derive(Debug, Clone)]
struct Binding {
    selector: &'static str,
    handler: Handler,
}

/// Selector → handler table
#[derive(Debug, Clone, Default)]
pub struct EventRoutes {
    bindings: Vec<Binding>,
}

impl EventRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, selector: &'static str, handler: Handler) -> Self {
        self.bindings.push(Binding { selector, handler });
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// First binding whose selector matches the target
    pub fn resolve(&self, target: &ClickTarget) -> Option<PageAction> {
        let binding = self.bindings.iter().find(|b| target.matches(b.selector))?;
        match binding.handler {
            Handler::RemoveAccount => Some(PageAction::RemoveAccount),
            Handler::RemoveTransaction => target
                .closest_row_id
                .clone()
                .map(PageAction::RemoveTransaction),
        }
    }
}
