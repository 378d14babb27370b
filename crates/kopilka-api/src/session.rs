//! One page controller per browser page
//!
//! A full page load opens a session and embeds its id in the layout; htmx
//! sends it back in [`SESSION_HEADER`] with every request made from that page.
//! Each session owns its root, its display context and its pending
//! `HX-Trigger` signals, so tabs never see each other's state.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kopilka_config::PageConfig;
use kopilka_core::{Collaborators, CoreResult, MemoryRoot, PageRoot, TransactionsPage};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::remote::{ClientConfirmed, HtmxCoordinator, StoreAccessor};
use crate::{ApiError, AppState};

pub const SESSION_HEADER: &str = "X-Page-Session";

/// Least recently used sessions are dropped beyond this
const MAX_SESSIONS: usize = 256;
const MAX_ID_LEN: usize = 64;

/// Controller state of one browser page
pub struct PageSession {
    pub id: String,
    pub root: Arc<MemoryRoot>,
    pub page: TransactionsPage,
    pub coordinator: Arc<HtmxCoordinator>,
}

/// Collaborators over the shared store that signal into `coordinator`
pub fn collaborators(accessor: &Arc<StoreAccessor>, coordinator: Arc<HtmxCoordinator>) -> Collaborators {
    Collaborators::new(
        accessor.clone(),
        accessor.clone(),
        Arc::new(ClientConfirmed),
        coordinator,
    )
}

#[derive(Default)]
struct Open {
    by_id: HashMap<String, Arc<PageSession>>,
    recent: VecDeque<String>,
}

impl Open {
    fn touch(&mut self, id: &str) {
        self.recent.retain(|known| known != id);
        self.recent.push_back(id.to_string());
    }
}

pub struct Sessions {
    accessor: Arc<StoreAccessor>,
    labels: PageConfig,
    open: Mutex<Open>,
}

impl Sessions {
    pub fn new(accessor: Arc<StoreAccessor>, labels: PageConfig) -> Self {
        Self {
            accessor,
            labels,
            open: Mutex::new(Open::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Open> {
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The session with this id, created when unknown; a fresh id when `None`
    pub fn open(&self, id: Option<&str>) -> CoreResult<Arc<PageSession>> {
        let mut open = self.lock();
        if let Some(session) = id.and_then(|id| open.by_id.get(id).cloned()) {
            open.touch(&session.id);
            return Ok(session);
        }

        let id = id.map(str::to_string).unwrap_or_else(|| Uuid::new_v4().to_string());
        let session = Arc::new(self.build(id.clone())?);
        open.by_id.insert(id.clone(), session.clone());
        open.touch(&id);

        while open.recent.len() > MAX_SESSIONS {
            if let Some(oldest) = open.recent.pop_front() {
                log::debug!("Dropping page session {}", oldest);
                open.by_id.remove(&oldest);
            }
        }
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<PageSession>> {
        self.lock().by_id.get(id).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    fn build(&self, id: String) -> CoreResult<PageSession> {
        let root = Arc::new(MemoryRoot::new(&self.labels.placeholder_title));
        let coordinator = Arc::new(HtmxCoordinator::new());
        let page = TransactionsPage::new(
            Some(root.clone() as Arc<dyn PageRoot>),
            collaborators(&self.accessor, coordinator.clone()),
            self.labels.clone(),
        )?;
        log::debug!("Opened page session {}", id);
        Ok(PageSession { id, root, page, coordinator })
    }
}

/// Ids are echoed into markup, so only plain tokens are accepted
fn valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Session of the requesting page
pub struct Session(pub Arc<PageSession>);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|id| valid_id(id));
        Ok(Session(state.sessions.open(id)?))
    }
}
