//! Application State
//!
//! Everything the HTTP handlers share: checkout sessions, the submitter and
//! the organization registry. Built once in `main` and handed to the router.

use crate::checkout::session::lock_session;
use crate::checkout::{
    CheckoutSession, CheckoutSubmitter, DeliveryError, HttpDeliveryClient, SessionHandle,
};
use crate::config::AppConfig;
use crate::organizations::OrganizationStore;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

pub struct AppState {
    /// Checkout sessions keyed by the `cart_session` cookie.
    ///
    /// A session is only stored once it holds something (a cart line or a
    /// form field) and is dropped by [`AppState::evict_idle`] after a period
    /// without requests.
    pub sessions: DashMap<String, SessionHandle>,

    pub submitter: CheckoutSubmitter,

    pub organizations: OrganizationStore,
}

impl AppState {
    pub fn new(submitter: CheckoutSubmitter, organizations: OrganizationStore) -> Self {
        Self {
            sessions: DashMap::new(),
            submitter,
            organizations,
        }
    }

    /// Wires the HTTP delivery client from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, DeliveryError> {
        let delivery = &config.delivery;
        let client = HttpDeliveryClient::new(delivery.url.clone(), delivery.timeout)?;
        tracing::info!(url = %client.url(), timeout = ?delivery.timeout, "delivery endpoint configured");

        let submitter = CheckoutSubmitter::new(
            Arc::new(client),
            delivery.to.as_str(),
            delivery.subject.as_str(),
        );
        Ok(Self::new(submitter, OrganizationStore::new()))
    }

    /// Returns the stored session for `session_id` and marks it active
    pub fn existing_session(&self, session_id: &str) -> Option<SessionHandle> {
        let handle = self.sessions.get(session_id).map(|entry| entry.value().clone())?;
        lock_session(&handle).touch();
        Some(handle)
    }

    /// Returns the stored session for `session_id`, or a detached empty one
    /// that is never added to the map
    pub fn session_or_scratch(&self, session_id: &str) -> SessionHandle {
        self.existing_session(session_id)
            .unwrap_or_else(|| Arc::new(Mutex::new(CheckoutSession::new())))
    }

    /// Runs `op` against the session for `session_id`.
    ///
    /// An unknown id gets a fresh session that is stored only if `op` leaves
    /// it non-empty, so reads and failed operations allocate nothing.
    pub fn with_session_mut<R, F>(&self, session_id: &str, op: F) -> R
    where
        F: FnOnce(&mut CheckoutSession) -> R,
    {
        if let Some(handle) = self.existing_session(session_id) {
            return op(&mut *lock_session(&handle));
        }

        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(entry) => {
                let handle = entry.get().clone();
                drop(entry);
                let mut session = lock_session(&handle);
                session.touch();
                op(&mut *session)
            }
            Entry::Vacant(entry) => {
                let mut session = CheckoutSession::new();
                let result = op(&mut session);
                if !session.is_pristine() {
                    tracing::debug!(session_id = %session_id, "checkout session created");
                    entry.insert(Arc::new(Mutex::new(session)));
                }
                result
            }
        }
    }

    /// Drops every session idle for at least `max_idle`.
    ///
    /// Sessions with a submission in flight are kept. Returns how many were
    /// removed.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        self.sessions.retain(|_, handle| {
            let session = lock_session(handle);
            let keep = session.is_sending() || session.idle_for(now) < max_idle;
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }
}

/// Periodically evicts sessions idle for longer than `max_idle`
pub fn spawn_session_sweeper(state: SharedState, max_idle: Duration) -> JoinHandle<()> {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let evicted = state.evict_idle(max_idle);
            if evicted > 0 {
                tracing::info!(evicted, remaining = state.sessions.len(), "idle sessions evicted");
            }
        }
    })
}
