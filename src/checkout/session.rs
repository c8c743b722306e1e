//! Checkout Session State
//!
//! One shopper's cart, contact form and submit phase. A session is either
//! `Idle` or `Sending`; while `Sending`, every mutation and any new submit is
//! refused so the in-flight submission stays consistent with what the
//! shopper sees.

use super::error::CheckoutError;
use super::models::Submission;
use crate::cart::models::CartLine;
use crate::cart::Cart;
use crate::customer::CustomerInfo;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Shared handle to a session. The lock is never held across an `.await`.
pub type SessionHandle = Arc<Mutex<CheckoutSession>>;

/// Where a session is in its submit cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitPhase {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone)]
pub struct CheckoutSession {
    cart: Cart,
    customer: CustomerInfo,
    phase: SubmitPhase,
    last_active: Instant,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self {
            cart: Cart::default(),
            customer: CustomerInfo::default(),
            phase: SubmitPhase::Idle,
            last_active: Instant::now(),
        }
    }
}

impl CheckoutSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records shopper activity; idle sessions are evicted by the sweeper
    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }

    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_active)
    }

    /// True when there is nothing worth keeping: empty cart, empty form,
    /// no submission in flight
    pub fn is_pristine(&self) -> bool {
        self.cart.is_empty() && self.customer.is_empty() && !self.is_sending()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        self.phase == SubmitPhase::Sending
    }

    /// Mutable cart access, refused while a submission is in flight
    pub fn cart_mut(&mut self) -> Result<&mut Cart, CheckoutError> {
        self.ensure_idle()?;
        Ok(&mut self.cart)
    }

    /// Mutable form access, refused while a submission is in flight
    pub fn customer_mut(&mut self) -> Result<&mut CustomerInfo, CheckoutError> {
        self.ensure_idle()?;
        Ok(&mut self.customer)
    }

    /// Validates the session and, on success, enters `Sending` and returns
    /// the submission to deliver.
    ///
    /// Checks run in order: in-flight guard, empty cart, contact fields.
    pub fn begin_submission(&mut self, at: DateTime<Utc>) -> Result<Submission, CheckoutError> {
        self.ensure_idle()?;

        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.customer
            .validate_for_submission()
            .map_err(CheckoutError::MissingContactInfo)?;

        let submission = Submission::new(
            self.customer.clone(),
            self.cart.lines().to_vec(),
            self.cart.total(),
            at,
        );
        self.phase = SubmitPhase::Sending;
        Ok(submission)
    }

    /// Settles a delivered submission: cart and form are reset
    pub fn complete_submission(&mut self) {
        self.cart.clear();
        self.customer.reset();
        self.phase = SubmitPhase::Idle;
    }

    /// Settles a failed submission: cart and form are kept for a retry
    pub fn abort_submission(&mut self) {
        self.phase = SubmitPhase::Idle;
    }

    pub fn snapshot(&self, session_id: &str) -> SessionSnapshot {
        SessionSnapshot {
            session_id: session_id.to_string(),
            items: self.cart.lines().to_vec(),
            total: self.cart.total(),
            line_count: self.cart.line_count(),
            item_count: self.cart.item_count(),
            customer: self.customer.clone(),
            submitting: self.is_sending(),
        }
    }

    fn ensure_idle(&self) -> Result<(), CheckoutError> {
        match self.phase {
            SubmitPhase::Idle => Ok(()),
            SubmitPhase::Sending => Err(CheckoutError::SubmissionInProgress),
        }
    }
}

/// What the page renders for a session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub items: Vec<CartLine>,
    pub total: Money,
    pub line_count: usize,
    pub item_count: u64,
    pub customer: CustomerInfo,
    pub submitting: bool,
}

/// Returns a session to `Idle` if it is dropped while still armed.
///
/// Held by the submitter across the outbound call so that a panic or an
/// abandoned future cannot leave the session stuck in `Sending`.
pub(crate) struct SendingGuard<'a> {
    session: &'a Mutex<CheckoutSession>,
    armed: bool,
}

impl<'a> SendingGuard<'a> {
    pub(crate) fn new(session: &'a Mutex<CheckoutSession>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    /// The submission was settled explicitly; nothing to undo
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for SendingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut session = lock_session(self.session);
            if session.is_sending() {
                tracing::warn!("submission abandoned; returning session to idle");
                session.abort_submission();
            }
        }
    }
}

/// Locks a session, recovering the state if a previous holder panicked
pub fn lock_session(session: &Mutex<CheckoutSession>) -> MutexGuard<'_, CheckoutSession> {
    session.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
