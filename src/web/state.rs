use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::{oneshot, RwLock};
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::catalog::PricingPlan;
use crate::checkout::{CheckoutState, PaymentMethod, PaymentOutcome, PaymentRequest};
use crate::config::ServerConfig;
use crate::error::{CheckoutError, SessionError};
use crate::gateway::SimulatedGateway;

pub type SessionId = String;

/// One open checkout page.
#[derive(Clone, Debug)]
pub struct CheckoutSession {
    pub id: SessionId,
    pub state: CheckoutState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CheckoutSession {
    fn new(plan: &'static PricingPlan) -> Self {
        let now = Utc::now();
        Self {
            id: generate_session_id(),
            state: CheckoutState::new(Some(plan)),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, next: CheckoutState) {
        self.state = next;
        self.updated_at = Utc::now();
    }
}

/// Work handed to the payment task after a successful submit.
#[derive(Debug)]
pub struct PendingPayment {
    pub request: PaymentRequest,
    pub cancel: oneshot::Receiver<()>,
}

struct SessionEntry {
    session: CheckoutSession,
    // Dropping this cancels the in-flight payment task.
    cancel: Option<oneshot::Sender<()>>,
}

fn generate_session_id() -> SessionId {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

#[derive(Clone)]
pub struct AppState {
    sessions: Arc<RwLock<HashMap<SessionId, SessionEntry>>>,
    gateway: SimulatedGateway,
    session_ttl: Duration,
}

impl AppState {
    pub fn new(gateway: SimulatedGateway, session_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            gateway,
            session_ttl,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.gateway.build(), config.session_ttl())
    }

    pub fn gateway(&self) -> &SimulatedGateway {
        &self.gateway
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub async fn open_session(&self, plan: &'static PricingPlan) -> CheckoutSession {
        let session = CheckoutSession::new(plan);
        self.sessions.write().await.insert(
            session.id.clone(),
            SessionEntry {
                session: session.clone(),
                cancel: None,
            },
        );
        debug!(session_id = %session.id, plan = plan.id, "checkout session opened");
        session
    }

    pub async fn get_session(&self, id: &str) -> Option<CheckoutSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .map(|entry| entry.session.clone())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn select_method(
        &self,
        id: &str,
        method: PaymentMethod,
    ) -> Result<CheckoutSession, SessionError> {
        self.transition(id, |state| state.with_method(method)).await
    }

    pub async fn update_phone(
        &self,
        id: &str,
        input: &str,
    ) -> Result<CheckoutSession, SessionError> {
        self.transition(id, |state| state.with_phone(input)).await
    }

    pub async fn reset_payment(&self, id: &str) -> Result<CheckoutSession, SessionError> {
        self.transition(id, CheckoutState::reset).await
    }

    /// Moves the session to pending and arms its cancellation channel.
    pub async fn begin_payment(
        &self,
        id: &str,
    ) -> Result<(CheckoutSession, PendingPayment), SessionError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        let (next, request) = entry.session.state.submit()?;
        let (cancel_tx, cancel_rx) = oneshot::channel();
        entry.session.apply(next);
        entry.cancel = Some(cancel_tx);
        Ok((
            entry.session.clone(),
            PendingPayment {
                request,
                cancel: cancel_rx,
            },
        ))
    }

    /// Records the outcome of a payment task. Returns `None` when the session has
    /// gone away in the meantime.
    pub async fn finish_payment(
        &self,
        id: &str,
        outcome: PaymentOutcome,
    ) -> Option<CheckoutSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.cancel = None;
        match entry.session.state.resolve(outcome) {
            Ok(next) => entry.session.apply(next),
            Err(err) => warn!(session_id = %id, %err, "discarding payment outcome"),
        }
        Some(entry.session.clone())
    }

    /// Drops the session, cancelling any payment still in flight.
    pub async fn close_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id);
        if let Some(entry) = &removed {
            debug!(
                session_id = %id,
                status = %entry.session.state.status(),
                cancelled = entry.cancel.is_some(),
                "checkout session closed"
            );
        }
        removed.is_some()
    }

    /// Removes sessions idle for at least the configured TTL.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let ttl = self.session_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            (now - entry.session.updated_at)
                .to_std()
                .map(|idle| idle < ttl)
                .unwrap_or(true)
        });
        before - sessions.len()
    }

    async fn transition<F>(&self, id: &str, step: F) -> Result<CheckoutSession, SessionError>
    where
        F: FnOnce(&CheckoutState) -> Result<CheckoutState, CheckoutError>,
    {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id).ok_or(SessionError::NotFound)?;
        let next = step(&entry.session.state)?;
        entry.session.apply(next);
        Ok(entry.session.clone())
    }
}
