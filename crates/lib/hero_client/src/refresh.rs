// @zen-component: AUTH-RefreshGate
//
//! Single-flight refresh coordination.
//!
//! Any number of requests can hit 401 at once; only the first may actually
//! call the refresh endpoint (the refresh cookie is single-use — a second
//! concurrent call would invalidate the rotation the first one is earning).
//! Everyone else parks on a oneshot receiver and gets the flight's outcome:
//! the new access token, or the shared failure cause.

use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::store::TokenStore;

type Outcome = Result<String, String>;

/// Instance-owned single-flight state. Clones share the same gate.
#[derive(Clone)]
pub(crate) struct RefreshGate {
    state: Arc<Mutex<GateState>>,
}

#[derive(Default)]
struct GateState {
    /// True while a refresh flight is up. Waiters may only be appended while
    /// this is set; the drain clears it and takes the queue in one critical
    /// section, so no waiter can slip in between.
    refreshing: bool,
    waiters: Vec<oneshot::Sender<Outcome>>,
}

impl RefreshGate {
    pub(crate) fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(GateState::default())),
        }
    }

    // @zen-impl: AUTH-5_AC-1, AUTH-5_AC-3
    /// Wait for a refreshed access token, starting a flight if none is up.
    ///
    /// The flight runs on its own task: a caller that gives up (or is
    /// cancelled) can never strand the in-flight flag or the queue.
    pub(crate) async fn refreshed_token(&self, store: &TokenStore) -> ClientResult<String> {
        let receiver = {
            let mut state = self.state.lock().await;
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            if state.refreshing {
                debug!(waiters = state.waiters.len(), "refresh already in flight; queueing");
            } else {
                state.refreshing = true;
                tokio::spawn(drive_refresh(Arc::clone(&self.state), store.clone()));
            }
            receiver
        };

        match receiver.await {
            Ok(Ok(token)) => Ok(token),
            Ok(Err(cause)) => Err(ClientError::SessionExpired(cause)),
            Err(_) => Err(ClientError::SessionExpired("refresh flight was dropped".into())),
        }
    }
}

// @zen-impl: AUTH-5_AC-2
/// Run one refresh flight and settle every waiter with its outcome.
async fn drive_refresh(state: Arc<Mutex<GateState>>, store: TokenStore) {
    let outcome: Outcome = match store.refresh().await {
        Ok(()) => match store.access_token().await {
            Some(token) => Ok(token),
            None => Err("refresh completed without an access token".into()),
        },
        Err(e) => Err(e.to_string()),
    };

    let waiters = {
        let mut state = state.lock().await;
        state.refreshing = false;
        std::mem::take(&mut state.waiters)
    };
    let failed = outcome.is_err();
    debug!(waiters = waiters.len(), failed, "refresh flight settled");
    for waiter in waiters {
        let _ = waiter.send(outcome.clone());
    }

    // The session is gone; queued requests have already been failed with the
    // cause, so close out local state last (mirrors the drain-then-logout
    // order of the original response pipeline).
    if failed {
        warn!("token refresh failed; forcing logout");
        store.logout().await;
    }
}
