//! # Cart Synchronization Controller
//!
//! Pushes the full cart to the backend whenever it changes while a user is
//! signed in.
//!
//! ## Push Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SyncController Flow                                │
//! │                                                                         │
//! │  Storefront ──StoreEvent──► SyncController (spawned task)              │
//! │                                  │                                      │
//! │                                  ├─ no user?  → skip                    │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                         tokio::spawn(push)  ◄── not awaited             │
//! │                                  │                                      │
//! │                                  ▼                                      │
//! │                  POST /api/cart/update {cartItems}                      │
//! │                                  │                                      │
//! │                 ┌────────────────┴────────────────┐                     │
//! │                 ▼                                 ▼                     │
//! │           success: true                 rejected / transport error     │
//! │           (status updated)              → error notification           │
//! │                                         (local cart NOT rolled back)    │
//! │                                                                         │
//! │  One change → one request. No debounce, no coalescing, no retry.       │
//! │  Two quick changes produce two concurrent requests; the backend may    │
//! │  apply them in either order.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Teardown
//! The controller holds no handle to the store, only its event receiver.
//! It stops when [`SyncHandle::shutdown`] is called or when the last
//! `Storefront` handle is dropped. Pushes already in flight finish in the
//! background.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, PoisonError};
use storefront_core::CartItems;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::client::StorefrontApi;
use crate::error::{StoreError, StoreResult};
use crate::notify::Notifier;
use crate::protocol::Ack;
use crate::store::{StoreEvent, Storefront};

// =============================================================================
// Sync Status
// =============================================================================

/// Counters describing the pushes issued so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    /// Pushes spawned.
    pub pushes_started: u64,
    /// Pushes the backend acknowledged with `success: true`.
    pub pushes_succeeded: u64,
    /// Pushes rejected or lost to transport errors.
    pub pushes_failed: u64,
    /// Changes ignored because nobody was signed in.
    pub skipped_signed_out: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

type SharedStatus = Arc<Mutex<SyncStatus>>;

fn update_status(status: &SharedStatus, f: impl FnOnce(&mut SyncStatus)) {
    f(&mut status.lock().unwrap_or_else(PoisonError::into_inner));
}

// =============================================================================
// Handle
// =============================================================================

/// Handle for a running [`SyncController`].
///
/// Dropping the handle does not stop the controller.
pub struct SyncHandle {
    shutdown_tx: mpsc::Sender<()>,
    status: SharedStatus,
    task: JoinHandle<()>,
}

impl SyncHandle {
    /// Snapshot of the push counters.
    pub fn status(&self) -> SyncStatus {
        self.status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns true while the controller loop is running.
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the controller loop and waits for it to exit.
    pub async fn shutdown(self) -> StoreResult<()> {
        // A closed channel means the loop already exited.
        let _ = self.shutdown_tx.send(()).await;
        self.task
            .await
            .map_err(|e| StoreError::TaskFailed(e.to_string()))
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Subscribes to store events and pushes the cart on every change.
pub struct SyncController {
    api: Arc<dyn StorefrontApi>,
    notifier: Arc<dyn Notifier>,
    status: SharedStatus,
}

impl SyncController {
    /// Subscribes to `store` and spawns the controller loop.
    ///
    /// The subscription is taken before this returns, so no change made
    /// after `spawn` is missed.
    pub fn spawn(store: &Storefront) -> SyncHandle {
        let events = store.subscribe();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let status = SharedStatus::default();

        let controller = SyncController {
            api: store.api(),
            notifier: store.notifier(),
            status: Arc::clone(&status),
        };

        let task = tokio::spawn(controller.run(events, shutdown_rx));

        SyncHandle {
            shutdown_tx,
            status,
            task,
        }
    }

    async fn run(
        self,
        mut events: mpsc::UnboundedReceiver<StoreEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        info!("Cart sync controller starting");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        debug!("Store dropped, stopping cart sync");
                        break;
                    }
                },

                Some(()) = shutdown_rx.recv() => {
                    info!("Cart sync controller shutting down");
                    break;
                }
            }
        }

        info!("Cart sync controller stopped");
    }

    fn handle_event(&self, event: StoreEvent) {
        let (cart, signed_in) = match event {
            StoreEvent::CartChanged { cart, signed_in } => (cart, signed_in),
            StoreEvent::UserChanged { cart, signed_in } => (cart, signed_in),
        };

        // Decided by who was signed in when the change happened, not now.
        if !signed_in {
            debug!("No user signed in, skipping cart push");
            update_status(&self.status, |s| s.skipped_signed_out += 1);
            return;
        }

        self.push(cart);
    }

    /// Spawns one fire-and-forget `POST /api/cart/update`.
    fn push(&self, cart: Arc<CartItems>) {
        let push_id = Uuid::new_v4();
        let span = info_span!("cart_push", %push_id, lines = cart.len());
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let status = Arc::clone(&self.status);

        update_status(&status, |s| s.pushes_started += 1);

        tokio::spawn(
            async move {
                match api.update_cart(&cart).await.and_then(Ack::into_result) {
                    Ok(()) => {
                        debug!("Cart pushed");
                        update_status(&status, |s| {
                            s.pushes_succeeded += 1;
                            s.last_success_at = Some(Utc::now());
                        });
                    }
                    Err(e) => {
                        warn!(error = %e, "Cart push failed");
                        notifier.error(&e.to_string());
                        update_status(&status, |s| {
                            s.pushes_failed += 1;
                            s.last_error = Some(e.to_string());
                        });
                    }
                }
            }
            .instrument(span),
        );
    }
}
