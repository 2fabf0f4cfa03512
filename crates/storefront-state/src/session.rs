//! # Session State
//!
//! Who is signed in, whether they are a seller, and whether the session
//! check has finished yet.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session State Transitions                          │
//! │                                                                         │
//! │  ┌──────────────┐  is-auth ok      ┌──────────────────────────┐        │
//! │  │  Unresolved  │ ───────────────► │ Resolved, user = Some(u) │        │
//! │  │ user = None  │                  │ cart seeded from u       │        │
//! │  │ resolved = ✗ │                  └──────────────────────────┘        │
//! │  └──────┬───────┘                                                       │
//! │         │ denied / network error   ┌──────────────────────────┐        │
//! │         └────────────────────────► │ Resolved, user = None    │        │
//! │                                    └──────────────────────────┘        │
//! │                                                                         │
//! │  `auth_resolved` separates "not yet known" from "known signed out",    │
//! │  so route guards do not bounce a user before the check returns.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::User;
use tracing::{debug, info, warn};

use crate::client::StorefrontApi;

/// Session portion of the store.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Current user; `None` when signed out or unknown.
    pub user: Option<User>,

    /// Elevated seller-side access. Independent of `user`.
    pub is_seller: bool,

    /// Set once the first session check completes, whatever the outcome.
    pub auth_resolved: bool,

    /// Whether the UI should show the login modal.
    pub show_user_login: bool,
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

/// Runs the session check, downgrading every failure to "signed out".
pub async fn resolve_session(api: &dyn StorefrontApi) -> Option<User> {
    match api.check_session().await.and_then(|resp| resp.into_user()) {
        Ok(user) => {
            info!(user_id = %user.id, cart_lines = user.cart_items.len(), "Session resolved");
            Some(user)
        }
        Err(e) if e.is_rejection() => {
            debug!(reason = %e, "No active session");
            None
        }
        Err(e) => {
            warn!(error = %e, "Session check failed, treating as signed out");
            None
        }
    }
}

/// Runs the seller check; any failure means "not a seller".
pub async fn resolve_seller(api: &dyn StorefrontApi) -> bool {
    match api.check_seller().await {
        Ok(ack) => {
            debug!(is_seller = ack.success, "Seller check complete");
            ack.success
        }
        Err(e) => {
            warn!(error = %e, "Seller check failed, defaulting to non-seller");
            false
        }
    }
}
