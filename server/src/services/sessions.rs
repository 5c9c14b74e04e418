// storefront_server/src/services/sessions.rs

//! Opaque bearer-token sessions, each carrying its own cart.
//!
//! A session only remembers *who* signed in. The caller's role is always read
//! back from the catalog, so a role change takes effect on the next request.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand_core::{OsRng, RngCore};
use storefront::Cart;
use tracing::debug;
use uuid::Uuid;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct Session {
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub cart: Cart,
}

#[derive(Debug, Default)]
pub struct SessionStore {
  sessions: RwLock<HashMap<String, Session>>,
}

fn new_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Starts a session for `user_id` with an empty cart and returns its token.
  pub fn open(&self, user_id: Uuid) -> String {
    let token = new_token();
    self.sessions.write().insert(
      token.clone(),
      Session {
        user_id,
        created_at: Utc::now(),
        cart: Cart::new(),
      },
    );
    debug!(%user_id, "Session opened.");
    token
  }

  /// Drops the session and its cart. Returns false for unknown tokens.
  pub fn close(&self, token: &str) -> bool {
    self.sessions.write().remove(token).is_some()
  }

  pub fn user_id(&self, token: &str) -> Option<Uuid> {
    self.sessions.read().get(token).map(|s| s.user_id)
  }

  pub fn cart(&self, token: &str) -> Option<Cart> {
    self.sessions.read().get(token).map(|s| s.cart.clone())
  }

  /// Runs `f` against the session's cart under the write lock.
  pub fn with_cart<R>(&self, token: &str, f: impl FnOnce(&mut Cart) -> R) -> Option<R> {
    self.sessions.write().get_mut(token).map(|s| f(&mut s.cart))
  }

  pub fn len(&self) -> usize {
    self.sessions.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.sessions.read().is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tokens_are_unique_and_resolve_to_their_user() {
    let store = SessionStore::new();
    let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
    let t1 = store.open(alice);
    let t2 = store.open(bob);

    assert_ne!(t1, t2);
    assert_eq!(store.user_id(&t1), Some(alice));
    assert_eq!(store.user_id(&t2), Some(bob));
    assert_eq!(store.user_id("nope"), None);
  }

  #[test]
  fn closing_a_session_drops_its_cart() {
    let store = SessionStore::new();
    let token = store.open(Uuid::new_v4());
    assert_eq!(store.with_cart(&token, |cart| cart.len()), Some(0));

    assert!(store.close(&token));
    assert!(!store.close(&token));
    assert!(store.cart(&token).is_none());
    assert!(store.is_empty());
  }
}
