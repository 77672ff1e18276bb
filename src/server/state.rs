use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::Mutex;

use crate::backend::OrderBackend;
use crate::cart::Cart;
use crate::flow::CheckoutFlow;
use crate::server::controller::error::CustomError;
use crate::util::time::helper::get_utc_now;

const SESSION_ID_LEN: usize = 32;

/// One guest's cart and checkout progress, alive from session start to
/// sign-out or idle sweep.
#[derive(Debug)]
pub(crate) struct Session {
    pub cart: Cart,
    pub flow: CheckoutFlow,
    last_seen: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            cart: Cart::new(),
            flow: CheckoutFlow::new(),
            last_seen: now,
        }
    }
}

pub struct AppState<B> {
    backend: B,
    sessions: Mutex<HashMap<String, Session>>,
}

impl<B: OrderBackend> AppState<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) async fn open_session(&self) -> String {
        let id: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        self.sessions
            .lock()
            .await
            .insert(id.clone(), Session::new(get_utc_now()));
        id
    }

    pub(crate) async fn close_session(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    /// Runs `f` on a session under the lock, refreshing its idle timer.
    pub(crate) async fn with_session<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Result<R, CustomError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id).ok_or(CustomError::SessionNotFound)?;
        session.last_seen = get_utc_now();
        Ok(f(session))
    }

    /// Session whose displayed order is `order_id`, if any.
    pub(crate) async fn with_order_session<R>(
        &self,
        order_id: &str,
        f: impl FnOnce(&mut Session) -> R,
    ) -> Option<R> {
        let mut sessions = self.sessions.lock().await;
        sessions
            .values_mut()
            .find(|s| s.flow.handle().is_some_and(|h| h.order_id == order_id))
            .map(f)
    }

    /// Drops sessions idle for longer than `idle`, returns how many.
    pub(crate) async fn sweep_idle(&self, now: DateTime<Utc>, idle: Duration) -> usize {
        let idle = chrono::Duration::from_std(idle).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_seen <= idle);
        before - sessions.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::util::time::helper::set_utc_now;

    #[actix_web::test]
    async fn sessions_are_isolated() {
        let state = AppState::new(FakeBackend::default());
        let (a, b) = (state.open_session().await, state.open_session().await);
        assert_ne!(a, b);
        assert_eq!(a.len(), SESSION_ID_LEN);

        state
            .with_session(&a, |s| s.cart.add_one(&crate::cart::test::menu_item("X", "R1", 2)))
            .await
            .unwrap();
        let b_empty = state.with_session(&b, |s| s.cart.is_empty()).await.unwrap();
        assert!(b_empty);

        assert!(state.close_session(&a).await);
        assert!(matches!(
            state.with_session(&a, |_| ()).await,
            Err(CustomError::SessionNotFound)
        ));
    }

    #[actix_web::test]
    async fn idle_sessions_are_swept() {
        set_utc_now(0);
        let state = AppState::new(FakeBackend::default());
        let stale = state.open_session().await;
        set_utc_now(500);
        let fresh = state.open_session().await;

        let removed = state.sweep_idle(get_utc_now() + chrono::Duration::seconds(200), Duration::from_secs(600)).await;
        assert_eq!(removed, 1);
        assert!(state.with_session(&stale, |_| ()).await.is_err());
        assert!(state.with_session(&fresh, |_| ()).await.is_ok());
    }
}
