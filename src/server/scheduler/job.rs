use std::time::Duration;

use actix_web::web;
use log::info;
use tokio::{pin, select, time};
use tokio_util::sync::CancellationToken;
use tokio_util::task::task_tracker;

use crate::backend::OrderBackend;
use crate::server::state::AppState;
use crate::util::time::helper::get_utc_now;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

async fn worker<B>(state: web::Data<AppState<B>>, idle: Duration, cancel_token: CancellationToken)
where
    B: OrderBackend + Send + Sync + 'static,
{
    let interval = time::interval(SWEEP_INTERVAL); // run once every minute
    pin!(interval);
    loop {
        select! {
            _ = interval.tick() => {},
            _ = cancel_token.cancelled() => {
                info!("received cancel signal, returning gracefully");
                return;
            }
        }

        let removed = state.sweep_idle(get_utc_now(), idle).await;
        if removed > 0 {
            info!("dropped {} idle sessions", removed);
        }
    }
}

/// Drops guest sessions idle for longer than `idle` until cancelled.
pub async fn session_sweeper<B>(state: web::Data<AppState<B>>, idle: Duration, cancel_token: CancellationToken)
where
    B: OrderBackend + Send + Sync + 'static,
{
    let tracker = task_tracker::TaskTracker::new();
    tracker.spawn(worker(state, idle, cancel_token));
    if tracker.close() {
        tracker.wait().await;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::order::{CheckoutRequest, ConfirmRequest};
    use crate::error::OrderError;
    use serde_json::Value;

    struct NoBackend;

    impl OrderBackend for NoBackend {
        async fn create_order(&self, _: &CheckoutRequest) -> Result<Value, OrderError> {
            Ok(Value::Null)
        }

        async fn confirm_order(&self, _: &ConfirmRequest) -> Result<Value, OrderError> {
            Ok(Value::Null)
        }
    }

    #[actix_web::test]
    async fn sweeper_stops_on_cancel() {
        let state = web::Data::new(AppState::new(NoBackend));
        let token = CancellationToken::new();
        token.cancel();
        time::timeout(Duration::from_secs(5), session_sweeper(state, Duration::from_secs(1), token))
            .await
            .expect("sweeper did not stop");
    }
}
