//! Periodic notification-feed refresh.
//!
//! Re-runs the reconcile pass on a fixed interval so deadline crossings
//! surface even when no client is hitting the feed endpoint. Each pass
//! rebuilds the derived state from scratch; a failed pass is logged and
//! skipped, and the next tick starts clean.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::feed;

/// Default refresh interval in seconds.
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Run the feed refresh loop.
///
/// Reconciles every `FEED_REFRESH_INTERVAL_SECS` seconds (defaults to
/// 300). Runs until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    let interval_secs: u64 = std::env::var("FEED_REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS);

    tracing::info!(interval_secs, "Feed refresh job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Feed refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                let result = feed::reconcile(&pool, Utc::now()).await;
                // A pass that finishes after shutdown has begun is dropped.
                if cancel.is_cancelled() {
                    break;
                }
                match result {
                    Ok(snapshot) => {
                        if snapshot.created > 0 {
                            tracing::info!(
                                created = snapshot.created,
                                display = snapshot.entries.len(),
                                "Feed refresh: new notifications persisted"
                            );
                        } else {
                            tracing::debug!(
                                display = snapshot.entries.len(),
                                "Feed refresh: nothing new"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Feed refresh: reconcile failed");
                    }
                }
            }
        }
    }
}
