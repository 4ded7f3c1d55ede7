//! Optimistic update helper.
//!
//! Encapsulates the pattern shared by every remote mutation of the engine:
//! 1. Snapshot the local state and apply the intended change
//! 2. Await the remote call with no lock held
//! 3. Commit the server's answer, or restore the snapshot on failure

use biocurate_core::error::Result;
use std::future::Future;
use tokio::sync::RwLock;

/// State that can be captured before a mutation and put back afterwards.
pub trait Snapshot {
    type Snapshot: Send;

    fn snapshot(&self) -> Self::Snapshot;
    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// Runs one optimistic mutation against `state`.
///
/// `apply` runs before `remote` is awaited so readers observe the intent
/// immediately. On success `commit` receives the remote result; on failure the
/// snapshot is restored and the error is returned for the caller to classify.
pub async fn optimistic_update<S, T, A, R, Fut, C>(
    state: &RwLock<S>,
    label: &str,
    apply: A,
    remote: R,
    commit: C,
) -> Result<T>
where
    S: Snapshot,
    A: FnOnce(&mut S),
    R: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: FnOnce(&mut S, &T),
{
    let snapshot = {
        let mut guard = state.write().await;
        let snapshot = guard.snapshot();
        apply(&mut guard);
        snapshot
    };

    tracing::debug!("[Optimistic] {} applied locally, awaiting remote", label);

    match remote().await {
        Ok(value) => {
            let mut guard = state.write().await;
            commit(&mut guard, &value);
            tracing::debug!("[Optimistic] {} committed", label);
            Ok(value)
        }
        Err(e) => {
            tracing::warn!("[Optimistic] {} failed, rolling back: {}", label, e);
            let mut guard = state.write().await;
            guard.restore(snapshot);
            Err(e)
        }
    }
}
