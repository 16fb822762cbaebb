//! Live query streams: a fresh snapshot after every relevant write.

use super::changes::{Generations, Table};
use super::sqlite::SqliteStore;
use super::{StoreError, StoreResult};
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Runs `f` against the store on the blocking thread pool.
pub(crate) async fn run_blocking<R, F>(db: Arc<Mutex<SqliteStore>>, f: F) -> StoreResult<R>
where
    F: FnOnce(&mut SqliteStore) -> StoreResult<R> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut store = db
            .lock()
            .map_err(|_| StoreError::Background("store lock poisoned".to_string()))?;
        f(&mut store)
    })
    .await?
}

/// A subscription that yields the full result set of a query, first on
/// subscription and again whenever a table it depends on changes.
///
/// A storage failure is delivered as a single `Err` item, after which the
/// stream ends. Dropping the `LiveQuery` cancels its background task.
///
/// Must be created from within a Tokio runtime.
pub struct LiveQuery<T> {
    rx: mpsc::Receiver<StoreResult<Vec<T>>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> LiveQuery<T> {
    /// Spawns the refresh loop for `query`.
    pub(crate) fn spawn<F>(
        db: Arc<Mutex<SqliteStore>>,
        mut changes: watch::Receiver<Generations>,
        tables: &'static [Table],
        label: &'static str,
        query: F,
    ) -> Self
    where
        F: Fn(&SqliteStore) -> StoreResult<Vec<T>> + Send + Sync + 'static,
    {
        let query = Arc::new(query);
        let (tx, rx) = mpsc::channel(1);

        let task = tokio::spawn(async move {
            // Mark generations seen before querying so a write that lands
            // mid-query triggers another run.
            let mut seen = *changes.borrow_and_update();
            loop {
                let q = Arc::clone(&query);
                let result = run_blocking(Arc::clone(&db), move |store| (*q)(&*store)).await;

                let failed = match &result {
                    Ok(rows) => {
                        tracing::trace!(query = label, rows = rows.len(), "live query emitted");
                        false
                    }
                    Err(err) => {
                        tracing::warn!(query = label, error = %err, "live query failed");
                        true
                    }
                };
                if tx.send(result).await.is_err() || failed {
                    return;
                }

                loop {
                    if changes.changed().await.is_err() {
                        return;
                    }
                    let now = *changes.borrow_and_update();
                    if now.changed_since(&seen, tables) {
                        seen = now;
                        break;
                    }
                }
            }
        });

        Self { rx, task }
    }
}

impl<T> LiveQuery<T> {
    pub(crate) fn from_parts(rx: mpsc::Receiver<StoreResult<Vec<T>>>, task: JoinHandle<()>) -> Self {
        Self { rx, task }
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `None` once the stream has ended (after an error, or when the
    /// store has been dropped).
    pub async fn next(&mut self) -> Option<StoreResult<Vec<T>>> {
        self.rx.recv().await
    }

    /// Returns the first snapshot and closes the subscription.
    pub async fn first(mut self) -> StoreResult<Vec<T>> {
        self.next().await.unwrap_or_else(|| {
            Err(StoreError::Background(
                "live query ended before its first snapshot".to_string(),
            ))
        })
    }
}

impl<T> Stream for LiveQuery<T> {
    type Item = StoreResult<Vec<T>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
