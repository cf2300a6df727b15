use std::path::PathBuf;

use nd_analysis::GroupingStats;
use nd_core::{Article, ArticleStore, Error, GroupingMode, MergeSummary, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::store::Store;

const QUEUE_DEPTH: usize = 32;

enum Request {
    Snapshot(oneshot::Sender<Result<Vec<Article>>>),
    Merge(Vec<Article>, oneshot::Sender<Result<MergeSummary>>),
    Regroup(GroupingMode, oneshot::Sender<Result<GroupingStats>>),
    MergeAndRegroup(Vec<Article>, GroupingMode, oneshot::Sender<Result<MergeSummary>>),
    Backup(PathBuf, oneshot::Sender<Result<PathBuf>>),
}

/// Cloneable handle to the blocking task that owns the store.
///
/// Every request runs to completion before the next one is read, so
/// overlapping periodic and on-demand cycles cannot lose each other's
/// writes.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<Request>,
}

impl StoreHandle {
    /// Moves `store` onto the blocking pool, where its file I/O cannot stall
    /// the async workers. Must be called inside a tokio runtime.
    pub fn spawn<S: ArticleStore + 'static>(store: Store<S>) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        tokio::task::spawn_blocking(move || run(store, rx));
        Self { tx }
    }

    async fn request<T>(&self, make: impl FnOnce(oneshot::Sender<Result<T>>) -> Request) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| Error::Storage("store task has stopped".to_string()))?;
        rx.await
            .map_err(|_| Error::Storage("store task dropped the request".to_string()))?
    }

    pub async fn snapshot(&self) -> Result<Vec<Article>> {
        self.request(Request::Snapshot).await
    }

    pub async fn merge(&self, articles: Vec<Article>) -> Result<MergeSummary> {
        self.request(|reply| Request::Merge(articles, reply)).await
    }

    pub async fn regroup(&self, mode: GroupingMode) -> Result<GroupingStats> {
        self.request(|reply| Request::Regroup(mode, reply)).await
    }

    /// Merge followed by a grouping pass, with no other request in between.
    ///
    /// A failed grouping pass is logged and does not fail the merge.
    pub async fn merge_and_regroup(
        &self,
        articles: Vec<Article>,
        mode: GroupingMode,
    ) -> Result<MergeSummary> {
        self.request(|reply| Request::MergeAndRegroup(articles, mode, reply))
            .await
    }

    pub async fn backup(&self, dir: impl Into<PathBuf>) -> Result<PathBuf> {
        let dir = dir.into();
        self.request(|reply| Request::Backup(dir, reply)).await
    }
}

fn run<S: ArticleStore>(mut store: Store<S>, mut rx: mpsc::Receiver<Request>) {
    while let Some(request) = rx.blocking_recv() {
        // A caller that gave up on its reply is not an error for the store.
        match request {
            Request::Snapshot(reply) => {
                let _ = reply.send(store.snapshot());
            }
            Request::Merge(articles, reply) => {
                let _ = reply.send(store.merge(articles));
            }
            Request::Regroup(mode, reply) => {
                let _ = reply.send(store.regroup(mode));
            }
            Request::MergeAndRegroup(articles, mode, reply) => {
                let result = store.merge(articles).map(|summary| {
                    if let Err(e) = store.regroup(mode) {
                        warn!("Grouping by {} skipped: {}", mode, e);
                    }
                    summary
                });
                let _ = reply.send(result);
            }
            Request::Backup(dir, reply) => {
                let _ = reply.send(store.backup(&dir));
            }
        }
    }
    debug!("Store task stopped");
}
