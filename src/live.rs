//! Live sequences.
//!
//! A [`Live`] is the subscriber half of a single-slot channel: the publisher
//! replaces the current snapshot, the subscriber observes the latest one.
//! Intermediate snapshots may be skipped. Dropping the subscriber aborts the
//! task that feeds it.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
enum Snapshot<T> {
    Pending,
    Ready(T),
    Failed(String),
}

/// Producer side of a live sequence.
#[derive(Debug)]
pub struct Publisher<T> {
    tx: watch::Sender<Snapshot<T>>,
}

impl<T> Publisher<T> {
    /// Replace the current snapshot. Returns `false` once the subscriber is gone.
    pub fn publish(&self, value: T) -> bool {
        self.tx.send(Snapshot::Ready(value)).is_ok()
    }

    /// Publish a terminal failure. The subscriber sees it as `Err` from
    /// [`Live::next`] and the sequence ends when the publisher is dropped.
    pub fn fail(&self, message: impl Into<String>) {
        let _ = self.tx.send(Snapshot::Failed(message.into()));
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Resolves once the subscriber has been dropped.
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Subscriber side of a live sequence.
#[derive(Debug)]
pub struct Live<T> {
    rx: watch::Receiver<Snapshot<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T: Clone> Live<T> {
    pub fn channel() -> (Publisher<T>, Live<T>) {
        let (tx, rx) = watch::channel(Snapshot::Pending);
        (Publisher { tx }, Live { rx, task: None })
    }

    /// Tie the lifetime of `task` to this subscription.
    pub fn attach(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    /// Wait for the next snapshot. `None` once the publisher is gone.
    pub async fn next(&mut self) -> Option<AppResult<T>> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            let snapshot = self.rx.borrow_and_update().clone();
            match snapshot {
                Snapshot::Pending => continue,
                Snapshot::Ready(value) => return Some(Ok(value)),
                Snapshot::Failed(message) => return Some(Err(AppError::LiveQuery(message))),
            }
        }
    }

    /// The current snapshot if one has been published, otherwise the next one.
    pub async fn first(&mut self) -> Option<AppResult<T>> {
        let snapshot = self.rx.borrow_and_update().clone();
        match snapshot {
            Snapshot::Pending => self.next().await,
            Snapshot::Ready(value) => Some(Ok(value)),
            Snapshot::Failed(message) => Some(Err(AppError::LiveQuery(message))),
        }
    }

    /// Take one snapshot and end the subscription.
    pub async fn snapshot(mut self) -> AppResult<T> {
        self.first()
            .await
            .unwrap_or_else(|| Err(AppError::LiveQuery("sequence ended before a snapshot".into())))
    }

    pub fn current(&self) -> Option<T> {
        match &*self.rx.borrow() {
            Snapshot::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Transform every snapshot with `f`. The returned sequence owns this one.
    pub fn map<U, F>(mut self, f: F) -> Live<U>
    where
        T: Send + Sync + 'static,
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> U + Send + 'static,
    {
        let (publisher, live) = Live::channel();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    snapshot = self.next() => match snapshot {
                        Some(Ok(value)) => {
                            if !publisher.publish(f(value)) {
                                break;
                            }
                        }
                        Some(Err(AppError::LiveQuery(message))) => {
                            publisher.fail(message);
                            break;
                        }
                        Some(Err(err)) => {
                            publisher.fail(err.to_string());
                            break;
                        }
                        None => break,
                    },
                    _ = publisher.closed() => break,
                }
            }
        });
        live.attach(task)
    }
}

impl<T> Drop for Live<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
