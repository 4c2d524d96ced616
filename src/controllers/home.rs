//! Product list screen.
//!
//! Query text is debounced before it selects between the full listing and a
//! name search. Every query change also opens a minimum-loading window so a
//! fast, empty result does not flash an empty screen; the spinner shows while
//! that window is open and the list is still empty.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::ProductFeed;
use crate::{error::AppResult, live::Live, models::Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeTimings {
    pub debounce: Duration,
    pub min_loading: Duration,
}

impl Default for HomeTimings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(250),
            min_loading: Duration::from_millis(650),
        }
    }
}

/// Where the latest query is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPhase {
    /// Waiting for the input to go quiet.
    Pending,
    /// Quiet period elapsed; the fetch is being started.
    Debounced,
    /// Subscribed, no snapshot yet.
    Fetching,
    /// At least one snapshot received for the current query.
    Settled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HomeViewState {
    pub is_loading: bool,
    pub products: Vec<Product>,
    pub query: String,
    pub total_count: i64,
    pub total_quantity: i64,
    pub total_value: f64,
    pub phase: QueryPhase,
    pub error: Option<String>,
}

impl Default for HomeViewState {
    fn default() -> Self {
        Self {
            is_loading: true,
            products: Vec::new(),
            query: String::new(),
            total_count: 0,
            total_quantity: 0,
            total_value: 0.0,
            phase: QueryPhase::Pending,
            error: None,
        }
    }
}

pub struct HomeController<F: ProductFeed> {
    feed: F,
    queries: mpsc::UnboundedSender<String>,
    state: watch::Receiver<HomeViewState>,
    task: JoinHandle<()>,
}

impl<F: ProductFeed> HomeController<F> {
    /// Start the controller. The initial empty query counts as a query change.
    pub fn spawn(feed: F, timings: HomeTimings) -> Self {
        let (queries, rx) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(HomeViewState::default());
        let task = tokio::spawn(run(feed.clone(), timings, rx, state_tx));
        Self {
            feed,
            queries,
            state,
            task,
        }
    }

    /// Feed one keystroke's worth of query text.
    pub fn set_query(&self, query: impl Into<String>) {
        if self.queries.send(query.into()).is_err() {
            tracing::warn!("home controller stopped, query dropped");
        }
    }

    pub fn state(&self) -> HomeViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<HomeViewState> {
        self.state.clone()
    }

    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        self.feed.delete(id).await
    }
}

impl<F: ProductFeed> Drop for HomeController<F> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<F: ProductFeed>(
    feed: F,
    timings: HomeTimings,
    mut queries: mpsc::UnboundedReceiver<String>,
    state: watch::Sender<HomeViewState>,
) {
    let totals = feed.totals();
    let mut count = Some(totals.count);
    let mut quantity = Some(totals.quantity);
    let mut value = Some(totals.value);
    let mut list: Option<Live<Vec<Product>>> = None;
    // Kept apart so a fresh list snapshot only clears the list's own failure.
    let mut list_error: Option<String> = None;
    let mut totals_error: Option<String> = None;

    let mut view = HomeViewState::default();
    let start = Instant::now();
    let mut pending = Some(String::new());
    let mut debounce_at = start + timings.debounce;
    let mut grace_until = Some(start + timings.min_loading);

    loop {
        view.error = list_error.clone().or_else(|| totals_error.clone());
        publish(&state, &mut view, grace_until.is_some());
        let grace_deadline = grace_until.unwrap_or_else(Instant::now);

        tokio::select! {
            incoming = queries.recv() => {
                let Some(query) = incoming else { break };
                let now = Instant::now();
                view.query = query.clone();
                view.phase = QueryPhase::Pending;
                pending = Some(query);
                debounce_at = now + timings.debounce;
                grace_until = Some(now + timings.min_loading);
            }
            _ = sleep_until(debounce_at), if pending.is_some() => {
                let Some(query) = pending.take() else { continue };
                view.phase = QueryPhase::Debounced;
                publish(&state, &mut view, grace_until.is_some());
                // Drop the superseded subscription before opening the next one.
                drop(list.take());
                list = Some(if query.trim().is_empty() {
                    feed.products()
                } else {
                    feed.search(&query)
                });
                tracing::debug!(query = %query, "home query debounced, fetching");
                view.phase = QueryPhase::Fetching;
            }
            _ = sleep_until(grace_deadline), if grace_until.is_some() => {
                grace_until = None;
            }
            snapshot = next_or_pending(&mut list) => match snapshot {
                Some(Ok(products)) => {
                    view.products = products;
                    view.phase = QueryPhase::Settled;
                    list_error = None;
                }
                Some(Err(err)) => {
                    list_error = Some(err.to_string());
                    view.phase = QueryPhase::Settled;
                    list = None;
                }
                None => list = None,
            },
            snapshot = next_or_pending(&mut count) => match snapshot {
                Some(Ok(total)) => view.total_count = total,
                Some(Err(err)) => {
                    totals_error = Some(err.to_string());
                    count = None;
                }
                None => count = None,
            },
            snapshot = next_or_pending(&mut quantity) => match snapshot {
                Some(Ok(total)) => view.total_quantity = total,
                Some(Err(err)) => {
                    totals_error = Some(err.to_string());
                    quantity = None;
                }
                None => quantity = None,
            },
            snapshot = next_or_pending(&mut value) => match snapshot {
                Some(Ok(total)) => view.total_value = total,
                Some(Err(err)) => {
                    totals_error = Some(err.to_string());
                    value = None;
                }
                None => value = None,
            },
        }
    }

    tracing::debug!("home controller stopped");
}

fn publish(state: &watch::Sender<HomeViewState>, view: &mut HomeViewState, grace_open: bool) {
    view.is_loading = grace_open && view.products.is_empty();
    state.send_if_modified(|current| {
        if *current == *view {
            false
        } else {
            *current = view.clone();
            true
        }
    });
}

async fn next_or_pending<T: Clone>(live: &mut Option<Live<T>>) -> Option<AppResult<T>> {
    match live {
        Some(live) => live.next().await,
        None => std::future::pending().await,
    }
}
