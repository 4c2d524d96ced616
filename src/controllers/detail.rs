use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::ProductFeed;
use crate::{error::AppResult, models::Product};

#[derive(Debug, Clone, PartialEq)]
pub struct DetailViewState {
    pub is_loading: bool,
    pub product: Option<Product>,
    pub error: Option<String>,
    pub deleted: bool,
}

impl Default for DetailViewState {
    fn default() -> Self {
        Self {
            is_loading: true,
            product: None,
            error: None,
            deleted: false,
        }
    }
}

/// Follows a single product and deletes it on request.
pub struct DetailController<F: ProductFeed> {
    feed: F,
    state: Arc<watch::Sender<DetailViewState>>,
    task: JoinHandle<()>,
}

impl<F: ProductFeed> DetailController<F> {
    pub fn spawn(feed: F, product_id: i64) -> Self {
        let (state, _) = watch::channel(DetailViewState::default());
        let state = Arc::new(state);

        let mut live = feed.product(product_id);
        let publisher = state.clone();
        let task = tokio::spawn(async move {
            while let Some(snapshot) = live.next().await {
                match snapshot {
                    Ok(product) => publisher.send_modify(|s| {
                        s.is_loading = false;
                        s.product = product;
                    }),
                    Err(err) => {
                        tracing::warn!(product_id, error = %err, "product detail feed failed");
                        publisher.send_modify(|s| {
                            s.is_loading = false;
                            s.error = Some(err.to_string());
                        });
                        break;
                    }
                }
            }
        });

        Self { feed, state, task }
    }

    pub fn state(&self) -> DetailViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailViewState> {
        self.state.subscribe()
    }

    /// Delete the loaded product. Returns `false` when nothing is loaded yet.
    pub async fn delete(&self) -> AppResult<bool> {
        let Some(id) = self.state.borrow().product.as_ref().map(|p| p.id) else {
            return Ok(false);
        };
        self.feed.delete(id).await?;
        self.state.send_modify(|s| s.deleted = true);
        Ok(true)
    }
}

impl<F: ProductFeed> Drop for DetailController<F> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
