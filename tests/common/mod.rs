#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use storekeeper::{
    config::AppConfig,
    controllers::ProductFeed,
    error::AppResult,
    live::{Live, Publisher},
    models::Product,
    services::product_service::TotalsFeeds,
    state::AppState,
};
use tempfile::TempDir;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,storekeeper=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

/// A fresh database, image directory and preferences file in a temp dir.
pub async fn open_state() -> anyhow::Result<(TempDir, AppConfig, AppState)> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let config = AppConfig::in_dir(dir.path());
    let state = AppState::open(&config).await?;
    Ok((dir, config, state))
}

pub fn product(name: &str, quantity: i32, price: f64) -> Product {
    Product::new(name, quantity, price)
}

/// Wait (bounded) until `live` yields a snapshot matching `pred`.
pub async fn wait_until<T: Clone>(live: &mut Live<T>, pred: impl Fn(&T) -> bool) -> T {
    tokio::time::timeout(Duration::from_secs(5), async {
        if let Some(current) = live.current() {
            if pred(&current) {
                return current;
            }
        }
        loop {
            let value = live
                .next()
                .await
                .expect("live sequence ended")
                .expect("live sequence failed");
            if pred(&value) {
                return value;
            }
        }
    })
    .await
    .expect("timed out waiting for live snapshot")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch {
    All,
    Search(String),
}

#[derive(Default)]
struct FakeInner {
    products: Mutex<Vec<Product>>,
    fetches: Mutex<Vec<Fetch>>,
    cancelled: Mutex<Vec<Fetch>>,
    deleted: Mutex<Vec<i64>>,
    delay: Duration,
    count_fails: bool,
}

/// In-memory feed that records every fetch and answers after `delay`.
#[derive(Clone, Default)]
pub struct FakeFeed {
    inner: Arc<FakeInner>,
}

impl FakeFeed {
    pub fn new(products: Vec<Product>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(FakeInner {
                products: Mutex::new(products),
                delay,
                ..FakeInner::default()
            }),
        }
    }

    /// Like [`FakeFeed::new`], but the product count feed fails straight away.
    pub fn with_failing_count(products: Vec<Product>, delay: Duration) -> Self {
        Self {
            inner: Arc::new(FakeInner {
                products: Mutex::new(products),
                delay,
                count_fails: true,
                ..FakeInner::default()
            }),
        }
    }

    pub fn fetches(&self) -> Vec<Fetch> {
        self.inner.fetches.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<Fetch> {
        self.inner.cancelled.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<i64> {
        self.inner.deleted.lock().unwrap().clone()
    }

    fn list(&self, fetch: Fetch) -> Live<Vec<Product>> {
        self.inner.fetches.lock().unwrap().push(fetch.clone());

        let products: Vec<Product> = {
            let all = self.inner.products.lock().unwrap();
            match &fetch {
                Fetch::All => all.clone(),
                Fetch::Search(q) => {
                    let q = q.to_lowercase();
                    all.iter()
                        .filter(|p| p.product_name.to_lowercase().contains(&q))
                        .cloned()
                        .collect()
                }
            }
        };

        let (publisher, live) = Live::channel();
        let delay = self.inner.delay;
        let inner = self.inner.clone();
        // Not attached: the task outlives the subscription long enough to record it.
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            publisher.publish(products);
            publisher.closed().await;
            inner.cancelled.lock().unwrap().push(fetch);
        });
        live
    }

    fn failing<T: Clone + Send + Sync + 'static>(message: &str) -> Live<T> {
        let (publisher, live): (Publisher<T>, Live<T>) = Live::channel();
        publisher.fail(message);
        tokio::spawn(async move { publisher.closed().await });
        live
    }

    fn constant<T: Clone + Send + Sync + 'static>(value: T) -> Live<T> {
        let (publisher, live): (Publisher<T>, Live<T>) = Live::channel();
        publisher.publish(value);
        tokio::spawn(async move { publisher.closed().await });
        live
    }
}

impl ProductFeed for FakeFeed {
    fn products(&self) -> Live<Vec<Product>> {
        self.list(Fetch::All)
    }

    fn search(&self, query: &str) -> Live<Vec<Product>> {
        self.list(Fetch::Search(query.to_string()))
    }

    fn product(&self, id: i64) -> Live<Option<Product>> {
        let found = self
            .inner
            .products
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned();
        Self::constant(found)
    }

    fn totals(&self) -> TotalsFeeds {
        let products = self.inner.products.lock().unwrap().clone();
        TotalsFeeds {
            count: if self.inner.count_fails {
                Self::failing("count query failed")
            } else {
                Self::constant(products.len() as i64)
            },
            quantity: Self::constant(products.iter().map(|p| i64::from(p.quantity)).sum()),
            value: Self::constant(products.iter().map(Product::total_value).sum()),
        }
    }

    async fn add(&self, mut product: Product) -> AppResult<i64> {
        let mut products = self.inner.products.lock().unwrap();
        product.id = products.len() as i64 + 1;
        let id = product.id;
        products.push(product);
        Ok(id)
    }

    async fn update(&self, product: Product) -> AppResult<()> {
        let mut products = self.inner.products.lock().unwrap();
        if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
            *existing = product;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.inner.deleted.lock().unwrap().push(id);
        self.inner.products.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }
}
