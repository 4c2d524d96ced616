//! Screen-ready view state built on top of the product use cases.

pub mod add_edit;
pub mod detail;
pub mod home;

use std::future::Future;

use crate::{
    error::AppResult,
    live::Live,
    models::Product,
    services::product_service::{self, TotalsFeeds},
    state::AppState,
};

pub use add_edit::{AddEditForm, AddEditState};
pub use detail::{DetailController, DetailViewState};
pub use home::{HomeController, HomeTimings, HomeViewState, QueryPhase};

/// The use cases a controller reads from and writes through.
pub trait ProductFeed: Clone + Send + Sync + 'static {
    fn products(&self) -> Live<Vec<Product>>;
    fn search(&self, query: &str) -> Live<Vec<Product>>;
    fn product(&self, id: i64) -> Live<Option<Product>>;
    fn totals(&self) -> TotalsFeeds;
    fn add(&self, product: Product) -> impl Future<Output = AppResult<i64>> + Send;
    fn update(&self, product: Product) -> impl Future<Output = AppResult<()>> + Send;
    fn delete(&self, id: i64) -> impl Future<Output = AppResult<()>> + Send;
}

impl ProductFeed for AppState {
    fn products(&self) -> Live<Vec<Product>> {
        product_service::get_products(self)
    }

    fn search(&self, query: &str) -> Live<Vec<Product>> {
        product_service::search_products(self, query)
    }

    fn product(&self, id: i64) -> Live<Option<Product>> {
        product_service::get_product(self, id)
    }

    fn totals(&self) -> TotalsFeeds {
        product_service::get_totals(self)
    }

    async fn add(&self, product: Product) -> AppResult<i64> {
        product_service::add_product(self, product).await
    }

    async fn update(&self, product: Product) -> AppResult<()> {
        product_service::update_product(self, product).await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        product_service::delete_product(self, id).await
    }
}
