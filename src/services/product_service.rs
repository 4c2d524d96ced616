use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    live::Live,
    models::{Product, Totals},
    state::AppState,
};

/// The three aggregate live scalars.
pub struct TotalsFeeds {
    pub count: Live<i64>,
    pub quantity: Live<i64>,
    pub value: Live<f64>,
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Name, quantity and price rules shared by add and update.
pub fn validate_product(product: &Product) -> AppResult<()> {
    if product.product_name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if product.quantity < 0 {
        return Err(AppError::validation("Quantity must be >= 0"));
    }
    if product.price.is_nan() || product.price <= 0.0 {
        return Err(AppError::validation("Price must be greater than 0"));
    }
    Ok(())
}

pub async fn add_product(state: &AppState, mut product: Product) -> AppResult<i64> {
    validate_product(&product)?;

    let now = now_millis();
    product.product_name = product.product_name.trim().to_string();
    if !product.is_saved() {
        product.created_at = now;
    }
    product.updated_at = now.max(product.created_at);

    let id = state.products.add_product(product).await?;
    tracing::info!(product_id = id, "product added");
    Ok(id)
}

pub async fn update_product(state: &AppState, mut product: Product) -> AppResult<()> {
    if !product.is_saved() {
        return Err(AppError::validation("Invalid product id"));
    }
    validate_product(&product)?;

    product.product_name = product.product_name.trim().to_string();
    product.updated_at = now_millis().max(product.updated_at);

    let id = product.id;
    if !state.products.update_product(product).await? {
        return Err(AppError::validation(format!("Product {id} does not exist")));
    }
    tracing::info!(product_id = id, "product updated");
    Ok(())
}

pub async fn delete_product(state: &AppState, id: i64) -> AppResult<()> {
    state.products.delete_product(id).await?;
    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

pub fn get_products(state: &AppState) -> Live<Vec<Product>> {
    state.products.get_products()
}

pub fn get_product(state: &AppState, id: i64) -> Live<Option<Product>> {
    state.products.get_product(id)
}

/// Callers route a blank query to [`get_products`] instead.
pub fn search_products(state: &AppState, query: &str) -> Live<Vec<Product>> {
    state.products.search_products(query)
}

pub fn get_totals(state: &AppState) -> TotalsFeeds {
    TotalsFeeds {
        count: state.products.get_total_count(),
        quantity: state.products.get_total_quantity(),
        value: state.products.get_total_inventory_value(),
    }
}

/// One reading of the three aggregates.
pub async fn current_totals(state: &AppState) -> AppResult<Totals> {
    let feeds = get_totals(state);
    Ok(Totals {
        count: feeds.count.snapshot().await?,
        quantity: feeds.quantity.snapshot().await?,
        value: feeds.value.snapshot().await?,
    })
}
