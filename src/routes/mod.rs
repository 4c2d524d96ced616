use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod profile;
pub mod totals;

pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/totals", totals::router())
        .nest("/profile", profile::router())
}
