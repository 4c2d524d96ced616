use axum::{Json, Router, extract::State};

use crate::{
    dto::products::TotalsView,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", axum::routing::get(get_totals))
}

#[utoipa::path(
    get,
    path = "/api/totals",
    responses(
        (status = 200, description = "Product count, units in stock and stock value", body = ApiResponse<TotalsView>)
    ),
    tag = "Totals"
)]
pub async fn get_totals(State(state): State<AppState>) -> AppResult<Json<ApiResponse<TotalsView>>> {
    let totals = product_service::current_totals(&state).await?;
    Ok(Json(ApiResponse::success(
        "Totals",
        totals.into(),
        Some(Meta::empty()),
    )))
}
