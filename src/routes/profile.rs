use axum::{
    Json, Router,
    extract::{Path, State},
};

use crate::{
    dto::profile::{AddCategoryRequest, UpdateProfileRequest},
    error::AppResult,
    response::{ApiResponse, Meta},
    settings::Profile,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", axum::routing::get(get_profile))
        .route("/", axum::routing::put(update_profile))
        .route("/categories", axum::routing::post(add_category))
        .route("/categories/{name}", axum::routing::delete(remove_category))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile and onboarding preferences", body = ApiResponse<Profile>)
    ),
    tag = "Profile"
)]
pub async fn get_profile(State(state): State<AppState>) -> Json<ApiResponse<Profile>> {
    Json(ApiResponse::success(
        "Profile",
        state.settings.profile(),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ApiResponse<Profile>)
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let settings = &state.settings;
    if let Some(name) = payload.user_name {
        settings.set_user_name(name).await?;
    }
    if let Some(name) = payload.store_name {
        settings.set_store_name(name).await?;
    }
    if let Some(path) = payload.profile_image_path {
        settings
            .set_profile_image_path(Some(path).filter(|p| !p.trim().is_empty()))
            .await?;
    }
    if let Some(first_run) = payload.first_run {
        settings.set_first_run(first_run).await?;
    }

    Ok(Json(ApiResponse::success(
        "Updated",
        settings.profile(),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/profile/categories",
    request_body = AddCategoryRequest,
    responses(
        (status = 200, description = "Category added; blank names are ignored", body = ApiResponse<Profile>)
    ),
    tag = "Profile"
)]
pub async fn add_category(
    State(state): State<AppState>,
    Json(payload): Json<AddCategoryRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    state.settings.add_category(&payload.name).await?;
    Ok(Json(ApiResponse::success(
        "Category added",
        state.settings.profile(),
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    delete,
    path = "/api/profile/categories/{name}",
    params(
        ("name" = String, Path, description = "Category name")
    ),
    responses(
        (status = 200, description = "Category removed", body = ApiResponse<Profile>)
    ),
    tag = "Profile"
)]
pub async fn remove_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    state.settings.remove_category(&name).await?;
    Ok(Json(ApiResponse::success(
        "Category removed",
        state.settings.profile(),
        Some(Meta::empty()),
    )))
}
