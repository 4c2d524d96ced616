use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub user_name: Option<String>,
    pub store_name: Option<String>,
    pub profile_image_path: Option<String>,
    pub first_run: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCategoryRequest {
    pub name: String,
}
