use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        products::{CreateProductRequest, ProductList, ProductView, TotalsView, UpdateProductRequest},
        profile::{AddCategoryRequest, UpdateProfileRequest},
    },
    models::{Product, Totals},
    response::{ApiResponse, Meta},
    routes::{health, params, products, profile, totals},
    settings::Profile,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::create_product,
        products::get_product,
        products::update_product,
        products::delete_product,
        totals::get_totals,
        profile::get_profile,
        profile::update_profile,
        profile::add_category,
        profile::remove_category
    ),
    components(
        schemas(
            Product,
            Totals,
            ProductView,
            ProductList,
            TotalsView,
            CreateProductRequest,
            UpdateProductRequest,
            Profile,
            UpdateProfileRequest,
            AddCategoryRequest,
            health::HealthData,
            params::ProductQuery,
            Meta,
            ApiResponse<ProductView>,
            ApiResponse<ProductList>,
            ApiResponse<TotalsView>,
            ApiResponse<Profile>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Inventory products"),
        (name = "Totals", description = "Inventory aggregates"),
        (name = "Profile", description = "Profile and onboarding preferences"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
