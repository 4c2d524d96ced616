use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Product, Totals};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
    pub image_path: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
}

impl CreateProductRequest {
    pub fn into_product(self) -> Product {
        let mut product = Product::new(self.product_name, self.quantity, self.price);
        product.image_path = self.image_path;
        product.category = self.category;
        product.description = self.description;
        product.sku = self.sku;
        product
    }
}

/// Fields left out keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub price: Option<f64>,
    pub image_path: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
}

impl UpdateProductRequest {
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.product_name {
            product.product_name = name;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image_path) = self.image_path {
            product.image_path = Some(image_path);
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(sku) = self.sku {
            product.sku = Some(sku);
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub total_value: f64,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let total_value = product.total_value();
        Self {
            product,
            total_value,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductView>)]
    pub items: Vec<ProductView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TotalsView {
    pub total_count: i64,
    pub total_quantity: i64,
    pub total_value: f64,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        Self {
            total_count: totals.count,
            total_quantity: totals.quantity,
            total_value: totals.value,
        }
    }
}
