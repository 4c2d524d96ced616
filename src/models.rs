use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A product as seen by business logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Assigned by the store; 0 until the first save.
    pub id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub price: f64,
    pub image_path: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub sku: Option<String>,
}

impl Product {
    /// An unsaved product with no optional fields and zero timestamps.
    pub fn new(product_name: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            id: 0,
            product_name: product_name.into(),
            quantity,
            price,
            image_path: None,
            created_at: 0,
            updated_at: 0,
            category: None,
            description: None,
            sku: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(Some(category.into()));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(Some(description.into()));
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = non_blank(Some(sku.into()));
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = non_blank(Some(image_path.into()));
        self
    }

    pub fn total_value(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }

    pub fn is_saved(&self) -> bool {
        self.id != 0
    }
}

/// Aggregates over every stored product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct Totals {
    pub count: i64,
    pub quantity: i64,
    pub value: f64,
}

/// Empty and whitespace-only text is treated as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_value_is_quantity_times_price() {
        let product = Product::new("Rice", 4, 2.5);
        assert_eq!(product.total_value(), 10.0);
        assert!(!product.is_saved());
    }

    #[test]
    fn blank_optionals_are_absent() {
        let product = Product::new("Beans", 1, 1.0)
            .with_category("   ")
            .with_sku("SKU-1")
            .with_description("");
        assert_eq!(product.category, None);
        assert_eq!(product.sku.as_deref(), Some("SKU-1"));
        assert_eq!(product.description, None);
    }
}
