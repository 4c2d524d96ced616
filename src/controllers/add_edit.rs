use super::ProductFeed;
use crate::{
    error::{AppError, AppResult},
    models::{Product, non_blank},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddEditState {
    pub id: Option<i64>,
    pub name: String,
    pub quantity_text: String,
    pub price: String,
    pub sku: String,
    pub category: String,
    pub description: String,
    pub image_path: Option<String>,
    pub name_error: Option<String>,
    pub quantity_error: Option<String>,
    pub price_error: Option<String>,
    pub is_saving: bool,
    pub is_valid: bool,
    pub is_edit_mode: bool,
    pub save_success: bool,
}

/// Text-field form for creating a product or editing an existing one.
pub struct AddEditForm<F: ProductFeed> {
    feed: F,
    state: AddEditState,
    loaded: Option<Product>,
}

impl<F: ProductFeed> AddEditForm<F> {
    pub fn new(feed: F) -> Self {
        let mut form = Self {
            feed,
            state: AddEditState::default(),
            loaded: None,
        };
        form.validate();
        form
    }

    /// Open the form on an existing product.
    pub async fn edit(feed: F, product_id: i64) -> AppResult<Self> {
        let product = match feed.product(product_id).first().await {
            Some(Ok(Some(product))) => product,
            Some(Err(err)) => return Err(err),
            Some(Ok(None)) | None => return Err(AppError::NotFound),
        };

        let state = AddEditState {
            id: Some(product.id),
            name: product.product_name.clone(),
            quantity_text: product.quantity.to_string(),
            price: if product.price == 0.0 {
                String::new()
            } else {
                product.price.to_string()
            },
            sku: product.sku.clone().unwrap_or_default(),
            category: product.category.clone().unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            image_path: product.image_path.clone(),
            is_edit_mode: true,
            ..AddEditState::default()
        };

        let mut form = Self {
            feed,
            state,
            loaded: Some(product),
        };
        form.validate();
        Ok(form)
    }

    pub fn state(&self) -> &AddEditState {
        &self.state
    }

    pub fn on_name_change(&mut self, value: impl Into<String>) {
        self.state.name = value.into();
        self.validate();
    }

    pub fn on_quantity_change(&mut self, value: impl Into<String>) {
        self.state.quantity_text = value.into();
        self.validate();
    }

    pub fn on_price_change(&mut self, value: impl Into<String>) {
        self.state.price = value.into();
        self.validate();
    }

    pub fn on_sku_change(&mut self, value: impl Into<String>) {
        self.state.sku = value.into();
    }

    pub fn on_category_change(&mut self, value: impl Into<String>) {
        self.state.category = value.into();
    }

    pub fn on_description_change(&mut self, value: impl Into<String>) {
        self.state.description = value.into();
    }

    pub fn on_image_path_change(&mut self, value: Option<String>) {
        self.state.image_path = non_blank(value);
    }

    /// Persist the form. Returns `false` without saving when the form is
    /// invalid or a save is already running.
    pub async fn save(&mut self) -> AppResult<bool> {
        if !self.state.is_valid || self.state.is_saving {
            return Ok(false);
        }
        self.state.is_saving = true;

        let product = self.build_product();
        let result = if self.state.is_edit_mode && product.is_saved() {
            self.feed.update(product).await.map(|()| None)
        } else {
            self.feed.add(product).await.map(Some)
        };

        self.state.is_saving = false;
        match result {
            Ok(new_id) => {
                if let Some(id) = new_id {
                    self.state.id = Some(id);
                }
                self.state.save_success = true;
                Ok(true)
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving product failed");
                Err(err)
            }
        }
    }

    fn build_product(&self) -> Product {
        let s = &self.state;
        let (created_at, updated_at) = self
            .loaded
            .as_ref()
            .map(|p| (p.created_at, p.updated_at))
            .unwrap_or_default();
        Product {
            id: s.id.unwrap_or(0),
            product_name: s.name.trim().to_string(),
            quantity: parse_quantity(&s.quantity_text).unwrap_or(0),
            price: parse_price(&s.price).unwrap_or(0.0),
            image_path: non_blank(s.image_path.clone()),
            created_at,
            updated_at,
            category: non_blank(Some(s.category.clone())),
            description: non_blank(Some(s.description.clone())),
            sku: non_blank(Some(s.sku.clone())),
        }
    }

    fn validate(&mut self) {
        let s = &mut self.state;
        s.name_error = s
            .name
            .trim()
            .is_empty()
            .then(|| "Product name is required".to_string());
        s.quantity_error = if s.quantity_text.trim().is_empty() {
            Some("Quantity is required".to_string())
        } else if parse_quantity(&s.quantity_text).is_none() {
            Some("Quantity must be >= 0".to_string())
        } else {
            None
        };
        s.price_error = parse_price(&s.price)
            .is_none()
            .then(|| "Price must be greater than 0".to_string());
        s.is_valid = s.name_error.is_none() && s.quantity_error.is_none() && s.price_error.is_none();
    }
}

fn parse_quantity(text: &str) -> Option<i32> {
    text.trim().parse::<i32>().ok().filter(|q| *q >= 0)
}

fn parse_price(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p > 0.0)
}
