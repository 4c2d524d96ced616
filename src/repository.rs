use crate::{
    entity::products::Model as ProductRecord,
    error::AppResult,
    live::Live,
    models::{Product, non_blank},
    store::ProductStore,
};

/// Adapter between stored rows and domain products.
#[derive(Clone)]
pub struct ProductRepository {
    store: ProductStore,
}

impl ProductRepository {
    pub fn new(store: ProductStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ProductStore {
        &self.store
    }

    pub fn get_products(&self) -> Live<Vec<Product>> {
        self.store.get_all().map(products_from_records)
    }

    pub fn get_product(&self, id: i64) -> Live<Option<Product>> {
        self.store.get_by_id(id).map(|row| row.map(product_from_record))
    }

    pub fn search_products(&self, query: &str) -> Live<Vec<Product>> {
        self.store.search(query).map(products_from_records)
    }

    pub async fn add_product(&self, product: Product) -> AppResult<i64> {
        self.store.insert_or_replace(record_from_product(product)).await
    }

    pub async fn update_product(&self, product: Product) -> AppResult<bool> {
        self.store.update(record_from_product(product)).await
    }

    pub async fn delete_product(&self, id: i64) -> AppResult<()> {
        self.store.delete_by_id(id).await
    }

    pub fn get_total_count(&self) -> Live<i64> {
        self.store.total_count()
    }

    pub fn get_total_quantity(&self) -> Live<i64> {
        self.store.total_quantity()
    }

    pub fn get_total_inventory_value(&self) -> Live<f64> {
        self.store.total_value()
    }
}

fn products_from_records(rows: Vec<ProductRecord>) -> Vec<Product> {
    rows.into_iter().map(product_from_record).collect()
}

fn product_from_record(record: ProductRecord) -> Product {
    Product {
        id: record.id,
        product_name: record.product_name,
        quantity: record.quantity,
        price: record.price,
        image_path: non_blank(record.image_path),
        created_at: record.created_at,
        updated_at: record.updated_at,
        category: non_blank(record.category),
        description: non_blank(record.description),
        sku: non_blank(record.sku),
    }
}

fn record_from_product(product: Product) -> ProductRecord {
    ProductRecord {
        id: product.id,
        product_name: product.product_name,
        quantity: product.quantity,
        price: product.price,
        image_path: non_blank(product.image_path),
        created_at: product.created_at,
        updated_at: product.updated_at,
        category: non_blank(product.category),
        description: non_blank(product.description),
        sku: non_blank(product.sku),
    }
}
