//! Persistent product store.
//!
//! Rows live in a single SQLite table. Every successful write bumps a change
//! counter; each live query runs in its own task and re-runs its SQL whenever
//! the counter moves, publishing a fresh snapshot to its subscriber.

use std::{future::Future, sync::Arc};

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tokio::sync::watch;

use crate::{
    db::{DbPool, OrmConn},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductRecord},
    error::AppResult,
    live::Live,
};

#[derive(Clone)]
pub struct ProductStore {
    orm: OrmConn,
    pool: DbPool,
    changes: Arc<watch::Sender<u64>>,
}

impl ProductStore {
    pub fn new(pool: DbPool, orm: OrmConn) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            orm,
            pool,
            changes: Arc::new(changes),
        }
    }

    /// Close every pooled connection. Live queries fail on their next run.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Insert `record`, or replace the row with the same id when `id != 0`.
    /// Returns the row id.
    pub async fn insert_or_replace(&self, record: ProductRecord) -> AppResult<i64> {
        let id = if record.id == 0 {
            let active = active_model(&record, false);
            Products::insert(active).exec(&self.orm).await?.last_insert_id
        } else {
            let id = record.id;
            let active = active_model(&record, true);
            Products::insert(active)
                .on_conflict(
                    OnConflict::column(Column::Id)
                        .update_columns([
                            Column::ProductName,
                            Column::Quantity,
                            Column::Price,
                            Column::ImagePath,
                            Column::CreatedAt,
                            Column::UpdatedAt,
                            Column::Category,
                            Column::Description,
                            Column::Sku,
                        ])
                        .to_owned(),
                )
                .exec(&self.orm)
                .await?;
            id
        };

        tracing::debug!(product_id = id, "product row written");
        self.notify();
        Ok(id)
    }

    /// Overwrite the row matching `record.id`, leaving `created_at` as stored.
    /// Returns `false` when no row has that id.
    pub async fn update(&self, record: ProductRecord) -> AppResult<bool> {
        let mut active = active_model(&record, false);
        active.created_at = NotSet;

        let result = Products::update_many()
            .set(active)
            .filter(Column::Id.eq(record.id))
            .exec(&self.orm)
            .await?;

        let matched = result.rows_affected > 0;
        if matched {
            tracing::debug!(product_id = record.id, "product row updated");
            self.notify();
        }
        Ok(matched)
    }

    /// Remove the row with `id`. Deleting a missing id is a no-op.
    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let result = Products::delete_by_id(id).exec(&self.orm).await?;
        if result.rows_affected > 0 {
            tracing::debug!(product_id = id, "product row deleted");
            self.notify();
        }
        Ok(())
    }

    /// Every row, most recently updated first.
    pub fn get_all(&self) -> Live<Vec<ProductRecord>> {
        self.live("get_all", |store| async move {
            let rows = Products::find()
                .order_by_desc(Column::UpdatedAt)
                .order_by_desc(Column::Id)
                .all(&store.orm)
                .await?;
            Ok(rows)
        })
    }

    pub fn get_by_id(&self, id: i64) -> Live<Option<ProductRecord>> {
        self.live("get_by_id", move |store| async move {
            let row = Products::find_by_id(id).one(&store.orm).await?;
            Ok(row)
        })
    }

    /// Rows whose name contains `query`, most recently updated first. Both sides
    /// are folded by SQLite's `LOWER`, so case is ignored for ASCII letters and
    /// other characters must match exactly.
    pub fn search(&self, query: &str) -> Live<Vec<ProductRecord>> {
        let pattern = format!("%{}%", escape_like(query));
        self.live("search", move |store| {
            let pattern = pattern.clone();
            async move {
                let rows = Products::find()
                    .filter(Expr::cust_with_values(
                        "LOWER(product_name) LIKE LOWER(?) ESCAPE '!'",
                        [pattern],
                    ))
                    .order_by_desc(Column::UpdatedAt)
                    .order_by_desc(Column::Id)
                    .all(&store.orm)
                    .await?;
                Ok(rows)
            }
        })
    }

    pub fn total_count(&self) -> Live<i64> {
        self.live("total_count", |store| async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                .fetch_one(&store.pool)
                .await?;
            Ok(count)
        })
    }

    pub fn total_quantity(&self) -> Live<i64> {
        self.live("total_quantity", |store| async move {
            let quantity: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM products")
                .fetch_one(&store.pool)
                .await?;
            Ok(quantity)
        })
    }

    pub fn total_value(&self) -> Live<f64> {
        self.live("total_value", |store| async move {
            let value: f64 =
                sqlx::query_scalar("SELECT COALESCE(SUM(quantity * price), 0.0) FROM products")
                    .fetch_one(&store.pool)
                    .await?;
            Ok(value)
        })
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version += 1);
    }

    fn live<T, F, Fut>(&self, label: &'static str, query: F) -> Live<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(ProductStore) -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<T>> + Send + 'static,
    {
        let (publisher, live) = Live::channel();
        let mut changes = self.changes.subscribe();
        let store = self.clone();

        let task = tokio::spawn(async move {
            loop {
                // Mark before querying so a write that lands mid-query triggers another run.
                changes.borrow_and_update();
                match query(store.clone()).await {
                    Ok(value) => {
                        if !publisher.publish(value) {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(query = label, error = %err, "live query failed");
                        publisher.fail(err.to_string());
                        break;
                    }
                }

                tokio::select! {
                    changed = changes.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = publisher.closed() => break,
                }
                tracing::trace!(query = label, "store changed, re-running live query");
            }
        });

        live.attach(task)
    }
}

fn active_model(record: &ProductRecord, with_id: bool) -> ActiveModel {
    ActiveModel {
        id: if with_id { Set(record.id) } else { NotSet },
        product_name: Set(record.product_name.clone()),
        quantity: Set(record.quantity),
        price: Set(record.price),
        image_path: Set(record.image_path.clone()),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
        category: Set(record.category.clone()),
        description: Set(record.description.clone()),
        sku: Set(record.sku.clone()),
    }
}

/// Escape LIKE wildcards so the query matches literally.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '!' | '%' | '_') {
            escaped.push('!');
        }
        escaped.push(ch);
    }
    escaped
}
