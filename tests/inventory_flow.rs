mod common;

use std::time::Duration;

use common::{open_state, product, wait_until};
use storekeeper::{
    entity::products::Model as ProductRecord,
    error::AppError,
    models::Product,
    services::product_service,
};

async fn pause() {
    // Keeps updated_at strictly increasing between writes.
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn added_product_reads_back_unchanged() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let input = Product::new("Peak Milk 400g", 12, 1200.5)
        .with_category("Dairy")
        .with_description("Powdered milk tin")
        .with_sku("PK-400")
        .with_image_path("images/peak.jpg");
    let id = product_service::add_product(&state, input.clone()).await?;
    assert!(id > 0);

    let stored = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .expect("product should exist");

    let expected = Product {
        id,
        created_at: stored.created_at,
        updated_at: stored.updated_at,
        ..input
    };
    assert_eq!(stored, expected);
    assert!(stored.created_at > 0);
    assert_eq!(stored.created_at, stored.updated_at);
    assert_eq!(stored.total_value(), 12.0 * 1200.5);
    Ok(())
}

#[tokio::test]
async fn invalid_products_never_reach_the_store() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    for bad in [
        product("  ", 1, 1.0),
        product("Eggs", -1, 1.0),
        product("Eggs", 1, 0.0),
    ] {
        let err = product_service::add_product(&state, bad).await.unwrap_err();
        assert!(err.is_validation(), "unexpected error: {err:?}");
    }

    let totals = product_service::current_totals(&state).await?;
    assert_eq!(totals.count, 0);
    Ok(())
}

#[tokio::test]
async fn update_requires_an_existing_id() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let err = product_service::update_product(&state, product("Ghost", 1, 1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Invalid product id"));

    let mut missing = product("Ghost", 1, 1.0);
    missing.id = 9_999;
    let err = product_service::update_product(&state, missing)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

#[tokio::test]
async fn update_keeps_created_at_and_moves_updated_at() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let id = product_service::add_product(&state, product("Sugar 500g", 5, 900.0)).await?;
    let before = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .expect("product should exist");

    pause().await;
    let mut edited = before.clone();
    edited.quantity = 7;
    // A stale created_at from the caller must not overwrite the stored one.
    edited.created_at = 1;
    product_service::update_product(&state, edited).await?;

    let after = product_service::get_product(&state, id)
        .snapshot()
        .await?
        .expect("product should exist");
    assert_eq!(after.quantity, 7);
    assert_eq!(after.created_at, before.created_at);
    assert!(after.updated_at >= before.updated_at);
    assert!(after.updated_at >= after.created_at);

    // The invalid-value rules apply to updates as well.
    let mut bad = after.clone();
    bad.price = -1.0;
    assert!(product_service::update_product(&state, bad).await.unwrap_err().is_validation());
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let id = product_service::add_product(&state, product("Bread", 3, 800.0)).await?;
    product_service::delete_product(&state, id).await?;
    assert!(product_service::get_product(&state, id).snapshot().await?.is_none());

    product_service::delete_product(&state, id).await?;
    assert!(product_service::get_product(&state, id).snapshot().await?.is_none());
    Ok(())
}

#[tokio::test]
async fn search_matches_names_only_newest_first() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    product_service::add_product(&state, product("Apple Juice", 4, 700.0)).await?;
    pause().await;
    product_service::add_product(
        &state,
        product("Banana", 10, 50.0).with_description("apple flavoured"),
    )
    .await?;
    pause().await;
    product_service::add_product(&state, product("Pineapple", 2, 1500.0)).await?;
    pause().await;
    product_service::add_product(&state, product("APPLE pie", 1, 2000.0)).await?;

    let found = product_service::search_products(&state, "apple")
        .snapshot()
        .await?;
    let names: Vec<_> = found.iter().map(|p| p.product_name.as_str()).collect();
    assert_eq!(names, vec!["APPLE pie", "Pineapple", "Apple Juice"]);
    assert!(found.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));

    let literal = product_service::search_products(&state, "%").snapshot().await?;
    assert!(literal.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_finds_names_with_non_ascii_letters() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    product_service::add_product(&state, product("Äpfel", 3, 400.0)).await?;
    product_service::add_product(&state, product("CAFÉ crème", 1, 1500.0)).await?;

    let count = |query: &'static str| {
        let state = state.clone();
        async move {
            product_service::search_products(&state, query)
                .snapshot()
                .await
                .map(|found| found.len())
        }
    };

    assert_eq!(count("Äpfel").await?, 1);
    assert_eq!(count("CAFÉ crème").await?, 1);
    // ASCII letters around a non-ASCII one still fold.
    assert_eq!(count("caFÉ").await?, 1);
    assert_eq!(count("pFEL").await?, 1);
    Ok(())
}

#[tokio::test]
async fn listing_is_ordered_by_most_recent_update() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let first = product_service::add_product(&state, product("Salt", 1, 100.0)).await?;
    pause().await;
    product_service::add_product(&state, product("Pepper", 1, 150.0)).await?;
    pause().await;

    let mut salt = product_service::get_product(&state, first)
        .snapshot()
        .await?
        .expect("product should exist");
    salt.quantity = 9;
    product_service::update_product(&state, salt).await?;

    let all = product_service::get_products(&state).snapshot().await?;
    let names: Vec<_> = all.iter().map(|p| p.product_name.as_str()).collect();
    assert_eq!(names, vec!["Salt", "Pepper"]);
    Ok(())
}

#[tokio::test]
async fn totals_cover_count_quantity_and_value() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let empty = product_service::current_totals(&state).await?;
    assert_eq!((empty.count, empty.quantity, empty.value), (0, 0, 0.0));

    product_service::add_product(&state, product("Tomato", 2, 10.0)).await?;
    product_service::add_product(&state, product("Onion", 3, 5.0)).await?;

    let totals = product_service::current_totals(&state).await?;
    assert_eq!(totals.count, 2);
    assert_eq!(totals.quantity, 5);
    assert_eq!(totals.value, 35.0);
    Ok(())
}

#[tokio::test]
async fn live_queries_follow_writes() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;

    let mut all = product_service::get_products(&state);
    let mut value = product_service::get_totals(&state).value;
    wait_until(&mut all, |items| items.is_empty()).await;
    wait_until(&mut value, |v| *v == 0.0).await;

    let id = product_service::add_product(&state, product("Yam", 4, 2.5)).await?;
    let items = wait_until(&mut all, |items| items.len() == 1).await;
    assert_eq!(items[0].id, id);
    wait_until(&mut value, |v| *v == 10.0).await;

    product_service::delete_product(&state, id).await?;
    wait_until(&mut all, |items| items.is_empty()).await;
    wait_until(&mut value, |v| *v == 0.0).await;
    Ok(())
}

#[tokio::test]
async fn store_insert_with_existing_id_replaces_the_row() -> anyhow::Result<()> {
    let (_dir, _config, state) = open_state().await?;
    let store = state.products.store();

    let record = |name: &str| ProductRecord {
        id: 42,
        product_name: name.to_string(),
        quantity: 1,
        price: 1.0,
        image_path: None,
        created_at: 10,
        updated_at: 10,
        category: None,
        description: None,
        sku: None,
    };

    assert_eq!(store.insert_or_replace(record("First")).await?, 42);
    assert_eq!(store.insert_or_replace(record("Second")).await?, 42);

    let rows = store.get_all().snapshot().await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].product_name, "Second");

    // The store accepts values the use cases would reject.
    let mut odd = record("");
    odd.id = 0;
    odd.quantity = -5;
    let id = store.insert_or_replace(odd).await?;
    assert_ne!(id, 42);
    assert!(!store.update(ProductRecord { id: 777, ..record("Nope") }).await?);
    Ok(())
}

#[tokio::test]
async fn schema_survives_reopening() -> anyhow::Result<()> {
    let (_dir, config, state) = open_state().await?;
    product_service::add_product(&state, product("Garri", 6, 300.0)).await?;
    state.close().await;

    let reopened = storekeeper::state::AppState::open(&config).await?;
    let all = product_service::get_products(&reopened).snapshot().await?;
    assert_eq!(all.len(), 1);
    Ok(())
}
