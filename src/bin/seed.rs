use storekeeper::{
    config::AppConfig,
    models::Product,
    services::product_service,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let state = AppState::open(&config).await?;

    let existing = product_service::get_products(&state).snapshot().await?;
    if !existing.is_empty() {
        println!("Store already has {} products, skipping seed", existing.len());
        state.close().await;
        return Ok(());
    }

    let products = vec![
        ("Golden Penny Semovita 1kg", 24, 1850.0, "Groceries", "GP-SEM-1KG"),
        ("Peak Milk Tin 400g", 40, 1200.0, "Dairy", "PK-MLK-400"),
        ("Indomie Chicken 70g", 120, 250.0, "Noodles", "IND-CHK-70"),
        ("Dangote Sugar 500g", 35, 900.0, "Groceries", "DG-SUG-500"),
    ];

    for (name, quantity, price, category, sku) in products {
        let product = Product::new(name, quantity, price)
            .with_category(category)
            .with_sku(sku);
        let id = product_service::add_product(&state, product).await?;
        println!("Seeded product {id}: {name}");
    }

    state.close().await;
    Ok(())
}
