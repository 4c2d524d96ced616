use storekeeper::{
    config::AppConfig,
    db::{SCHEMA_VERSION, create_pool, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_path).await?;
    run_migrations(&pool).await?;
    pool.close().await;
    println!("Schema version {SCHEMA_VERSION} applied");
    Ok(())
}
