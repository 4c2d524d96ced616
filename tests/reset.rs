mod common;

use common::{open_state, product};
use storekeeper::{maintenance::full_reset, services::product_service, state::AppState};

#[tokio::test]
async fn full_reset_wipes_products_images_and_preferences() -> anyhow::Result<()> {
    let (_dir, config, state) = open_state().await?;

    product_service::add_product(&state, product("Cement 50kg", 10, 5200.0)).await?;
    tokio::fs::create_dir_all(&config.images_dir).await?;
    tokio::fs::write(config.images_dir.join("cement.jpg"), b"jpeg").await?;
    state.settings.set_store_name("Corner Shop").await?;
    state.settings.add_category("Building").await?;
    state.settings.set_first_run(false).await?;
    // Left behind by an interrupted save.
    tokio::fs::write(state.settings.temp_path(), b"{").await?;

    state.close().await;
    full_reset(&config, &state.settings).await?;

    assert!(!config.images_dir.exists());
    assert!(!config.database_path.exists());
    assert!(!state.settings.temp_path().exists());
    let profile = state.settings.profile();
    assert!(profile.first_run);
    assert!(profile.store_name.is_empty());
    assert!(profile.categories.is_empty());

    let reopened = AppState::open(&config).await?;
    assert_eq!(product_service::current_totals(&reopened).await?.count, 0);
    assert!(reopened.settings.profile().first_run);
    Ok(())
}

#[tokio::test]
async fn full_reset_on_a_fresh_install_succeeds() -> anyhow::Result<()> {
    let (_dir, config, state) = open_state().await?;
    state.close().await;

    full_reset(&config, &state.settings).await?;
    // Nothing left to remove the second time.
    full_reset(&config, &state.settings).await?;
    Ok(())
}
