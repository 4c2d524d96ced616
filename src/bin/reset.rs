use storekeeper::{config::AppConfig, maintenance::full_reset, settings::SettingsService};

/// Deletes the database, stored images and preferences. Run with the server stopped.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    if !std::env::args().any(|arg| arg == "--yes") {
        println!(
            "This removes {}, {} and all preferences. Re-run with --yes to continue.",
            config.database_path.display(),
            config.images_dir.display()
        );
        return Ok(());
    }

    let settings = SettingsService::load(&config.prefs_path).await?;
    full_reset(&config, &settings).await?;
    println!("All local data removed");
    Ok(())
}
