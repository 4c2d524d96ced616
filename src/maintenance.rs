use std::{io::ErrorKind, path::Path};

use crate::{config::AppConfig, error::AppResult, settings::SettingsService};

/// Wipe everything the app owns: preferences (and any half-written copy),
/// stored images and the database.
///
/// The database must already be closed; SQLite keeps its WAL companions open
/// otherwise.
pub async fn full_reset(config: &AppConfig, settings: &SettingsService) -> AppResult<()> {
    settings.clear().await?;
    remove_file_if_present(&settings.temp_path()).await?;

    remove_dir_if_present(&config.images_dir).await?;

    let db = config.database_path.as_os_str().to_owned();
    for suffix in ["", "-wal", "-shm"] {
        let mut path = db.clone();
        path.push(suffix);
        remove_file_if_present(Path::new(&path)).await?;
    }

    tracing::info!(
        database = %config.database_path.display(),
        images = %config.images_dir.display(),
        prefs = %settings.path().display(),
        "local data reset"
    );
    Ok(())
}

async fn remove_dir_if_present(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn remove_file_if_present(path: &Path) -> AppResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}
