use std::{env, path::PathBuf, time::Duration};

use crate::controllers::home::HomeTimings;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
    pub prefs_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub search_debounce: Duration,
    pub min_loading: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "storekeeper.db".to_string());
        let images_dir = env::var("IMAGES_DIR").unwrap_or_else(|_| "images".to_string());
        let prefs_path = env::var("PREFS_PATH").unwrap_or_else(|_| "profile_prefs.json".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let defaults = HomeTimings::default();
        let search_debounce = millis_from_env("SEARCH_DEBOUNCE_MS").unwrap_or(defaults.debounce);
        let min_loading = millis_from_env("MIN_LOADING_MS").unwrap_or(defaults.min_loading);
        Ok(Self {
            database_path: database_path.into(),
            images_dir: images_dir.into(),
            prefs_path: prefs_path.into(),
            host,
            port,
            search_debounce,
            min_loading,
        })
    }

    /// Config rooted in `dir`, with every file the app owns placed inside it.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let defaults = HomeTimings::default();
        Self {
            database_path: dir.join("storekeeper.db"),
            images_dir: dir.join("images"),
            prefs_path: dir.join("profile_prefs.json"),
            host: "127.0.0.1".to_string(),
            port: 0,
            search_debounce: defaults.debounce,
            min_loading: defaults.min_loading,
        }
    }

    pub fn home_timings(&self) -> HomeTimings {
        HomeTimings {
            debounce: self.search_debounce,
            min_loading: self.min_loading,
        }
    }
}

fn millis_from_env(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}
