//! Profile and onboarding preferences.
//!
//! Stored as a small JSON document next to the database. The service is
//! constructed once, handed to whoever needs it, and persists every change.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, watch};
use utoipa::ToSchema;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Profile {
    pub user_name: String,
    pub store_name: String,
    pub profile_image_path: Option<String>,
    #[schema(value_type = Vec<String>)]
    pub categories: BTreeSet<String>,
    pub first_run: bool,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            store_name: String::new(),
            profile_image_path: None,
            categories: BTreeSet::new(),
            first_run: true,
        }
    }
}

#[derive(Clone)]
pub struct SettingsService {
    path: PathBuf,
    state: Arc<watch::Sender<Profile>>,
    write_lock: Arc<Mutex<()>>,
}

impl SettingsService {
    /// Read preferences from `path`; a missing file yields the defaults.
    pub async fn load(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let profile = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Profile::default(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), "settings loaded");

        let (state, _) = watch::channel(profile);
        Ok(Self {
            path,
            state: Arc::new(state),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn profile(&self) -> Profile {
        self.state.borrow().clone()
    }

    /// Observe every change to the profile.
    pub fn subscribe(&self) -> watch::Receiver<Profile> {
        self.state.subscribe()
    }

    /// Write the current profile to disk through a temp file and rename.
    pub async fn save(&self) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let bytes = serde_json::to_vec_pretty(&*self.state.borrow())?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        let written = match tokio::fs::write(&tmp, bytes).await {
            Ok(()) => tokio::fs::rename(&tmp, &self.path).await,
            Err(err) => Err(err),
        };
        if let Err(err) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }

    /// Scratch file a save writes before renaming it over [`Self::path`].
    pub fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    pub async fn set_user_name(&self, name: impl Into<String>) -> AppResult<()> {
        let name = name.into();
        self.update(|p| p.user_name = name).await
    }

    pub async fn set_store_name(&self, name: impl Into<String>) -> AppResult<()> {
        let name = name.into();
        self.update(|p| p.store_name = name).await
    }

    pub async fn set_profile_image_path(&self, path: Option<String>) -> AppResult<()> {
        self.update(|p| p.profile_image_path = path).await
    }

    pub async fn set_first_run(&self, first_run: bool) -> AppResult<()> {
        self.update(|p| p.first_run = first_run).await
    }

    /// Blank names are ignored.
    pub async fn add_category(&self, category: &str) -> AppResult<()> {
        let trimmed = category.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let trimmed = trimmed.to_string();
        self.update(|p| {
            p.categories.insert(trimmed);
        })
        .await
    }

    pub async fn remove_category(&self, category: &str) -> AppResult<()> {
        self.update(|p| {
            p.categories.remove(category);
        })
        .await
    }

    /// Reset every preference to its default and persist.
    pub async fn clear(&self) -> AppResult<()> {
        self.update(|p| *p = Profile::default()).await
    }

    async fn update(&self, f: impl FnOnce(&mut Profile)) -> AppResult<()> {
        self.state.send_modify(f);
        self.save().await
    }
}
