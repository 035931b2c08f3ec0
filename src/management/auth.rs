use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::{types::Credential, warning};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid credential file: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("no credential to persist")]
    Empty,
}

/// Owns the current credential and its file on disk.
///
/// Public operations never fail loudly: a missing or broken file is a normal
/// "no prior session" outcome, and a failed write only means the session will
/// not be remembered.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    credential: Option<Credential>,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            credential: None,
        }
    }

    pub fn with_credential(path: impl Into<PathBuf>, credential: Credential) -> Self {
        Self {
            path: path.into(),
            credential: Some(credential),
        }
    }

    /// Reads the persisted credential, replacing the in-memory one on success.
    pub async fn load(&mut self) -> bool {
        match self.read().await {
            Ok(credential) => {
                self.credential = Some(credential);
                true
            }
            Err(StoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => {
                warning!("Cannot load stored credential {}: {}", self.path.display(), e);
                false
            }
        }
    }

    /// Writes the credential to a sibling temp file and renames it over the
    /// previous one.
    pub async fn save(&self) -> bool {
        match self.write().await {
            Ok(()) => true,
            Err(e) => {
                warning!("Cannot save credential to {}: {}", self.path.display(), e);
                false
            }
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp_millis())
    }

    /// A store without a credential is always expired.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.credential
            .as_ref()
            .is_none_or(|c| c.is_expired_at(now_ms))
    }

    /// Replaces the credential and persists it. The in-memory value is
    /// replaced even when saving fails.
    pub async fn update(&mut self, credential: Credential) -> bool {
        self.credential = Some(credential);
        self.save().await
    }

    pub fn current(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Credential, StoreError> {
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self) -> Result<(), StoreError> {
        let credential = self.credential.as_ref().ok_or(StoreError::Empty)?;
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        let tmp = self.temp_path();
        async_fs::write(&tmp, json).await?;
        if let Err(e) = async_fs::rename(&tmp, &self.path).await {
            let _ = async_fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
