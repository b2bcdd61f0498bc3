//! Store Configuration
//!
//! Which backend holds the pantry collection, persisted as JSON in the app
//! config dir and overridable through `PANTRY_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::{DomainError, DomainResult};

pub const CONFIG_FILE_NAME: &str = "pantry_config.json";
pub const DEFAULT_COLLECTION: &str = "pantry";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const REDACTED: &str = "********";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local SQLite file in the app data dir
    #[default]
    Sqlite,
    /// Hosted Firestore collection over REST
    Firestore,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Some(StoreBackend::Sqlite),
            "firestore" => Some(StoreBackend::Firestore),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    "(default)".to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub firestore: Option<FirestoreConfig>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            collection: default_collection(),
            firestore: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load(path: &Path) -> DomainResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Internal(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| DomainError::InvalidInput(format!("Malformed {}: {}", path.display(), e)))
    }

    pub fn save(&self, path: &Path) -> DomainResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DomainError::Internal(e.to_string()))?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|e| DomainError::Internal(e.to_string()))?;
        std::fs::write(path, text)
            .map_err(|e| DomainError::Internal(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Apply `PANTRY_*` overrides from the given lookup (normally `std::env::var`)
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup("PANTRY_BACKEND").and_then(|b| StoreBackend::from_str(&b)) {
            self.backend = backend;
        }
        if let Some(collection) = lookup("PANTRY_COLLECTION").filter(|c| !c.is_empty()) {
            self.collection = collection;
        }
        let project = lookup("PANTRY_FIRESTORE_PROJECT");
        let api_key = lookup("PANTRY_FIRESTORE_API_KEY");
        if project.is_some() || api_key.is_some() {
            let mut fs = self.firestore.take().unwrap_or(FirestoreConfig {
                project_id: String::new(),
                api_key: String::new(),
                database: default_database(),
            });
            if let Some(p) = project {
                fs.project_id = p;
            }
            if let Some(k) = api_key {
                fs.api_key = k;
            }
            self.firestore = Some(fs);
        }
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.collection.trim().is_empty() || self.collection.contains('/') {
            return Err(DomainError::InvalidInput(format!("invalid collection name '{}'", self.collection)));
        }
        if self.request_timeout_secs == 0 {
            return Err(DomainError::InvalidInput("request timeout must be at least 1 second".into()));
        }
        if self.backend == StoreBackend::Firestore {
            match &self.firestore {
                Some(fs) if !fs.project_id.trim().is_empty() && !fs.api_key.trim().is_empty() => {
                    if fs.database.trim().is_empty() || fs.database.contains('/') {
                        return Err(DomainError::InvalidInput(format!(
                            "invalid firestore database '{}', use (default) for the default database",
                            fs.database
                        )));
                    }
                }
                _ => {
                    return Err(DomainError::InvalidInput(
                        "firestore backend needs a project id and an api key".into(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Copy safe to hand to the frontend
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if let Some(fs) = copy.firestore.as_mut() {
            if !fs.api_key.is_empty() {
                fs.api_key = REDACTED.to_string();
            }
        }
        copy
    }

    /// Keep the stored key when the frontend echoes back the redacted placeholder
    pub fn merge_secret(mut self, previous: &StoreConfig) -> Self {
        if let (Some(fs), Some(prev)) = (self.firestore.as_mut(), previous.firestore.as_ref()) {
            if fs.api_key == REDACTED {
                fs.api_key = prev.api_key.clone();
            }
        }
        self
    }
}

/// Path of the config file inside `config_dir`
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn firestore_config() -> StoreConfig {
        StoreConfig {
            backend: StoreBackend::Firestore,
            firestore: Some(FirestoreConfig {
                project_id: "pantry-tracker".into(),
                api_key: "AIza-secret".into(),
                database: default_database(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::load(&config_path(dir.path())).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert_eq!(config.collection, "pantry");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        let config = firestore_config();
        config.save(&path).unwrap();
        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        std::fs::write(&path, r#"{ "backend": "sqlite" }"#).unwrap();
        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.collection, "pantry");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_path(dir.path());
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(StoreConfig::load(&path), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PANTRY_BACKEND", "Firestore"),
            ("PANTRY_COLLECTION", "larder"),
            ("PANTRY_FIRESTORE_PROJECT", "proj"),
            ("PANTRY_FIRESTORE_API_KEY", "key"),
        ]
        .into_iter()
        .collect();
        let config = StoreConfig::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.backend, StoreBackend::Firestore);
        assert_eq!(config.collection, "larder");
        let fs = config.firestore.as_ref().unwrap();
        assert_eq!(fs.project_id, "proj");
        assert_eq!(fs.database, "(default)");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(StoreConfig::default().validate().is_ok());

        let mut config = firestore_config();
        config.firestore.as_mut().unwrap().api_key.clear();
        assert!(config.validate().is_err());

        let config = StoreConfig { collection: "a/b".into(), ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_firestore_database_must_be_named() {
        assert!(firestore_config().validate().is_ok());
        for bad in ["", "  ", "a/b"] {
            let mut config = firestore_config();
            config.firestore.as_mut().unwrap().database = bad.into();
            assert!(matches!(config.validate(), Err(DomainError::InvalidInput(_))), "database {:?}", bad);
        }
    }

    #[test]
    fn test_redaction_and_merge() {
        let config = firestore_config();
        let redacted = config.redacted();
        assert_eq!(redacted.firestore.as_ref().unwrap().api_key, REDACTED);

        let merged = redacted.merge_secret(&config);
        assert_eq!(merged, config);
    }
}
