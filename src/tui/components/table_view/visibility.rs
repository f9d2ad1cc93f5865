//! Column visibility, persisted as JSON in the local store

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::storage::{LocalStorage, StorageError};

pub type VisibilityState = BTreeMap<String, bool>;

/// Visibility map for one table, keyed by column id
#[derive(Debug, Clone)]
pub struct ColumnVisibility {
    storage_key: String,
    state: VisibilityState,
    storage: Option<LocalStorage>,
}

fn seed(default_hidden: &[&str]) -> VisibilityState {
    default_hidden
        .iter()
        .map(|id| (id.to_string(), false))
        .collect()
}

impl ColumnVisibility {
    /// In-memory visibility with only the default-hidden seed
    pub fn seeded(storage_key: &str, default_hidden: &[&str]) -> Self {
        Self {
            storage_key: storage_key.to_string(),
            state: seed(default_hidden),
            storage: None,
        }
    }

    /// Load the stored map for `storage_key`, falling back to the seed when absent or unreadable
    pub async fn load(storage: LocalStorage, storage_key: &str, default_hidden: &[&str]) -> Self {
        let state = match storage.get_item(storage_key).await {
            Ok(Some(raw)) => match serde_json::from_str::<VisibilityState>(&raw) {
                Ok(state) => {
                    debug!("Loaded column visibility for '{}'", storage_key);
                    state
                }
                Err(e) => {
                    warn!(
                        "Ignoring malformed column visibility for '{}': {}",
                        storage_key, e
                    );
                    seed(default_hidden)
                }
            },
            Ok(None) => seed(default_hidden),
            Err(e) => {
                warn!("Could not read column visibility for '{}': {}", storage_key, e);
                seed(default_hidden)
            }
        };

        Self {
            storage_key: storage_key.to_string(),
            state,
            storage: Some(storage),
        }
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    /// Columns missing from the map are visible
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.state.get(column_id).copied().unwrap_or(true)
    }

    pub fn set_visible(&mut self, column_id: &str, visible: bool) {
        self.state.insert(column_id.to_string(), visible);
    }

    /// Flip a column and return its new visibility
    pub fn toggle(&mut self, column_id: &str) -> bool {
        let visible = !self.is_visible(column_id);
        self.set_visible(column_id, visible);
        visible
    }

    /// Write the current map under the storage key
    pub async fn save(&self) -> Result<(), StorageError> {
        match &self.storage {
            Some(storage) => storage.set_json(&self.storage_key, &self.state).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_defaults_hidden_until_stored() {
        let storage = LocalStorage::in_memory().await.unwrap();
        let visibility = ColumnVisibility::load(storage, "logs-table", &["cost"]).await;
        assert!(!visibility.is_visible("cost"));
        assert!(visibility.is_visible("status"));
    }

    #[tokio::test]
    async fn test_round_trip_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.db");

        {
            let storage = LocalStorage::open(&path).await.unwrap();
            let mut visibility = ColumnVisibility::load(storage, "dashboard-table", &[]).await;
            assert!(!visibility.toggle("email"));
            visibility.save().await.unwrap();
        }

        let storage = LocalStorage::open(&path).await.unwrap();
        let raw = storage.get_item("dashboard-table").await.unwrap().unwrap();
        assert_eq!(raw, r#"{"email":false}"#);

        let visibility = ColumnVisibility::load(storage, "dashboard-table", &["role"]).await;
        assert!(!visibility.is_visible("email"));
        // A stored map replaces the seed entirely
        assert!(visibility.is_visible("role"));
    }

    #[tokio::test]
    async fn test_malformed_value_falls_back_to_seed() {
        let storage = LocalStorage::in_memory().await.unwrap();
        storage.set_item("logs-table", "{oops").await.unwrap();

        let visibility = ColumnVisibility::load(storage, "logs-table", &["source"]).await;
        assert_eq!(visibility.state(), &seed(&["source"]));
    }

    #[tokio::test]
    async fn test_seeded_save_is_noop() {
        let mut visibility = ColumnVisibility::seeded("t", &[]);
        visibility.toggle("a");
        visibility.save().await.unwrap();
        assert!(!visibility.is_visible("a"));
    }
}
