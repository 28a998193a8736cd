//! In-memory application state and its persisted subset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Storage key holding the persisted snapshot.
pub const APP_STORAGE_KEY: &str = "app-storage";
/// Schema version written into every persisted snapshot.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Color scheme preference.
pub enum Theme {
    /// Light scheme.
    Light,
    /// Dark scheme.
    Dark,
    /// Follow the platform setting.
    #[default]
    System,
}

impl Theme {
    /// Returns the wire token for the theme.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

/// Arbitrary JSON values keyed by string.
pub type DataBag = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// The single in-memory source of truth.
pub struct AppState {
    /// Color scheme preference (persisted).
    pub theme: Theme,
    /// Transient loading flag.
    pub is_loading: bool,
    /// Transient error slot; `None` means no active error.
    pub error: Option<String>,
    /// Generic keyed data (persisted).
    pub data: DataBag,
}

impl AppState {
    /// Extracts the persisted subset.
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            version: SNAPSHOT_SCHEMA_VERSION,
            theme: self.theme,
            data: self.data.clone(),
        }
    }

    /// Overwrites the persisted subset, leaving transient fields untouched.
    pub fn apply_snapshot(&mut self, snapshot: PersistedSnapshot) {
        self.theme = snapshot.theme;
        self.data = snapshot.data;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Lifecycle of an [`crate::AppStore`].
pub enum StorePhase {
    /// Constructed; the persistence worker has not started.
    #[default]
    Uninitialized,
    /// The persisted snapshot is being loaded.
    Hydrating,
    /// Hydration finished; mutations are persisted as they commit.
    Ready,
}

fn current_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Durable `{ theme, data }` subset as stored under [`APP_STORAGE_KEY`].
///
/// Missing fields fall back to defaults so partial snapshots merge over the initial state.
pub struct PersistedSnapshot {
    /// Snapshot schema version.
    #[serde(default = "current_schema_version")]
    pub version: u32,
    /// Persisted theme.
    #[serde(default)]
    pub theme: Theme,
    /// Persisted data bag.
    #[serde(default)]
    pub data: DataBag,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        AppState::default().snapshot()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Reasons a stored snapshot is rejected during hydration.
pub enum SnapshotError {
    /// The stored JSON is not an object.
    #[error("snapshot is not a JSON object")]
    NotAnObject,
    /// The snapshot was written by a newer schema.
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
    /// A field has the wrong shape.
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

impl PersistedSnapshot {
    /// Validates and decodes a stored JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for non-objects, newer schema versions, or mistyped fields.
    pub fn from_value(value: Value) -> Result<Self, SnapshotError> {
        if !value.is_object() {
            return Err(SnapshotError::NotAnObject);
        }
        let snapshot: Self =
            serde_json::from_value(value).map_err(|e| SnapshotError::Invalid(e.to_string()))?;
        if snapshot.version > SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_match_initial_state() {
        let state = AppState::default();
        assert_eq!(state.theme, Theme::System);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert!(state.data.is_empty());
    }

    #[test]
    fn snapshot_serializes_only_the_persisted_subset() {
        let state = AppState {
            theme: Theme::Dark,
            is_loading: true,
            error: Some("boom".to_string()),
            data: DataBag::from([("a".to_string(), json!(1))]),
        };

        let value = serde_json::to_value(state.snapshot()).expect("serialize snapshot");
        assert_eq!(
            value,
            json!({"version": SNAPSHOT_SCHEMA_VERSION, "theme": "dark", "data": {"a": 1}})
        );
    }

    #[test]
    fn partial_snapshot_merges_over_defaults() {
        let snapshot = PersistedSnapshot::from_value(json!({"theme": "light"})).expect("decode");
        assert_eq!(snapshot.theme, Theme::Light);
        assert!(snapshot.data.is_empty());

        let snapshot = PersistedSnapshot::from_value(json!({"data": {"k": [1, 2]}})).expect("decode");
        assert_eq!(snapshot.theme, Theme::System);
        assert_eq!(snapshot.data.get("k"), Some(&json!([1, 2])));
    }

    #[test]
    fn malformed_snapshots_are_rejected() {
        assert_eq!(
            PersistedSnapshot::from_value(json!("dark")),
            Err(SnapshotError::NotAnObject)
        );
        assert!(matches!(
            PersistedSnapshot::from_value(json!({"theme": "purple"})),
            Err(SnapshotError::Invalid(_))
        ));
        assert!(matches!(
            PersistedSnapshot::from_value(json!({"data": [1]})),
            Err(SnapshotError::Invalid(_))
        ));
        assert_eq!(
            PersistedSnapshot::from_value(json!({"version": SNAPSHOT_SCHEMA_VERSION + 1})),
            Err(SnapshotError::UnsupportedVersion(SNAPSHOT_SCHEMA_VERSION + 1))
        );
    }

    #[test]
    fn apply_snapshot_keeps_transient_fields() {
        let mut state = AppState {
            is_loading: true,
            error: Some("still here".to_string()),
            ..AppState::default()
        };
        state.apply_snapshot(PersistedSnapshot {
            version: SNAPSHOT_SCHEMA_VERSION,
            theme: Theme::Dark,
            data: DataBag::from([("x".to_string(), json!(true))]),
        });

        assert_eq!(state.theme, Theme::Dark);
        assert!(state.is_loading);
        assert_eq!(state.error.as_deref(), Some("still here"));
        assert_eq!(state.data.get("x"), Some(&json!(true)));
    }
}
