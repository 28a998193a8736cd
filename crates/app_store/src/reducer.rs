//! Store actions, side-effect intents, and the transition function.

use serde_json::Value;

use crate::model::{AppState, DataBag, Theme};

#[derive(Debug, Clone, PartialEq)]
/// Mutations accepted by [`reduce_app_state`].
pub enum StoreAction {
    /// Replace the theme.
    SetTheme(Theme),
    /// Set the loading flag.
    SetIsLoading(bool),
    /// Replace the error slot (`None` clears it).
    SetError(Option<String>),
    /// Clear the error slot.
    ClearError,
    /// Insert or replace one data entry; other keys are untouched.
    SetData {
        /// Entry key.
        key: String,
        /// Entry value.
        value: Value,
    },
    /// Remove every data entry.
    ClearData,
}

impl StoreAction {
    /// Returns `true` for actions that touch the persisted subset (`theme` or `data`).
    pub fn touches_persisted(&self) -> bool {
        matches!(
            self,
            Self::SetTheme(_) | Self::SetData { .. } | Self::ClearData
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Side effects requested by a transition.
pub enum StoreEffect {
    /// The persisted subset changed and must be written.
    PersistSnapshot,
}

/// Applies `action` to `state` and collects resulting side effects.
///
/// Actions that leave the state unchanged produce no effects.
pub fn reduce_app_state(state: &mut AppState, action: StoreAction) -> Vec<StoreEffect> {
    let mut effects = Vec::new();
    match action {
        StoreAction::SetTheme(theme) => {
            if state.theme != theme {
                state.theme = theme;
                effects.push(StoreEffect::PersistSnapshot);
            }
        }
        StoreAction::SetIsLoading(is_loading) => state.is_loading = is_loading,
        StoreAction::SetError(error) => state.error = error,
        StoreAction::ClearError => state.error = None,
        StoreAction::SetData { key, value } => {
            if state.data.get(&key) != Some(&value) {
                state.data.insert(key, value);
                effects.push(StoreEffect::PersistSnapshot);
            }
        }
        StoreAction::ClearData => {
            if !state.data.is_empty() {
                state.data = DataBag::new();
                effects.push(StoreEffect::PersistSnapshot);
            }
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn set_data(key: &str, value: Value) -> StoreAction {
        StoreAction::SetData {
            key: key.to_string(),
            value,
        }
    }

    #[test]
    fn set_data_merges_into_existing_bag() {
        let mut state = AppState::default();
        reduce_app_state(&mut state, set_data("a", json!(1)));
        reduce_app_state(&mut state, set_data("b", json!(2)));
        assert_eq!(
            state.data,
            DataBag::from([("a".to_string(), json!(1)), ("b".to_string(), json!(2))])
        );

        reduce_app_state(&mut state, set_data("a", json!(3)));
        assert_eq!(
            state.data,
            DataBag::from([("a".to_string(), json!(3)), ("b".to_string(), json!(2))])
        );
    }

    #[test]
    fn persisted_changes_request_a_snapshot_write() {
        let mut state = AppState::default();
        assert_eq!(
            reduce_app_state(&mut state, StoreAction::SetTheme(Theme::Dark)),
            vec![StoreEffect::PersistSnapshot]
        );
        assert_eq!(
            reduce_app_state(&mut state, set_data("k", json!("v"))),
            vec![StoreEffect::PersistSnapshot]
        );
        assert_eq!(
            reduce_app_state(&mut state, StoreAction::ClearData),
            vec![StoreEffect::PersistSnapshot]
        );
        assert!(state.data.is_empty());
    }

    #[test]
    fn transient_changes_never_request_a_write() {
        let mut state = AppState::default();
        assert!(reduce_app_state(&mut state, StoreAction::SetIsLoading(true)).is_empty());
        assert!(
            reduce_app_state(&mut state, StoreAction::SetError(Some("e".to_string()))).is_empty()
        );
        assert_eq!(state.error.as_deref(), Some("e"));
        assert!(reduce_app_state(&mut state, StoreAction::ClearError).is_empty());
        assert_eq!(state.error, None);
        assert!(state.is_loading);
    }

    #[test]
    fn unchanged_persisted_values_produce_no_effects() {
        let mut state = AppState::default();
        assert!(reduce_app_state(&mut state, StoreAction::SetTheme(Theme::System)).is_empty());
        assert!(reduce_app_state(&mut state, StoreAction::ClearData).is_empty());

        reduce_app_state(&mut state, set_data("a", json!(1)));
        assert!(reduce_app_state(&mut state, set_data("a", json!(1))).is_empty());
    }

    #[test]
    fn touches_persisted_classifies_actions() {
        assert!(StoreAction::SetTheme(Theme::Light).touches_persisted());
        assert!(set_data("a", json!(null)).touches_persisted());
        assert!(StoreAction::ClearData.touches_persisted());
        assert!(!StoreAction::SetIsLoading(false).touches_persisted());
        assert!(!StoreAction::SetError(None).touches_persisted());
        assert!(!StoreAction::ClearError.touches_persisted());
    }
}
