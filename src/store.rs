use crate::params::{GenerationParameters, ParameterUpdate};
use std::sync::Mutex;

/// Process-wide generation/retrieval parameter store.
///
/// A single instance is shared by every client; there is no per-session
/// isolation. Each mutation replaces the whole value under the lock, so
/// readers never observe a partially updated set.
#[derive(Debug)]
pub struct ParameterStore {
    current: Mutex<GenerationParameters>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(GenerationParameters::default()),
        }
    }

    /// Current parameter set, unchanged.
    pub fn get(&self) -> GenerationParameters {
        *self.current.lock().unwrap()
    }

    /// Merge a partial update over the current set and swap it in atomically.
    /// Returns the new set.
    pub fn update(&self, update: ParameterUpdate) -> GenerationParameters {
        let mut current = self.current.lock().unwrap();
        *current = current.merged(update);
        *current
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide set of knowledge-base ids selected for retrieval.
///
/// Ids are positional (see `catalog`) and deliberately unvalidated against the
/// engine's catalog: a stale id just retrieves nothing, which is cheaper than
/// coordinating every selection with catalog mutations.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: Mutex<Vec<usize>>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Vec<usize> {
        self.selected.lock().unwrap().clone()
    }

    /// Replace the selection wholesale with whatever list was supplied.
    pub fn set(&self, ids: Vec<usize>) {
        *self.selected.lock().unwrap() = ids;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_store_starts_with_defaults() {
        let store = ParameterStore::new();
        assert_eq!(store.get(), GenerationParameters::default());
    }

    #[test]
    fn test_parameter_update_merges_over_previous() {
        let store = ParameterStore::new();
        store.update(ParameterUpdate {
            n_predict: Some(100),
            ..Default::default()
        });
        let after = store.update(ParameterUpdate {
            temperature: Some(1.5),
            ..Default::default()
        });
        // First update survives the second
        assert_eq!(after.n_predict, 100);
        assert_eq!(after.temperature, 1.5);
        assert_eq!(store.get(), after);
    }

    #[test]
    fn test_selection_starts_empty() {
        assert!(SelectionStore::new().get().is_empty());
    }

    #[test]
    fn test_selection_replaced_not_unioned() {
        let store = SelectionStore::new();
        store.set(vec![0, 1, 2]);
        store.set(vec![4]);
        assert_eq!(store.get(), vec![4]);
    }

    #[test]
    fn test_selection_accepts_stale_ids() {
        let store = SelectionStore::new();
        store.set(vec![99, 99, 7]);
        assert_eq!(store.get(), vec![99, 99, 7]);
    }
}
