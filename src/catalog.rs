use crate::engine::RagEngine;
use crate::error::Result;
use serde::Serialize;

/// Listing view of one vector database known to the engine.
///
/// `id` is the zero-based position in the enumeration the engine just
/// returned. It is only stable within that single call: creating a database
/// may shift positions, so ids must never be cached across catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseEntry {
    pub id: usize,
    pub filename: String,
}

/// Enumerate the engine's databases in the order the engine reports them.
/// No caching; every call re-enumerates.
pub async fn list(engine: &dyn RagEngine) -> Result<Vec<DatabaseEntry>> {
    let handles = engine.list_databases().await?;
    Ok(handles
        .into_iter()
        .enumerate()
        .map(|(id, handle)| DatabaseEntry {
            id,
            filename: handle.filename,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::MockEngine;
    use crate::error::AfinaError;

    #[tokio::test]
    async fn test_ids_follow_enumeration_order() {
        let engine = MockEngine::with_databases(&["physics", "history", "recipes"]);
        let entries = list(&engine).await.unwrap();
        assert_eq!(
            entries,
            vec![
                DatabaseEntry { id: 0, filename: "physics".to_string() },
                DatabaseEntry { id: 1, filename: "history".to_string() },
                DatabaseEntry { id: 2, filename: "recipes".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_ids_shift_when_catalog_changes() {
        // Same name lands on a different id after the engine's order changes;
        // callers must re-enumerate instead of caching positions.
        let before = list(&MockEngine::with_databases(&["a", "b"])).await.unwrap();
        let after = list(&MockEngine::with_databases(&["new", "a", "b"])).await.unwrap();
        assert_eq!(before[0].filename, "a");
        assert_eq!(before[0].id, 0);
        assert_eq!(after[1].filename, "a");
        assert_eq!(after[1].id, 1);
    }

    #[tokio::test]
    async fn test_engine_failure_surfaces_verbatim() {
        let engine = MockEngine {
            fail_list: true,
            ..Default::default()
        };
        let err = list(&engine).await.unwrap_err();
        assert!(matches!(err, AfinaError::Engine(_)));
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let entries = list(&MockEngine::default()).await.unwrap();
        assert!(entries.is_empty());
    }
}
