//! Entity graph store with a disconnected fallback mode

use graphrag_qa_core::{FallbackContent, Triple};
use graphrag_qa_db::{GraphRepository, GraphStats};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Maximum number of triples returned by a single search
pub const GRAPH_SEARCH_LIMIT: usize = 20;

/// Graph of entities joined by typed relations.
///
/// Built once at startup. When the backing database could not be opened the
/// store runs disconnected: writes are dropped and searches return the
/// fallback triples. Nothing here ever returns an error to the caller.
pub struct EntityGraphStore {
    repo: Option<GraphRepository>,
    fallback: Arc<FallbackContent>,
}

impl EntityGraphStore {
    pub fn connected(repo: GraphRepository, fallback: Arc<FallbackContent>) -> Self {
        Self {
            repo: Some(repo),
            fallback,
        }
    }

    pub fn disconnected(fallback: Arc<FallbackContent>) -> Self {
        Self {
            repo: None,
            fallback,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.repo.is_some()
    }

    /// Store `(subject)-[relation]->(object)`.
    ///
    /// Returns whether a new edge was written.
    pub async fn store_triple(&self, subject: &str, relation: &str, object: &str) -> bool {
        match Triple::new(subject, relation, object) {
            Ok(triple) => self.store(&triple).await,
            Err(e) => {
                warn!("Ignoring invalid triple ({}, {}, {}): {}", subject, relation, object, e);
                false
            }
        }
    }

    #[instrument(skip(self, triple), fields(triple = %triple))]
    pub async fn store(&self, triple: &Triple) -> bool {
        let Some(repo) = &self.repo else {
            warn!("Graph store disconnected, dropping triple");
            return false;
        };

        match repo.store_triple(triple).await {
            Ok(created) => created,
            Err(e) => {
                warn!("Failed to store triple: {}", e);
                false
            }
        }
    }

    /// Triples whose subject contains `name`, at most [`GRAPH_SEARCH_LIMIT`]
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Vec<Triple> {
        let Some(repo) = &self.repo else {
            warn!("Graph store disconnected, using fallback triples");
            return self.fallback.graph_triples.clone();
        };

        match repo.search_triples(name, GRAPH_SEARCH_LIMIT).await {
            Ok(triples) => {
                debug!("Found {} triples", triples.len());
                triples
            }
            Err(e) => {
                warn!("Graph search failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Entity and relation counts; `None` when disconnected or on failure
    pub async fn stats(&self) -> Option<GraphStats> {
        let repo = self.repo.as_ref()?;
        match repo.stats().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!("Failed to read graph stats: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphrag_qa_db::{init_memory, StoreKind};

    async fn connected_store() -> EntityGraphStore {
        let db = init_memory(StoreKind::Graph).await.unwrap();
        EntityGraphStore::connected(GraphRepository::new(db), Arc::new(FallbackContent::default()))
    }

    #[tokio::test]
    async fn test_disconnected_search_returns_fallback() {
        let store = EntityGraphStore::disconnected(Arc::new(FallbackContent::default()));

        let triples = store.search("Anything").await;
        assert_eq!(triples, FallbackContent::default().graph_triples);
        assert!(!store.store_triple("A", "REL", "B").await);
        assert!(store.stats().await.is_none());
    }

    #[tokio::test]
    async fn test_store_twice_equals_store_once() {
        let store = connected_store().await;

        assert!(store.store_triple("A", "REL", "B").await);
        assert!(!store.store_triple("A", "REL", "B").await);

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.entity_count, 2);
        assert_eq!(stats.relation_count, 1);
        assert_eq!(store.search("A").await.len(), 1);
    }

    #[tokio::test]
    async fn test_connected_search_without_match_is_empty() {
        let store = connected_store().await;
        store.store_triple("GraphRAG", "USES", "Graph Database").await;

        assert!(store.search("Unrelated").await.is_empty());
        assert_eq!(store.search("Graph").await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_matches_everything() {
        let store = connected_store().await;
        store.store_triple("A", "REL", "B").await;
        store.store_triple("C", "REL", "D").await;

        assert_eq!(store.search("").await.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_triple_is_ignored() {
        let store = connected_store().await;

        assert!(!store.store_triple("", "REL", "B").await);
        assert_eq!(store.stats().await.unwrap(), GraphStats::default());
    }
}
