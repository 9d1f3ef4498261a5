//! Repository for the entity graph: entities joined by typed `rel` edges

use crate::{DbConnection, DbError, Result};
use graphrag_qa_core::Triple;
use surrealdb_types::{RecordId, SurrealValue};
use tracing::{debug, instrument};

/// Repository for triple storage and neighbor lookup
#[derive(Clone)]
pub struct GraphRepository {
    db: DbConnection,
}

impl GraphRepository {
    /// Create a new repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a triple, reusing existing entities and edges.
    ///
    /// Returns `true` when a new edge was created, `false` when the triple
    /// was already present.
    #[instrument(skip(self, triple), fields(triple = %triple))]
    pub async fn store_triple(&self, triple: &Triple) -> Result<bool> {
        let from = self.upsert_entity(triple.subject()).await?;
        let to = self.upsert_entity(triple.object()).await?;

        let existing: Vec<RecordId> = self
            .db
            .query("SELECT VALUE id FROM rel WHERE in = $from AND out = $to AND relation = $relation")
            .bind(("from", from.clone()))
            .bind(("to", to.clone()))
            .bind(("relation", triple.relation().to_string()))
            .await?
            .take(0)?;

        if !existing.is_empty() {
            debug!("Edge already present");
            return Ok(false);
        }

        self.db
            .query("RELATE $from->rel->$to SET relation = $relation, created_at = time::now()")
            .bind(("from", from))
            .bind(("to", to))
            .bind(("relation", triple.relation().to_string()))
            .await?
            .check()?;

        Ok(true)
    }

    /// Insert an entity by name or return the existing one
    #[instrument(skip(self))]
    pub async fn upsert_entity(&self, name: &str) -> Result<RecordId> {
        let result: Option<EntityRecord> = self
            .db
            .query(
                r#"
                INSERT INTO entity (name, created_at)
                VALUES ($name, time::now())
                ON DUPLICATE KEY UPDATE
                    name = $name
            "#,
            )
            .bind(("name", name.to_string()))
            .await?
            .take(0)?;

        result
            .map(|entity| entity.id)
            .ok_or_else(|| DbError::CreateFailed("entity".into()))
    }

    /// Triples whose subject name contains `name`, at most `limit` of them
    #[instrument(skip(self))]
    pub async fn search_triples(&self, name: &str, limit: usize) -> Result<Vec<Triple>> {
        let rows: Vec<TripleRow> = self
            .db
            .query(
                r#"
                SELECT
                    in.name AS subject,
                    relation,
                    out.name AS object
                FROM rel
                WHERE string::contains(in.name, $name)
                ORDER BY subject, relation, object
                LIMIT $limit
            "#,
            )
            .bind(("name", name.to_string()))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;

        debug!("Graph search matched {} edges", rows.len());

        rows.into_iter()
            .map(|row| Triple::new(row.subject, row.relation, row.object).map_err(DbError::from))
            .collect()
    }

    /// Entity and edge counts
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<GraphStats> {
        let stats: Option<GraphStats> = self
            .db
            .query(
                r#"
                RETURN {
                    entity_count: count(SELECT VALUE id FROM entity),
                    relation_count: count(SELECT VALUE id FROM rel)
                }
            "#,
            )
            .await?
            .take(0)?;

        stats.ok_or_else(|| DbError::QueryFailed("graph stats".into()))
    }
}

// ==========================================
// RESULT TYPES
// ==========================================

#[derive(Debug, SurrealValue)]
struct EntityRecord {
    id: RecordId,
}

#[derive(Debug, SurrealValue)]
struct TripleRow {
    subject: String,
    relation: String,
    object: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, SurrealValue)]
pub struct GraphStats {
    pub entity_count: i64,
    pub relation_count: i64,
}
