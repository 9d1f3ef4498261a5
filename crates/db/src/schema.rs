//! SurrealDB schema definitions

use crate::{DbConnection, DbError, Result, StoreKind};
use tracing::info;

/// Initialize the schema for one store
pub async fn initialize_schema(db: &DbConnection, kind: StoreKind) -> Result<()> {
    info!("Initializing {:?} schema...", kind);

    let definition = match kind {
        StoreKind::Graph => GRAPH_SCHEMA,
        StoreKind::Vectors => VECTOR_SCHEMA,
    };

    db.query(definition)
        .await?
        .check()
        .map_err(|e| DbError::SchemaInit(e.to_string()))?;

    info!("Schema initialized successfully");
    Ok(())
}

const GRAPH_SCHEMA: &str = r#"
-- Entities are unique by name
DEFINE TABLE IF NOT EXISTS entity SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS name ON entity TYPE string ASSERT string::len($value) > 0;
DEFINE FIELD IF NOT EXISTS created_at ON entity TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_entity_name ON entity FIELDS name UNIQUE;

-- Typed edges between entities, one per (in, out, relation)
DEFINE TABLE IF NOT EXISTS rel TYPE RELATION IN entity OUT entity SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS relation ON rel TYPE string;
DEFINE FIELD IF NOT EXISTS created_at ON rel TYPE datetime DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_rel_unique ON rel FIELDS in, out, relation UNIQUE;
"#;

const VECTOR_SCHEMA: &str = r#"
-- Document chunks with their embeddings
DEFINE TABLE IF NOT EXISTS chunk SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS text ON chunk TYPE string;
DEFINE FIELD IF NOT EXISTS source ON chunk TYPE string;
DEFINE FIELD IF NOT EXISTS position ON chunk TYPE int;
DEFINE FIELD IF NOT EXISTS char_offset ON chunk TYPE int;
DEFINE FIELD IF NOT EXISTS embedding ON chunk TYPE array<float>;
DEFINE FIELD IF NOT EXISTS created_at ON chunk TYPE datetime DEFAULT time::now();

DEFINE INDEX IF NOT EXISTS idx_chunk_source ON chunk FIELDS source;
"#;

#[cfg(test)]
mod tests {
    use crate::{init_memory, DbConnection, StoreKind};

    async fn count(db: &DbConnection, table: &str) -> i64 {
        let count: Option<i64> = db
            .query(format!("RETURN count(SELECT VALUE id FROM {})", table))
            .await
            .unwrap()
            .take(0)
            .unwrap();
        count.unwrap_or(0)
    }

    #[tokio::test]
    async fn test_schema_initialization() {
        let db = init_memory(StoreKind::Graph).await.expect("Failed to init db");

        assert_eq!(count(&db, "entity").await, 0);
        assert_eq!(count(&db, "rel").await, 0);
    }

    #[tokio::test]
    async fn test_rel_is_a_relation_table() {
        let db = init_memory(StoreKind::Graph).await.expect("Failed to init db");

        db.query(
            r#"
            CREATE entity:a SET name = 'A';
            CREATE entity:b SET name = 'B';
            RELATE entity:a->rel->entity:b SET relation = 'REL';
        "#,
        )
        .await
        .unwrap()
        .check()
        .expect("RELATE between entities should succeed");

        assert_eq!(count(&db, "rel").await, 1);
    }

    #[tokio::test]
    async fn test_rel_only_joins_entities() {
        let db = init_memory(StoreKind::Graph).await.expect("Failed to init db");

        let result = db
            .query(
                r#"
                CREATE entity:b SET name = 'B';
                CREATE other:x;
                RELATE other:x->rel->entity:b SET relation = 'REL';
            "#,
            )
            .await
            .unwrap()
            .check();

        assert!(result.is_err());
        assert_eq!(count(&db, "rel").await, 0);
    }

    #[tokio::test]
    async fn test_vector_schema_initialization() {
        let db = init_memory(StoreKind::Vectors).await.expect("Failed to init db");

        assert_eq!(count(&db, "chunk").await, 0);
    }
}
