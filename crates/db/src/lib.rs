//! Database layer for GraphRAG QA
//!
//! Provides SurrealDB integration for the two stores the service keeps:
//! the entity graph and the chunk embedding index.

pub mod chunks;
pub mod error;
pub mod graph;
pub mod schema;

pub use chunks::{ChunkRepository, ScoredChunk};
pub use error::{DbError, Result};
pub use graph::{GraphRepository, GraphStats};

use std::path::Path;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

/// Database connection type
pub type DbConnection = Surreal<Db>;

/// Which store a connection backs; selects the database name and schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Graph,
    Vectors,
}

impl StoreKind {
    fn database(&self) -> &'static str {
        match self {
            StoreKind::Graph => "graph",
            StoreKind::Vectors => "vectors",
        }
    }
}

/// Initialize database with RocksDB (persistent)
pub async fn init_persistent(path: impl AsRef<Path>, kind: StoreKind) -> Result<DbConnection> {
    let path = path.as_ref();

    // Ensure the parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            DbError::Connection(format!("cannot create {}: {}", parent.display(), e))
        })?;
    }

    let db = Surreal::new::<RocksDb>(path).await?;
    setup_database(&db, kind).await?;
    Ok(db)
}

/// Initialize database in-memory (for testing)
pub async fn init_memory(kind: StoreKind) -> Result<DbConnection> {
    let db = Surreal::new::<Mem>(()).await?;
    setup_database(&db, kind).await?;
    Ok(db)
}

/// Setup database namespace, database, and schema
async fn setup_database(db: &DbConnection, kind: StoreKind) -> Result<()> {
    db.use_ns("graphrag").use_db(kind.database()).await?;
    schema::initialize_schema(db, kind).await?;
    Ok(())
}
