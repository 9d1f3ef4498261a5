//! Repository for embedded document chunks

use crate::{DbConnection, DbError, Result};
use graphrag_qa_core::DocumentChunk;
use surrealdb_types::SurrealValue;
use tracing::{debug, instrument};

/// Repository for chunk embeddings and similarity search
#[derive(Clone)]
pub struct ChunkRepository {
    db: DbConnection,
}

impl ChunkRepository {
    /// Create a new repository
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a chunk together with its embedding
    #[instrument(skip(self, chunk, embedding), fields(source = %chunk.source, position = chunk.position))]
    pub async fn insert_chunk(&self, chunk: &DocumentChunk, embedding: Vec<f32>) -> Result<()> {
        self.db
            .query(
                r#"
                CREATE chunk SET
                    text = $text,
                    source = $source,
                    position = $position,
                    char_offset = $char_offset,
                    embedding = $embedding
            "#,
            )
            .bind(("text", chunk.text.clone()))
            .bind(("source", chunk.source.clone()))
            .bind(("position", chunk.position as i64))
            .bind(("char_offset", chunk.offset as i64))
            .bind(("embedding", widen(embedding)))
            .await?
            .check()?;

        Ok(())
    }

    /// Replace every chunk of `source` with `chunks`.
    ///
    /// `chunks` and `embeddings` are paired by position.
    #[instrument(skip(self, chunks, embeddings), fields(count = chunks.len()))]
    pub async fn replace_source(
        &self,
        source: &str,
        chunks: &[DocumentChunk],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<usize> {
        if chunks.len() != embeddings.len() {
            return Err(DbError::CreateFailed(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        self.delete_source(source).await?;
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            self.insert_chunk(chunk, embedding).await?;
        }

        Ok(chunks.len())
    }

    /// Remove every chunk of `source`
    #[instrument(skip(self))]
    pub async fn delete_source(&self, source: &str) -> Result<()> {
        self.db
            .query("DELETE chunk WHERE source = $source")
            .bind(("source", source.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    /// Chunks ordered by decreasing cosine similarity to `embedding`
    #[instrument(skip(self, embedding))]
    pub async fn vector_search(&self, embedding: Vec<f32>, limit: usize) -> Result<Vec<ScoredChunk>> {
        let rows: Vec<ChunkRow> = self
            .db
            .query(
                r#"
                SELECT
                    text,
                    source,
                    position,
                    char_offset,
                    vector::similarity::cosine(embedding, $embedding) AS similarity
                FROM chunk
                ORDER BY similarity DESC
                LIMIT $limit
            "#,
            )
            .bind(("embedding", widen(embedding)))
            .bind(("limit", limit as i64))
            .await?
            .take(0)?;

        debug!("Vector search returned {} chunks", rows.len());

        Ok(rows.into_iter().map(ScoredChunk::from).collect())
    }

    /// Number of stored chunks from `source`
    #[instrument(skip(self))]
    pub async fn count_for_source(&self, source: &str) -> Result<usize> {
        let count: Option<i64> = self
            .db
            .query("RETURN count(SELECT VALUE id FROM chunk WHERE source = $source)")
            .bind(("source", source.to_string()))
            .await?
            .take(0)?;

        Ok(count.unwrap_or(0).max(0) as usize)
    }

    /// Total number of stored chunks
    #[instrument(skip(self))]
    pub async fn count(&self) -> Result<usize> {
        let count: Option<i64> = self
            .db
            .query("RETURN count(SELECT VALUE id FROM chunk)")
            .await?
            .take(0)?;

        Ok(count.unwrap_or(0).max(0) as usize)
    }
}

/// Embeddings are stored as SurrealDB floats
fn widen(embedding: Vec<f32>) -> Vec<f64> {
    embedding.into_iter().map(f64::from).collect()
}

// ==========================================
// RECORD TYPES
// ==========================================

#[derive(Debug, SurrealValue)]
struct ChunkRow {
    text: String,
    source: String,
    position: i64,
    char_offset: Option<i64>,
    similarity: Option<f64>,
}

/// A retrieved chunk and its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub similarity: f32,
}

impl From<ChunkRow> for ScoredChunk {
    fn from(row: ChunkRow) -> Self {
        let chunk = DocumentChunk::new(row.text, row.source, row.position.max(0) as usize)
            .with_offset(row.char_offset.unwrap_or(0).max(0) as usize);
        Self {
            chunk,
            similarity: row.similarity.unwrap_or(0.0) as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{init_memory, StoreKind};

    async fn repo() -> ChunkRepository {
        let db = init_memory(StoreKind::Vectors).await.unwrap();
        ChunkRepository::new(db)
    }

    #[tokio::test]
    async fn test_vector_search_orders_by_similarity() {
        let repo = repo().await;

        let chunks = [
            (DocumentChunk::new("about graphs", "doc.txt", 0), vec![1.0, 0.0, 0.0]),
            (DocumentChunk::new("about vectors", "doc.txt", 1), vec![0.0, 1.0, 0.0]),
            (DocumentChunk::new("about both", "doc.txt", 2), vec![0.7, 0.7, 0.0]),
        ];
        for (chunk, embedding) in &chunks {
            repo.insert_chunk(chunk, embedding.clone()).await.unwrap();
        }

        let results = repo.vector_search(vec![0.9, 0.1, 0.0], 3).await.unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();

        assert_eq!(texts, vec!["about graphs", "about both", "about vectors"]);
        assert!(results[0].similarity >= results[1].similarity);
        assert_eq!(results[0].chunk.source, "doc.txt");
    }

    #[tokio::test]
    async fn test_vector_search_limit() {
        let repo = repo().await;
        for i in 0..5 {
            let chunk = DocumentChunk::new(format!("chunk {}", i), "doc.txt", i);
            repo.insert_chunk(&chunk, vec![1.0, i as f32]).await.unwrap();
        }

        assert_eq!(repo.vector_search(vec![1.0, 0.0], 3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_counts() {
        let repo = repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.insert_chunk(&DocumentChunk::new("a", "one.txt", 0), vec![1.0]).await.unwrap();
        repo.insert_chunk(&DocumentChunk::new("b", "one.txt", 1), vec![1.0]).await.unwrap();
        repo.insert_chunk(&DocumentChunk::new("c", "two.txt", 0), vec![1.0]).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(repo.count_for_source("one.txt").await.unwrap(), 2);
        assert_eq!(repo.count_for_source("missing.txt").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_replace_source_does_not_duplicate() {
        let repo = repo().await;
        repo.insert_chunk(&DocumentChunk::new("other", "two.txt", 0), vec![1.0]).await.unwrap();

        let chunks = vec![
            DocumentChunk::new("first", "one.txt", 0),
            DocumentChunk::new("second", "one.txt", 1),
        ];
        for _ in 0..2 {
            let stored = repo
                .replace_source("one.txt", &chunks, vec![vec![1.0], vec![0.5]])
                .await
                .unwrap();
            assert_eq!(stored, 2);
        }

        assert_eq!(repo.count_for_source("one.txt").await.unwrap(), 2);
        assert_eq!(repo.count_for_source("two.txt").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_replace_source_checks_pairing() {
        let repo = repo().await;
        let chunks = vec![DocumentChunk::new("first", "one.txt", 0)];

        assert!(repo.replace_source("one.txt", &chunks, Vec::new()).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
