//! Process configuration read from the environment

use graphrag_qa_agents::{LlmConfig, VectorIndexConfig, DEFAULT_SOURCE_DOC};
use graphrag_qa_core::{FallbackContent, TextSplitter};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_VECTOR_DB: &str = "vectordb";
const DEFAULT_GRAPH_DB: &str = "graphdb";

/// `GRAPH_DB_PATH` value that disables the graph store
const GRAPH_DB_DISABLED: &str = "off";

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, value);
            default
        }),
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub index: VectorIndexConfig,
    pub vector_db_path: PathBuf,
    /// `None` runs the graph store disconnected
    pub graph_db_path: Option<PathBuf>,
    pub fallback_file: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Use in-memory databases instead of the RocksDB directories
    pub memory: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            index: VectorIndexConfig::default(),
            vector_db_path: PathBuf::from(DEFAULT_VECTOR_DB),
            graph_db_path: Some(PathBuf::from(DEFAULT_GRAPH_DB)),
            fallback_file: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            memory: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = TextSplitter::default();
        let splitter = TextSplitter::new(
            env_parse("GRAPHRAG_CHUNK_SIZE", defaults.chunk_size()),
            env_parse("GRAPHRAG_CHUNK_OVERLAP", defaults.chunk_overlap()),
        );

        let graph_db = env_or_default("GRAPH_DB_PATH", DEFAULT_GRAPH_DB);
        let graph_db_path = if graph_db.trim().eq_ignore_ascii_case(GRAPH_DB_DISABLED) {
            None
        } else {
            Some(PathBuf::from(graph_db))
        };

        Self {
            llm: LlmConfig::from_env(),
            index: VectorIndexConfig {
                source_doc: PathBuf::from(env_or_default("GRAPHRAG_SOURCE_DOC", DEFAULT_SOURCE_DOC)),
                splitter,
            },
            vector_db_path: PathBuf::from(env_or_default("VECTOR_DB_PATH", DEFAULT_VECTOR_DB)),
            graph_db_path,
            fallback_file: std::env::var("GRAPHRAG_FALLBACK_FILE")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            host: env_or_default("GRAPHRAG_HOST", DEFAULT_HOST),
            port: env_parse("GRAPHRAG_PORT", DEFAULT_PORT),
            memory: false,
        }
    }

    /// Builder: use in-memory databases
    pub fn in_memory(mut self) -> Self {
        self.memory = true;
        self
    }

    /// Builder: run without a graph database
    pub fn without_graph(mut self) -> Self {
        self.graph_db_path = None;
        self
    }

    /// Fallback table, with the override file applied when one is set.
    ///
    /// An unreadable or invalid override is logged and the defaults are used.
    pub fn load_fallback(&self) -> FallbackContent {
        let Some(path) = &self.fallback_file else {
            return FallbackContent::default();
        };

        match FallbackContent::from_file(path) {
            Ok(content) => {
                info!("Loaded fallback content from {}", path.display());
                content
            }
            Err(e) => {
                warn!("Using default fallback content: {}", e);
                FallbackContent::default()
            }
        }
    }
}
