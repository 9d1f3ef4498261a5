//! Relationship extraction through the language model

use crate::OpenAiClient;
use graphrag_qa_core::{parse_triples, FallbackContent, TripleParse};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

const EXTRACTION_INSTRUCTIONS: &str = "Extract entities and relationships.\nFormat strictly:\n(Entity1)-[RELATION]->(Entity2)";

/// Turns free text into `(Subject)-[RELATION]->(Object)` lines
#[derive(Clone)]
pub struct GraphExtractor {
    llm: Option<OpenAiClient>,
    fallback: Arc<FallbackContent>,
}

impl GraphExtractor {
    pub fn new(llm: Option<OpenAiClient>, fallback: Arc<FallbackContent>) -> Self {
        Self { llm, fallback }
    }

    /// Raw model output for `text`, or the fallback extraction line
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn extract(&self, text: &str) -> String {
        let Some(llm) = &self.llm else {
            warn!("No model configured, using fallback extraction");
            return self.fallback.extraction.clone();
        };

        match llm.complete(&extraction_prompt(text)).await {
            Ok(output) => {
                debug!("Extraction returned {} chars", output.len());
                output
            }
            Err(e) => {
                warn!("Extraction failed, using fallback: {}", e);
                self.fallback.extraction.clone()
            }
        }
    }

    /// Extract and parse; malformed lines are reported, not fatal
    pub async fn extract_triples(&self, text: &str) -> TripleParse {
        let output = self.extract(text).await;
        let parse = parse_triples(&output);

        for skipped in &parse.skipped {
            debug!(
                "Skipped line {} '{}': {}",
                skipped.line_number, skipped.line, skipped.reason
            );
        }

        parse
    }
}

fn extraction_prompt(text: &str) -> String {
    format!("{}\n\nText:\n{}", EXTRACTION_INSTRUCTIONS, text)
}
