//! Answers questions from combined text and graph context

use crate::{entity_hint, OpenAiClient, Result, RetrievalOrchestrator};
use graphrag_qa_core::{AnswerSource, CoreError, Exchange, FallbackContent, Triple};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct AnswerService {
    retrieval: Arc<RetrievalOrchestrator>,
    llm: Option<OpenAiClient>,
    fallback: Arc<FallbackContent>,
}

impl AnswerService {
    pub fn new(
        retrieval: Arc<RetrievalOrchestrator>,
        llm: Option<OpenAiClient>,
        fallback: Arc<FallbackContent>,
    ) -> Self {
        Self {
            retrieval,
            llm,
            fallback,
        }
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Answer one question.
    ///
    /// Fails only for an empty question; unavailable dependencies yield a
    /// mock answer marked by its [`AnswerSource`].
    #[instrument(skip(self))]
    pub async fn answer(&self, question: &str) -> Result<Exchange> {
        if question.trim().is_empty() {
            return Err(CoreError::EmptyQuestion.into());
        }

        let text_context = self.retrieval.retrieve_text_context(question).await;
        let graph_context = self
            .retrieval
            .retrieve_graph_context(entity_hint(question))
            .await;

        let mut exchange = Exchange {
            question: question.to_string(),
            text_context,
            graph_context,
            answer: String::new(),
            source: AnswerSource::Mock,
            error: None,
            note: None,
        };

        let Some(llm) = &self.llm else {
            exchange.answer = self.fallback.mock_answer_for(question);
            exchange.note = Some(self.fallback.mock_note.clone());
            return Ok(exchange);
        };

        let prompt = compose_prompt(question, &exchange.text_context, &exchange.graph_context);
        match llm.complete(&prompt).await {
            Ok(answer) => {
                info!("Answered with {} chars", answer.len());
                exchange.answer = answer;
                exchange.source = AnswerSource::Real;
            }
            Err(e) => {
                warn!("Completion failed, using mock answer: {}", e);
                exchange.answer = self.fallback.error_answer_for(question);
                exchange.source = AnswerSource::Error;
                exchange.error = Some(e.to_string());
            }
        }

        Ok(exchange)
    }
}

fn compose_prompt(question: &str, text_context: &str, graph_context: &[Triple]) -> String {
    let graph = graph_context
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Use both contexts to answer.\n\nText Context:\n{}\n\nGraph Context:\n{}\n\nQuestion: {}",
        text_context, graph, question
    )
}
