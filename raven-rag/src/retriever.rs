//! Question-level retrieval over the pipeline.
//!
//! A [`Retriever`] is a thin delegate: it runs a question through
//! [`RagPipeline::query`] without any additional ranking, and knows how to
//! flatten results into the context block the prompt assembler consumes.

use std::sync::Arc;

use crate::document::SearchResult;
use crate::error::Result;
use crate::pipeline::RagPipeline;

/// Retrieves the chunks most relevant to a question.
#[derive(Clone)]
pub struct Retriever {
    pipeline: Arc<RagPipeline>,
}

impl Retriever {
    /// Create a retriever over the given pipeline.
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }

    /// The pipeline this retriever delegates to.
    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.pipeline
    }

    /// Retrieve the configured number of most-similar chunks.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>> {
        self.pipeline.query(question).await
    }

    /// Concatenate retrieved texts with a blank-line separator, in result
    /// order, for prompt assembly.
    pub fn format_context(results: &[SearchResult]) -> String {
        results.iter().map(|r| r.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::document::Chunk;

    fn result(text: &str) -> SearchResult {
        SearchResult {
            chunk: Chunk {
                id: "c".to_string(),
                text: text.to_string(),
                embedding: Vec::new(),
                metadata: HashMap::new(),
                document_id: "d".to_string(),
                start_offset: 0,
            },
            score: 1.0,
        }
    }

    #[test]
    fn context_joins_texts_with_blank_lines() {
        let results = vec![result("first"), result("second")];
        assert_eq!(Retriever::format_context(&results), "first\n\nsecond");
    }

    #[test]
    fn empty_results_give_empty_context() {
        assert_eq!(Retriever::format_context(&[]), "");
    }
}
