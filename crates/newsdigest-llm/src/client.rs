use newsdigest_core::{Summarizer, SummarizerProvider};

use crate::error::LlmError;
use crate::gemini::GeminiClient;
use crate::ollama::OllamaClient;

/// The summarizer a target selected, one variant per provider.
pub enum SummarizerClient {
    Gemini(GeminiClient),
    Ollama(OllamaClient),
}

impl SummarizerClient {
    #[must_use]
    pub fn provider(&self) -> SummarizerProvider {
        match self {
            SummarizerClient::Gemini(_) => SummarizerProvider::Gemini,
            SummarizerClient::Ollama(_) => SummarizerProvider::Ollama,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            SummarizerClient::Gemini(c) => c.model(),
            SummarizerClient::Ollama(c) => c.model(),
        }
    }
}

impl Summarizer for SummarizerClient {
    type Error = LlmError;

    async fn summarize(&self, text: &str) -> Result<String, LlmError> {
        match self {
            SummarizerClient::Gemini(c) => c.summarize(text).await,
            SummarizerClient::Ollama(c) => c.summarize(text).await,
        }
    }
}
