use newsdigest_core::{AppConfig, SummarizerFactory, SummarizerProvider};

use crate::client::SummarizerClient;
use crate::error::LlmError;
use crate::gemini::{GeminiClient, DEFAULT_BASE_URL};
use crate::ollama::OllamaClient;

/// Everything needed to construct either provider.
#[derive(Clone)]
pub struct LlmSettings {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ollama_url: String,
    pub ollama_model: String,
    pub language: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl LlmSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            gemini_api_key: config.gemini_api_key.clone(),
            gemini_model: config.gemini_model.clone(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            ollama_url: config.ollama_url.clone(),
            ollama_model: config.ollama_model.clone(),
            language: config.summary_language.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Builds a [`SummarizerClient`] for whichever provider a target selected.
pub struct LlmFactory {
    settings: LlmSettings,
}

impl LlmFactory {
    #[must_use]
    pub fn new(settings: LlmSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(LlmSettings::from_config(config))
    }
}

impl SummarizerFactory for LlmFactory {
    type Summarizer = SummarizerClient;
    type Error = LlmError;

    fn create(&self, provider: SummarizerProvider) -> Result<SummarizerClient, LlmError> {
        let s = &self.settings;
        let client = match provider {
            SummarizerProvider::Gemini => {
                let api_key = s.gemini_api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
                SummarizerClient::Gemini(GeminiClient::with_base_url(
                    api_key,
                    &s.gemini_model,
                    &s.language,
                    s.timeout_secs,
                    &s.user_agent,
                    &s.gemini_base_url,
                )?)
            }
            SummarizerProvider::Ollama => SummarizerClient::Ollama(OllamaClient::new(
                &s.ollama_url,
                &s.ollama_model,
                &s.language,
                s.timeout_secs,
                &s.user_agent,
            )?),
        };

        tracing::info!(provider = %provider, model = %client.model(), "summarizer created");
        Ok(client)
    }
}
