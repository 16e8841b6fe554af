use serde::{Deserialize, Serialize};

/// Supported generation-backend providers.
///
/// All of these speak the OpenAI chat-completions wire format; the variant
/// only selects the default base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// api.openai.com.
    OpenAi,
    /// openrouter.ai — what the reference deployment used.
    OpenRouter,
}

/// Configuration for the generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Which provider endpoint to talk to.
    pub provider: LlmProvider,
    /// Model identifier, e.g. `deepseek/deepseek-chat-v3-0324:free`.
    pub model_id: String,
    /// API key for the provider.
    pub api_key: String,
    /// Base URL override; replaces the provider default when set.
    pub api_base_url: Option<String>,
    /// Sampling temperature. Zero keeps replies deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Completion token ceiling per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Maximum reason/act cycles per conversation turn.
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_max_turns() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    60
}

impl ModelConfig {
    /// The effective base URL for API calls.
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::OpenAi => "https://api.openai.com",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
            }
        }
    }
}
