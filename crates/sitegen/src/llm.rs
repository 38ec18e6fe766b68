use crate::prelude::*;
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::{ollama, openai};
use sitegen_core::prompt::CompletionOptions;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const OLLAMA_API_BASE: &str = "http://localhost:11434";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Provider {
    /// OpenAI-compatible chat API
    #[value(name = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
}

/// Model provider configuration shared by every command that calls the model.
#[derive(Debug, Clone, clap::Args)]
pub struct ProviderOptions {
    /// Completion provider
    #[clap(long, env = "SITEGEN_PROVIDER", value_enum, default_value = "openai")]
    pub provider: Provider,

    /// Model name used for generation
    #[clap(long, env = "SITEGEN_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// API key for the provider (required for openai)
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the provider base URL
    #[clap(long, env = "SITEGEN_BASE_URL")]
    pub base_url: Option<String>,

    /// Sampling temperature
    #[clap(long, env = "SITEGEN_TEMPERATURE", default_value = "0.7")]
    pub temperature: f64,

    /// Maximum number of tokens in the completion
    #[clap(long, env = "SITEGEN_MAX_TOKENS", default_value = "4096")]
    pub max_tokens: u64,
}

impl ProviderOptions {
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: self.temperature,
            max_output_tokens: self.max_tokens,
        }
    }
}

/// The external text-completion capability.
///
/// Implementations make exactly one attempt per call; any failure is returned
/// as-is and classified by the relay.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String>;
}

/// Completion service backed by a rig provider client.
#[derive(Debug, Clone)]
pub struct RigCompletion {
    provider: Provider,
    model: String,
    api_key: Option<String>,
    base_url: String,
}

impl RigCompletion {
    pub fn from_options(options: &ProviderOptions) -> Result<Self> {
        if options.provider == Provider::OpenAi && options.api_key.is_none() {
            return Err(eyre!(
                "An API key is required for the openai provider. Set OPENAI_API_KEY or pass --api-key"
            ));
        }

        let base_url = options.base_url.clone().unwrap_or_else(|| {
            match options.provider {
                Provider::OpenAi => OPENAI_API_BASE,
                Provider::Ollama => OLLAMA_API_BASE,
            }
            .to_string()
        });

        Ok(Self {
            provider: options.provider,
            model: options.model.clone(),
            api_key: options.api_key.clone(),
            base_url,
        })
    }

    pub fn describe(&self) -> String {
        f!("{:?} model '{}' at {}", self.provider, self.model, self.base_url)
    }
}

#[async_trait]
impl CompletionService for RigCompletion {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String> {
        match self.provider {
            Provider::OpenAi => {
                let api_key = self
                    .api_key
                    .as_deref()
                    .ok_or_eyre("Missing API key for the openai provider")?;

                let client: openai::Client = openai::Client::builder()
                    .api_key(api_key)
                    .base_url(&self.base_url)
                    .build()
                    .map_err(|e| eyre!("Failed to create OpenAI client: {}", e))?;

                let agent = client
                    .agent(&self.model)
                    .preamble(system_instruction)
                    .temperature(options.temperature)
                    .max_tokens(options.max_output_tokens)
                    .build();

                agent
                    .prompt(user_prompt)
                    .await
                    .map_err(|e| eyre!("Model generation failed: {}", e))
            }
            Provider::Ollama => {
                use rig::client::Nothing;

                let client: ollama::Client = ollama::Client::builder()
                    .api_key(Nothing)
                    .base_url(&self.base_url)
                    .build()
                    .map_err(|e| eyre!("Failed to create Ollama client: {}", e))?;

                let agent = client
                    .agent(&self.model)
                    .preamble(system_instruction)
                    .temperature(options.temperature)
                    .max_tokens(options.max_output_tokens)
                    .build();

                agent
                    .prompt(user_prompt)
                    .await
                    .map_err(|e| eyre!("Model generation failed: {}", e))
            }
        }
    }
}
