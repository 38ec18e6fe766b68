use serde::{Deserialize, Serialize};

/// File shown in previews when no other path is requested.
pub const DEFAULT_PREVIEW_PATH: &str = "index.html";

/// Instruction sent ahead of every user prompt.
///
/// The marker syntax it asks for is the one [`crate::bundle`] parses, so the
/// two must change together.
pub const SYSTEM_INSTRUCTION: &str = "\
You are an expert web developer. You receive a description of a website and
you output a complete, production-ready static website that implements it.

Rules:
- Output every file of the site, one after another, in a single response.
- Start each file with a marker line of the exact form <!-- File: <path> --> on its own line,
  where <path> is relative to the site root, uses forward slashes and has no leading slash.
- The first file must be <!-- File: index.html -->.
- Put styles in <!-- File: css/styles.css --> and scripts in <!-- File: js/main.js -->,
  and add further pages (for example menu.html or about.html) as separate files.
- Link pages, styles and scripts with relative paths so the site works when opened from disk.
- Use semantic, accessible HTML5 and a responsive layout.
- Output raw file contents only. No markdown fences. No explanations before, between or after files.";

/// Error type for prompt validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("Prompt must not be empty")]
    Empty,
}

/// A single user request for a generated site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

impl GenerationRequest {
    /// Build a request, rejecting prompts that are empty after trimming.
    pub fn new(prompt: impl Into<String>) -> Result<Self, PromptError> {
        let request = Self {
            prompt: prompt.into(),
        };
        request.user_prompt()?;
        Ok(request)
    }

    /// The trimmed prompt to forward to the model.
    pub fn user_prompt(&self) -> Result<&str, PromptError> {
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            Err(PromptError::Empty)
        } else {
            Ok(prompt)
        }
    }
}

/// Sampling options passed to the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f64,
    pub max_output_tokens: u64,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 4096,
        }
    }
}
