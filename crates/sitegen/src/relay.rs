use crate::llm::CompletionService;
use crate::prelude::Error;
use sitegen_core::prompt::{CompletionOptions, GenerationRequest, SYSTEM_INSTRUCTION};
use std::sync::Arc;

/// Forwards user prompts to the completion service.
///
/// Holds no per-call state, so one relay can be shared across concurrent
/// requests.
#[derive(Clone)]
pub struct Relay {
    service: Arc<dyn CompletionService>,
    options: CompletionOptions,
}

impl Relay {
    pub fn new(service: Arc<dyn CompletionService>, options: CompletionOptions) -> Self {
        Self { service, options }
    }

    /// Generate a site for `prompt` and return the model's raw text.
    ///
    /// Empty prompts fail with [`Error::InvalidInput`] before the service is
    /// called. Service failures become [`Error::Service`]; there is a single
    /// attempt per call.
    pub async fn generate(&self, prompt: &str) -> Result<String, Error> {
        let request = GenerationRequest::new(prompt)?;
        let user_prompt = request.user_prompt()?;

        log::info!(
            "Forwarding prompt ({} chars) to the completion service",
            user_prompt.len()
        );

        let text = self
            .service
            .complete(SYSTEM_INSTRUCTION, user_prompt, self.options)
            .await
            .map_err(|e| {
                log::error!("Completion service failed: {e}");
                Error::Service(e.to_string())
            })?;

        log::debug!("Completion returned {} chars", text.len());

        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use color_eyre::eyre::{eyre, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory completion service that records every call.
    pub(crate) struct FakeService {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_call: Mutex<Option<(String, String, CompletionOptions)>>,
    }

    impl FakeService {
        pub(crate) fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            })
        }

        pub(crate) fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            })
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionService for FakeService {
        async fn complete(
            &self,
            system_instruction: &str,
            user_prompt: &str,
            options: CompletionOptions,
        ) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_call.lock().unwrap() = Some((
                system_instruction.to_string(),
                user_prompt.to_string(),
                options,
            ));
            self.reply.clone().map_err(|e| eyre!(e))
        }
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let raw = "  preamble\n<!-- File: index.html -->\n<h1>Hi</h1>\n\n";
        let service = FakeService::replying(raw);
        let relay = Relay::new(service.clone(), CompletionOptions::default());

        let text = relay.generate("A coffee shop").await.unwrap();

        assert_eq!(text, raw);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_sends_instruction_trimmed_prompt_and_options() {
        let service = FakeService::replying("ok");
        let options = CompletionOptions {
            temperature: 0.3,
            max_output_tokens: 2000,
        };
        let relay = Relay::new(service.clone(), options);

        relay.generate("\n  A taco truck  ").await.unwrap();

        let (system, prompt, sent) = service.last_call.lock().unwrap().clone().unwrap();
        assert_eq!(system, SYSTEM_INSTRUCTION);
        assert_eq!(prompt, "A taco truck");
        assert_eq!(sent, options);
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt_without_calling_service() {
        let service = FakeService::replying("unused");
        let relay = Relay::new(service.clone(), CompletionOptions::default());

        for prompt in ["", "   ", "\n\t"] {
            let err = relay.generate(prompt).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_surfaces_service_error_after_one_attempt() {
        let service = FakeService::failing("429 quota exceeded");
        let relay = Relay::new(service.clone(), CompletionOptions::default());

        match relay.generate("A florist").await {
            Err(Error::Service(message)) => assert!(message.contains("429 quota exceeded")),
            other => panic!("expected Service error, got {other:?}"),
        }
        assert_eq!(service.calls(), 1);
    }
}
