//! AI code generation across an ordered list of rate-limited providers

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod gemini;
mod limiter;
mod openai;
mod prompt;

pub use gemini::{GeminiProvider, DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
pub use limiter::RateLimiter;
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_MODEL, DEFAULT_OPENAI_URL};
pub use prompt::extract_code_only;

pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_OPENAI_RATE_LIMIT: usize = 50;
pub const DEFAULT_GEMINI_RATE_LIMIT: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} is not set")]
    NotConfigured(&'static str),
    #[error("provider timed out")]
    Timeout,
    #[error("provider request failed: {0}")]
    Request(reqwest::Error),
    #[error("provider returned {0}: {1}")]
    Status(u16, String),
    #[error("provider returned no completion")]
    EmptyResponse,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Request(err)
        }
    }
}

/// A single upstream model
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Name reported back to callers, e.g. `openai`
    fn name(&self) -> &'static str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateInput {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Generated {
    pub code: String,
    pub provider: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error("all providers are rate limited")]
    RateLimited,
    #[error("no AI provider configured: {0}")]
    NotConfigured(String),
    #[error("no AI provider available: {0}")]
    ProviderUnavailable(String),
}

struct Slot {
    provider: Arc<dyn CompletionProvider>,
    limiter: RateLimiter,
}

/// Tries each provider in order, skipping any whose limiter refuses, until
/// one produces a completion.
pub struct CodeGenerator {
    slots: Vec<Slot>,
}

impl std::fmt::Debug for CodeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.slots.iter().map(|s| s.provider.name()).collect();
        f.debug_struct("CodeGenerator")
            .field("providers", &names)
            .finish()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append a provider; earlier providers are preferred.
    pub fn with_provider(
        mut self,
        provider: impl CompletionProvider,
        limiter: RateLimiter,
    ) -> Self {
        self.slots.push(Slot {
            provider: Arc::new(provider),
            limiter,
        });
        self
    }

    pub async fn generate(&self, input: &GenerateInput) -> Result<Generated, GenerateError> {
        if input.prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        let target = prompt::target_context(input.language.as_deref(), input.filename.as_deref());
        let system = prompt::system_prompt(target.as_deref());
        let user = prompt::user_prompt(&input.prompt, target.as_deref());

        let mut last_error = None;
        for slot in &self.slots {
            let name = slot.provider.name();
            if !slot.limiter.try_acquire() {
                tracing::debug!(provider = name, "provider rate limited, skipping");
                continue;
            }

            match slot.provider.complete(&system, &user).await {
                Ok(text) => {
                    return Ok(Generated {
                        code: extract_code_only(&text),
                        provider: name.to_string(),
                    })
                }
                Err(e) => {
                    tracing::warn!(provider = name, error = %e, "provider failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            None => Err(GenerateError::RateLimited),
            Some(ProviderError::NotConfigured(_)) => Err(GenerateError::NotConfigured(
                "configure OPENAI_API_KEY or GEMINI_API_KEY".to_string(),
            )),
            Some(e) => Err(GenerateError::ProviderUnavailable(e.to_string())),
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Provider returning a canned result and counting its calls
    struct MockProvider {
        pub name: &'static str,
        pub reply: Result<&'static str, &'static str>,
        pub calls: Arc<AtomicUsize>,
    }

    impl MockProvider {
        pub fn ok(name: &'static str, reply: &'static str) -> Self {
            Self {
                name,
                reply: Ok(reply),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn failing(name: &'static str) -> Self {
            Self {
                name,
                reply: Err("boom"),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for MockProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn complete(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err("unset") => Err(ProviderError::NotConfigured("TEST_KEY")),
                Err(body) => Err(ProviderError::Status(500, body.to_string())),
            }
        }
    }

    fn input(prompt: &str) -> GenerateInput {
        GenerateInput {
            prompt: prompt.to_string(),
            language: Some("python".to_string()),
            filename: None,
        }
    }

    #[tokio::test]
    async fn test_first_provider_used_and_cleaned() {
        let generator = CodeGenerator::new()
            .with_provider(
                MockProvider::ok("first", "Here is it:\n```python\nprint(1)\n```"),
                RateLimiter::per_minute(5),
            )
            .with_provider(MockProvider::ok("second", "x"), RateLimiter::per_minute(5));

        let generated = generator.generate(&input("print one")).await.unwrap();
        assert_eq!(generated.provider, "first");
        assert_eq!(generated.code, "print(1)");
    }

    #[tokio::test]
    async fn test_falls_back_on_failure() {
        let failing = MockProvider::failing("first");
        let calls = failing.calls.clone();
        let generator = CodeGenerator::new()
            .with_provider(failing, RateLimiter::per_minute(5))
            .with_provider(MockProvider::ok("second", "x = 2"), RateLimiter::per_minute(5));

        let generated = generator.generate(&input("two")).await.unwrap();
        assert_eq!(generated.provider, "second");
        assert_eq!(generated.code, "x = 2");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_falls_back_when_limited() {
        let first = MockProvider::ok("first", "a");
        let calls = first.calls.clone();
        let generator = CodeGenerator::new()
            .with_provider(first, RateLimiter::per_minute(1))
            .with_provider(MockProvider::ok("second", "b"), RateLimiter::per_minute(5));

        assert_eq!(generator.generate(&input("a")).await.unwrap().provider, "first");
        assert_eq!(generator.generate(&input("b")).await.unwrap().provider, "second");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_all_limited_is_rate_limited() {
        let generator = CodeGenerator::new()
            .with_provider(MockProvider::ok("only", "a"), RateLimiter::per_minute(0));

        assert!(matches!(
            generator.generate(&input("a")).await,
            Err(GenerateError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_and_failed_errors() {
        let generator = CodeGenerator::new().with_provider(
            MockProvider {
                name: "nokey",
                reply: Err("unset"),
                calls: Arc::new(AtomicUsize::new(0)),
            },
            RateLimiter::per_minute(5),
        );
        assert!(matches!(
            generator.generate(&input("a")).await,
            Err(GenerateError::NotConfigured(_))
        ));

        let generator = CodeGenerator::new()
            .with_provider(MockProvider::failing("down"), RateLimiter::per_minute(5));
        assert!(matches!(
            generator.generate(&input("a")).await,
            Err(GenerateError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let generator = CodeGenerator::new();
        assert!(matches!(
            generator.generate(&input("   ")).await,
            Err(GenerateError::EmptyPrompt)
        ));
    }
}
