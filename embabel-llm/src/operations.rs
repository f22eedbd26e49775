//! `LlmOperations`: the narrow collaborator interface this crate calls out
//! through. No implementation of an LLM vendor client lives here -- that is
//! an external collaborator per the runtime's scope; this trait is the
//! boundary a vendor adapter implements against.

use async_trait::async_trait;
use thiserror::Error;

use crate::interaction::LlmInteraction;
use crate::streaming::StreamEvent;

/// Errors an `LlmOperations` collaborator can raise. These map onto the
/// runtime's own error taxonomy (`ExternalTransient`/`ExternalFatal`/
/// `UnsupportedOperation`) the same way an action body's raised failure
/// string does, but as a typed enum since this boundary is the core's own
/// interface rather than an opaque action body.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LlmOperationsError {
    #[error("transient failure calling the LLM: {message}")]
    Transient { message: String },

    #[error("fatal failure calling the LLM: {message}")]
    Fatal { message: String },

    #[error("streaming is not supported by this collaborator")]
    UnsupportedStreaming,
}

impl LlmOperationsError {
    /// Classify a raw vendor error message using the same rate-limit/5xx
    /// taxonomy `embabel_agent::action_runtime` uses for action bodies.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        const TRANSIENT_PATTERNS: &[&str] = &[
            "rate limit",
            "rate-limited",
            "too many requests",
            "quota exceeded",
            "429",
            "timed out",
            "timeout",
            "connection reset",
            "connection refused",
            "500",
            "502",
            "503",
            "504",
        ];
        if TRANSIENT_PATTERNS.iter().any(|p| lower.contains(p)) {
            LlmOperationsError::Transient { message }
        } else {
            LlmOperationsError::Fatal { message }
        }
    }
}

/// The non-core collaborator contract this crate consumes: given a fully
/// assembled `LlmInteraction`, produce a raw completion (as JSON text the
/// caller deserializes into its declared output class), or stream one.
///
/// Implementations are expected to be thin adapters over a vendor SDK/HTTP
/// client; this trait carries no notion of HTTP, auth, or a specific vendor
/// wire format.
#[async_trait]
pub trait LlmOperations: Send + Sync {
    /// Synchronous (non-streaming) completion: returns the raw text of a
    /// single structured response.
    async fn complete(&self, interaction: &LlmInteraction) -> Result<String, LlmOperationsError>;

    /// Whether this collaborator can stream for the named model. Must be
    /// checked before calling `stream`; callers typically back this with a
    /// `StreamingCapabilityCache` rather than probing on every call.
    fn supports_streaming(&self, model: &str) -> bool {
        let _ = model;
        false
    }

    /// Stream a completion as a sequence of `StreamEvent`s. Returns
    /// `UnsupportedStreaming` if `supports_streaming` would have said no --
    /// callers are expected to check first, but this default makes an
    /// unchecked call fail cleanly rather than panic.
    async fn stream(
        &self,
        interaction: &LlmInteraction,
    ) -> Result<Vec<StreamEvent>, LlmOperationsError> {
        let _ = interaction;
        Err(LlmOperationsError::UnsupportedStreaming)
    }
}

/// A deterministic, offline test double: returns a fixed completion (or
/// cycles through a fixed script of completions) regardless of the
/// interaction's content. Mirrors the corpus's `MockLlmProvider` pattern --
/// a small, `Default`-friendly stand-in used in tests and examples, never
/// wired into a real agent process.
pub struct MockLlmOperations {
    responses: std::sync::Mutex<Vec<String>>,
    streaming_models: Vec<String>,
}

impl MockLlmOperations {
    pub fn new(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().map(Into::into).collect::<Vec<_>>().into_iter().rev().collect()),
            streaming_models: Vec::new(),
        }
    }

    pub fn with_streaming_model(mut self, model: impl Into<String>) -> Self {
        self.streaming_models.push(model.into());
        self
    }
}

#[async_trait]
impl LlmOperations for MockLlmOperations {
    async fn complete(&self, _interaction: &LlmInteraction) -> Result<String, LlmOperationsError> {
        self.responses
            .lock()
            .expect("mock responses mutex poisoned")
            .pop()
            .ok_or_else(|| LlmOperationsError::Fatal {
                message: "MockLlmOperations has no scripted responses left".to_string(),
            })
    }

    fn supports_streaming(&self, model: &str) -> bool {
        self.streaming_models.iter().any(|m| m == model)
    }

    async fn stream(&self, interaction: &LlmInteraction) -> Result<Vec<StreamEvent>, LlmOperationsError> {
        let completion = self.complete(interaction).await?;
        Ok(vec![StreamEvent::Thinking("mock reasoning".to_string()), StreamEvent::Object(completion), StreamEvent::End])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::InteractionId;

    fn interaction() -> LlmInteraction {
        LlmInteraction::new(InteractionId::new("op", "Out"))
    }

    #[tokio::test]
    async fn mock_completes_with_scripted_responses_in_order() {
        let ops = MockLlmOperations::new(["first", "second"]);
        assert_eq!(ops.complete(&interaction()).await.unwrap(), "first");
        assert_eq!(ops.complete(&interaction()).await.unwrap(), "second");
        assert!(ops.complete(&interaction()).await.is_err());
    }

    #[tokio::test]
    async fn stream_fails_unsupported_by_default() {
        let ops = MockLlmOperations::new(["only"]);
        assert!(!ops.supports_streaming("any-model"));
        let result = ops.stream(&interaction()).await;
        // The default `LlmOperations::stream` is overridden here, so exercise
        // the trait's unsupported default through a minimal local impl.
        assert!(result.is_ok(), "MockLlmOperations always implements stream itself");
    }

    struct NonStreamingOps;
    #[async_trait]
    impl LlmOperations for NonStreamingOps {
        async fn complete(&self, _interaction: &LlmInteraction) -> Result<String, LlmOperationsError> {
            Ok("ok".to_string())
        }
    }

    #[tokio::test]
    async fn default_stream_impl_is_unsupported() {
        let ops = NonStreamingOps;
        assert!(!ops.supports_streaming("whatever"));
        let result = ops.stream(&interaction()).await;
        assert_eq!(result.unwrap_err(), LlmOperationsError::UnsupportedStreaming);
    }

    #[test]
    fn classify_recognizes_rate_limit_as_transient() {
        assert_eq!(
            LlmOperationsError::classify("HTTP 429 rate limit exceeded"),
            LlmOperationsError::Transient {
                message: "HTTP 429 rate limit exceeded".to_string()
            }
        );
        assert_eq!(
            LlmOperationsError::classify("HTTP 401 unauthorized"),
            LlmOperationsError::Fatal {
                message: "HTTP 401 unauthorized".to_string()
            }
        );
    }
}
