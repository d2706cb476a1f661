//! Classification of free-text ticket descriptions into a category and a
//! priority, using a remote chat-completion model.
//!
//! The public entry points never fail because of the remote side: when the
//! credential is missing, the provider is unreachable, or the reply cannot be
//! used, the fixed fallback `{general, low}` is returned. Only malformed input
//! is reported back, as a [`ValidationError`].
//!
//! ```rust,no_run
//! use triage_classifier::{Classifier, ClassifierConfig};
//!
//! # async fn run() -> Result<(), triage_classifier::ValidationError> {
//! let classifier = Classifier::from_config(ClassifierConfig::default());
//! let result = classifier.classify("I was charged twice this month").await?;
//! println!("{} / {}", result.category, result.priority);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use triage_core::Classification;

mod credentials;
mod error;
mod prompt;
mod reply;
mod transport;

pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use error::{RemoteFailure, ValidationError};
pub use prompt::{ChatMessage, CompletionRequest, PromptTemplate, Role};
pub use reply::{extract_json_payload, parse_reply};
pub use transport::{CompletionTransport, HttpTransport};

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f64 = 0.2;
pub const DEFAULT_CREDENTIAL_ENV: &str = "OPENROUTER_API_KEY";

/// Provider settings for the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Model identifier sent with each request.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Environment variable holding the API key.
    #[serde(default = "default_credential_env")]
    pub credential_env: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_credential_env() -> String {
    DEFAULT_CREDENTIAL_ENV.to_string()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            credential_env: default_credential_env(),
        }
    }
}

/// A validated classification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub description: String,
}

impl ClassificationRequest {
    /// Validate a description. Only the empty string counts as missing;
    /// whitespace is passed through to the model unchanged.
    pub fn new(description: impl Into<String>) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.is_empty() {
            return Err(ValidationError::DescriptionRequired);
        }
        Ok(Self { description })
    }

    /// Validate an untyped request body.
    ///
    /// The body must be a JSON object; that is checked before `description`.
    pub fn from_value(body: &Value) -> Result<Self, ValidationError> {
        let object = body.as_object().ok_or(ValidationError::InvalidFormat)?;
        match object.get("description") {
            Some(Value::String(description)) => Self::new(description.as_str()),
            _ => Err(ValidationError::DescriptionRequired),
        }
    }
}

/// How a successful pipeline run produced its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model answered and the reply was validated.
    Classified(Classification),
    /// No credential is configured; nothing was sent.
    CredentialMissing,
}

impl Outcome {
    /// The classification to report; the fallback when nothing was sent.
    pub fn classification(&self) -> Classification {
        match self {
            Outcome::Classified(classification) => *classification,
            Outcome::CredentialMissing => Classification::FALLBACK,
        }
    }
}

/// Classifies ticket descriptions with a remote model.
///
/// Holds no per-call state; one instance can serve any number of concurrent
/// calls.
#[derive(Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    credentials: Arc<dyn CredentialProvider>,
    transport: Arc<dyn CompletionTransport>,
    prompt: PromptTemplate,
}

impl Classifier {
    pub fn new(
        config: ClassifierConfig,
        credentials: Arc<dyn CredentialProvider>,
        transport: Arc<dyn CompletionTransport>,
    ) -> Self {
        Self {
            config,
            credentials,
            transport,
            prompt: PromptTemplate::default(),
        }
    }

    /// Environment credentials and the HTTP transport, both taken from `config`.
    pub fn from_config(config: ClassifierConfig) -> Self {
        let credentials = Arc::new(EnvCredentials::new(config.credential_env.clone()));
        let transport = Arc::new(HttpTransport::new(config.api_url.clone()));
        Self::new(config, credentials, transport)
    }

    /// Override the system prompt.
    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Whether a credential is currently available.
    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Classify a description, falling back to `{general, low}` on any
    /// remote failure.
    pub async fn classify(&self, description: &str) -> Result<Classification, ValidationError> {
        let request = ClassificationRequest::new(description)?;
        Ok(self.classify_request(&request).await)
    }

    /// Like [`Classifier::classify`], for an untyped JSON request body.
    pub async fn classify_value(&self, body: &Value) -> Result<Classification, ValidationError> {
        let request = ClassificationRequest::from_value(body)?;
        Ok(self.classify_request(&request).await)
    }

    /// Run the pipeline and substitute the fallback for any failure.
    pub async fn classify_request(&self, request: &ClassificationRequest) -> Classification {
        match self.try_classify(request).await {
            Ok(outcome) => {
                if outcome == Outcome::CredentialMissing {
                    debug!(
                        target: "triage::classifier",
                        credential_env = %self.config.credential_env,
                        "no credential configured, using fallback classification"
                    );
                }
                outcome.classification()
            }
            Err(err) => {
                warn!(
                    target: "triage::classifier",
                    kind = err.kind(),
                    model = %self.config.model,
                    "classification failed, using fallback: {err}"
                );
                Classification::FALLBACK
            }
        }
    }

    /// The pipeline itself, with failures left inspectable.
    ///
    /// Exactly one transport call is made when a credential is present, none
    /// otherwise.
    pub async fn try_classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Outcome, RemoteFailure> {
        let Some(api_key) = self.api_key() else {
            return Ok(Outcome::CredentialMissing);
        };

        let started = Instant::now();
        let completion = CompletionRequest::classification(
            self.config.model.clone(),
            self.config.temperature,
            &self.prompt,
            &request.description,
        );
        let raw = self.transport.complete(&api_key, &completion).await?;
        let classification = parse_reply(&raw)?;

        info!(
            target: "triage::classifier",
            category = %classification.category,
            priority = %classification.priority,
            duration_ms = started.elapsed().as_millis() as u64,
            "description classified"
        );
        Ok(Outcome::Classified(classification))
    }

    fn api_key(&self) -> Option<String> {
        self.credentials
            .api_key()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use triage_core::{Category, Priority};

    /// Transport returning a canned reply and recording what it was sent.
    struct ScriptedTransport {
        reply: Result<String, u16>,
        calls: AtomicUsize,
        last: Mutex<Option<(String, CompletionRequest)>>,
    }

    impl ScriptedTransport {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionTransport for ScriptedTransport {
        async fn complete(
            &self,
            api_key: &str,
            request: &CompletionRequest,
        ) -> Result<String, RemoteFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((api_key.to_string(), request.clone()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(RemoteFailure::Status {
                    status: *status,
                    body: "upstream unavailable".into(),
                }),
            }
        }
    }

    fn classifier(key: Option<&str>, transport: Arc<ScriptedTransport>) -> Classifier {
        let credentials = match key {
            Some(k) => StaticCredentials::new(k),
            None => StaticCredentials::none(),
        };
        Classifier::new(ClassifierConfig::default(), Arc::new(credentials), transport)
    }

    #[tokio::test]
    async fn empty_description_is_rejected_without_a_call() {
        let transport = ScriptedTransport::replying("{}");
        let c = classifier(Some("sk"), transport.clone());

        assert_eq!(
            c.classify("").await.unwrap_err(),
            ValidationError::DescriptionRequired
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn whitespace_description_reaches_the_model() {
        let transport =
            ScriptedTransport::replying(r#"{"category": "account", "priority": "high"}"#);
        let c = classifier(Some("sk"), transport.clone());

        assert_eq!(
            c.classify("   ").await.unwrap(),
            Classification::new(Category::Account, Priority::High)
        );
        assert_eq!(
            c.classify_value(&json!({"description": "\n\t"})).await.unwrap(),
            Classification::new(Category::Account, Priority::High)
        );
        assert_eq!(transport.calls(), 2);
        let (_, sent) = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.messages[1].content, "\n\t");
    }

    #[tokio::test]
    async fn structured_body_is_validated_before_description() {
        let transport = ScriptedTransport::replying("{}");
        let c = classifier(Some("sk"), transport.clone());

        for body in [json!(["description"]), json!("text"), json!(null)] {
            assert_eq!(
                c.classify_value(&body).await.unwrap_err(),
                ValidationError::InvalidFormat
            );
        }
        for body in [
            json!({}),
            json!({"description": null}),
            json!({"description": ""}),
            json!({"description": 42}),
        ] {
            assert_eq!(
                c.classify_value(&body).await.unwrap_err(),
                ValidationError::DescriptionRequired
            );
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn missing_credential_short_circuits() {
        let transport = ScriptedTransport::replying(r#"{"category":"billing","priority":"high"}"#);
        let c = classifier(None, transport.clone());

        let request = ClassificationRequest::new("refund please").unwrap();
        assert_eq!(
            c.try_classify(&request).await.unwrap(),
            Outcome::CredentialMissing
        );
        assert_eq!(
            c.classify("refund please").await.unwrap(),
            Classification::FALLBACK
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn blank_credential_counts_as_missing() {
        let transport = ScriptedTransport::replying("{}");
        let c = classifier(Some("  "), transport.clone());

        assert!(!c.is_configured());
        assert!(c.classify("anything").await.unwrap().is_fallback());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn sends_prompt_and_description_once() {
        let transport = ScriptedTransport::replying(r#"{"category":"BILLING","priority":"HIGH"}"#);
        let c = classifier(Some("sk-test"), transport.clone());

        let result = c.classify("I was charged twice").await.unwrap();

        assert_eq!(result, Classification::new(Category::Billing, Priority::High));
        assert_eq!(transport.calls(), 1);

        let (key, sent) = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(key, "sk-test");
        assert_eq!(sent.model, DEFAULT_MODEL);
        assert_eq!(sent.temperature, 0.2);
        assert_eq!(sent.messages.len(), 2);
        assert_eq!(sent.messages[0].role, Role::System);
        assert!(sent.messages[0].content.contains("billing, technical, account, general"));
        assert_eq!(sent.messages[1], ChatMessage::user("I was charged twice"));
    }

    #[tokio::test]
    async fn fenced_reply_is_accepted() {
        let transport = ScriptedTransport::replying(
            "```json\n{\"category\": \"technical\", \"priority\": \"medium\"}\n```",
        );
        let c = classifier(Some("sk"), transport);

        assert_eq!(
            c.classify("app crashes on start").await.unwrap(),
            Classification::new(Category::Technical, Priority::Medium)
        );
    }

    #[tokio::test]
    async fn unknown_category_is_replaced_field_by_field() {
        let transport =
            ScriptedTransport::replying(r#"{"category": "unknown_value", "priority": "medium"}"#);
        let c = classifier(Some("sk"), transport);

        assert_eq!(
            c.classify("something odd").await.unwrap(),
            Classification::new(Category::General, Priority::Medium)
        );
    }

    #[tokio::test]
    async fn remote_failures_collapse_to_fallback() {
        let failing = ScriptedTransport::failing(503);
        let c = classifier(Some("sk"), failing.clone());
        let request = ClassificationRequest::new("help").unwrap();

        let err = c.try_classify(&request).await.unwrap_err();
        assert_eq!(err.kind(), "status");
        assert!(c.classify("help").await.unwrap().is_fallback());
        assert_eq!(failing.calls(), 2);

        let prose = ScriptedTransport::replying("This looks like a billing issue.");
        let c = classifier(Some("sk"), prose);
        assert!(matches!(
            c.try_classify(&request).await,
            Err(RemoteFailure::MalformedReply(_))
        ));
        assert_eq!(c.classify("help").await.unwrap(), Classification::FALLBACK);
    }

    #[tokio::test]
    async fn custom_prompt_is_sent() {
        let transport = ScriptedTransport::replying("{}");
        let c = classifier(Some("sk"), transport.clone())
            .with_prompt(PromptTemplate::new("be brief"));

        c.classify("x").await.unwrap();

        let (_, sent) = transport.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.messages[0], ChatMessage::system("be brief"));
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: ClassifierConfig =
            serde_json::from_value(json!({"model": "anthropic/claude-3-haiku"})).unwrap();
        assert_eq!(config.model, "anthropic/claude-3-haiku");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.credential_env, DEFAULT_CREDENTIAL_ENV);
    }
}
