//! Outbound calls to the completion provider.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::RemoteFailure;
use crate::prompt::CompletionRequest;

/// Sends one chat completion and returns the text of the first reply.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, RemoteFailure>;
}

/// OpenAI-compatible HTTP transport (OpenRouter, OpenAI, Ollama, vLLM...).
///
/// A new `reqwest::Client` is built for every call. No timeout is set here;
/// callers that need bounded latency wrap the call themselves.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    api_url: String,
}

impl HttpTransport {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest,
    ) -> Result<String, RemoteFailure> {
        let client = Client::builder().build().map_err(RemoteFailure::Client)?;

        let response = client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(RemoteFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(RemoteFailure::Transport)?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(RemoteFailure::EmptyReply)?;

        debug!(target: "triage::transport", chars = content.len(), "completion received");
        Ok(content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}
