//! System prompt and chat message types.

use serde::{Deserialize, Serialize};
use triage_core::{Category, Priority};

/// Container for the system prompt so callers can override copy if needed.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system_prompt: String,
}

impl PromptTemplate {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: prompt.into(),
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        let categories = Category::ALL.map(|c| c.as_str()).join(", ");
        let priorities = Priority::ALL.map(|p| p.as_str()).join(", ");
        let prompt = [
            "You are a support ticket classification assistant.".to_string(),
            "Classify the user's problem into exactly one category and exactly one priority."
                .to_string(),
            format!("Allowed categories: {categories}"),
            format!("Allowed priorities: {priorities}"),
            "Strict rules:".to_string(),
            r#"- Return ONLY valid JSON of the form {"category": "...", "priority": "..."}"#
                .to_string(),
            "- No markdown formatting.".to_string(),
            "- No explanations or any other text.".to_string(),
            "- If uncertain, use \"general\" and \"low\".".to_string(),
        ]
        .join("\n");
        Self::new(prompt)
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of an OpenAI-compatible `chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

impl CompletionRequest {
    /// The two-message exchange: system instruction, then the raw description.
    pub fn classification(
        model: impl Into<String>,
        temperature: f64,
        prompt: &PromptTemplate,
        description: &str,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::system(prompt.system_prompt.clone()),
                ChatMessage::user(description),
            ],
            temperature,
        }
    }
}
