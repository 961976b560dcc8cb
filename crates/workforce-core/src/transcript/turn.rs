//! Turn records emitted by the conversation engine

use serde::{Deserialize, Serialize};

/// Token usage reported for the model call behind a turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Model that produced the turn
    pub model: String,
    /// Prompt tokens
    #[serde(alias = "prompt_tokens")]
    pub input_tokens: u64,
    /// Completion tokens
    #[serde(alias = "completion_tokens")]
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Create a new usage annotation
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
        }
    }
}

/// One message contributed by a participant of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Participant name
    #[serde(alias = "name")]
    pub speaker: String,
    /// Free-form message text
    #[serde(default)]
    pub content: String,
    /// Usage of the model call, when the engine reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl Turn {
    /// Create a turn without usage data
    pub fn new(speaker: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            content: content.into(),
            usage: None,
        }
    }

    /// Attach usage data
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_engine_message() {
        let json = r#"{
            "name": "WebArchitect",
            "content": "hello",
            "usage": {"model": "qwen-max", "prompt_tokens": 1000, "completion_tokens": 200}
        }"#;
        let turn: Turn = serde_json::from_str(json).unwrap();

        assert_eq!(turn.speaker, "WebArchitect");
        assert_eq!(turn.usage, Some(TokenUsage::new("qwen-max", 1000, 200)));
    }

    #[test]
    fn test_deserialize_without_content_or_usage() {
        let turn: Turn = serde_json::from_str(r#"{"speaker": "UserProxy"}"#).unwrap();

        assert_eq!(turn, Turn::new("UserProxy", ""));
    }
}
