//! Request and response types for chat completion calls.
//!
//! These mirror the OpenAI chat completion format, including the
//! multimodal content-part form used to attach an image to a user turn.

use serde::{Deserialize, Serialize};

/// Message content: either plain text or an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    /// A plain string.
    Text(String),
    /// Text and image parts, sent in order.
    Parts(Vec<ContentPart>),
}

/// One part of a multimodal message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text fragment.
    Text {
        /// The text.
        text: String,
    },
    /// An image reference, usually a `data:` URL.
    ImageUrl {
        /// The image location.
        image_url: ImageUrl,
    },
}

/// Image location wrapper used by [`ContentPart::ImageUrl`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageUrl {
    /// `https://...` or `data:<mime>;base64,...`.
    pub url: String,
}

/// A message in a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// The role of the message author ("system", "user", "assistant").
    pub role: String,

    /// The content of the message.
    pub content: MessageContent,
}

impl ChatMessage {
    /// Create a plain-text message with role and content.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    /// Create a plain-text user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a user message carrying image attachments followed by text.
    pub fn user_with_images(image_urls: &[String], text: impl Into<String>) -> Self {
        let mut parts: Vec<ContentPart> = image_urls
            .iter()
            .map(|url| ContentPart::ImageUrl {
                image_url: ImageUrl { url: url.clone() },
            })
            .collect();
        parts.push(ContentPart::Text { text: text.into() });
        Self {
            role: "user".into(),
            content: MessageContent::Parts(parts),
        }
    }

    /// Number of image attachments on this message.
    pub fn image_count(&self) -> usize {
        match &self.content {
            MessageContent::Text(_) => 0,
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|p| matches!(p, ContentPart::ImageUrl { .. }))
                .count(),
        }
    }

    /// Concatenated text of the message, ignoring images.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(t) => t.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// A chat completion request sent to a provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model identifier (e.g. "meta-llama/llama-4-scout").
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<ChatMessage>,

    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i32>,

    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

impl ChatRequest {
    /// Create a minimal chat request with a model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            temperature: None,
        }
    }
}

/// A chat completion response (OpenAI format).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatResponse {
    /// Unique identifier for this completion.
    #[serde(default)]
    pub id: String,

    /// The list of completion choices.
    pub choices: Vec<Choice>,

    /// Token usage statistics, if reported.
    #[serde(default)]
    pub usage: Option<Usage>,

    /// The model that generated the response.
    #[serde(default)]
    pub model: String,
}

impl ChatResponse {
    /// Text content of the first choice.
    ///
    /// A missing choice is `None`; a choice with null content is `Some("")`.
    pub fn first_text(&self) -> Option<&str> {
        self.choices
            .first()
            .map(|c| c.message.content.as_deref().unwrap_or(""))
    }
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Choice {
    /// The index of this choice in the list.
    #[serde(default)]
    pub index: i32,

    /// The assistant's reply.
    pub message: AssistantMessage,

    /// Why generation stopped (e.g. "stop", "length").
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message inside a [`Choice`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AssistantMessage {
    /// Usually "assistant".
    pub role: String,

    /// Generated text. Some providers send `null`.
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage statistics for a completion request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Usage {
    /// Number of tokens in the prompt.
    pub prompt_tokens: i32,

    /// Number of tokens in the generated completion.
    pub completion_tokens: i32,

    /// Total tokens used (prompt + completion).
    pub total_tokens: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_message_serializes_as_string_content() {
        let msg = ChatMessage::system("You are a radiology assistant.");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are a radiology assistant.");
    }

    #[test]
    fn image_message_serializes_openai_parts() {
        let msg = ChatMessage::user_with_images(
            &["data:image/png;base64,AAAA".to_string()],
            "Describe this film.",
        );
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        let parts = json["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "image_url");
        assert_eq!(parts[0]["image_url"]["url"], "data:image/png;base64,AAAA");
        assert_eq!(parts[1]["type"], "text");
        assert_eq!(parts[1]["text"], "Describe this film.");
    }

    #[test]
    fn image_count_and_text() {
        let msg = ChatMessage::user_with_images(
            &["data:a".to_string(), "data:b".to_string()],
            "two views",
        );
        assert_eq!(msg.image_count(), 2);
        assert_eq!(msg.text(), "two views");
        assert_eq!(ChatMessage::user("hi").image_count(), 0);
    }

    #[test]
    fn multimodal_message_roundtrip() {
        let msg = ChatMessage::user_with_images(&["data:x".to_string()], "t");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, msg);
    }

    #[test]
    fn request_omits_unset_sampling_fields() {
        let req = ChatRequest::new("m", vec![ChatMessage::user("Hi")]);
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""model":"m""#));
        assert!(!json.contains("max_tokens"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn response_first_text() {
        let json = r#"{
            "id": "gen-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}],
            "model": "meta-llama/llama-4-scout"
        }"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some("ok"));
        assert!(resp.usage.is_none());
    }

    #[test]
    fn response_null_content_is_empty_text() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let resp: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.first_text(), Some(""));
    }

    #[test]
    fn response_without_choices() {
        let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(resp.first_text(), None);
    }
}
