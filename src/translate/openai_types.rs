//! Request types for the [OpenAI Chat Completions API](https://platform.openai.com/docs/api-reference/chat).
//!
//! Only `messages` is required. Every optional field is decoded leniently: a value
//! of the wrong type reads as `None`, so callers never see a half-typed field.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::lenient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<Number>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Number>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<Number>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<StopSequences>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ChatToolChoice>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChatMetadata>,
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatTool>>,
    // Fields with no Anthropic counterpart (frequency_penalty, n, user, ...)
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    /// Kept as sent; the system message is hoisted without re-encoding.
    #[serde(default)]
    pub content: Value,
}

impl ChatMessage {
    pub fn parsed_content(&self) -> serde_json::Result<ChatContent> {
        ChatContent::deserialize(&self.content)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
    /// Anything else (`null` for tool-calling assistant turns), passed through as-is.
    Raw(Value),
}

/// One element of a content list. Parts that are not a well-formed `text` or
/// `image_url` part are kept verbatim in `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatContentPart {
    Known(ContentPart),
    Unknown(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrlDetail },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrlDetail {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopSequences {
    One(String),
    Many(Vec<String>),
}

impl StopSequences {
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StopSequences::One(s) => vec![s.clone()],
            StopSequences::Many(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatToolChoice {
    Mode(String), // "auto", "required", "none"
    Named(ChatToolChoiceNamed),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolChoiceNamed {
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choice_type: Option<String>, // "function"
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<ChatToolChoiceFunction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatToolChoiceFunction {
    #[serde(default, deserialize_with = "lenient::optional")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTool {
    #[serde(rename = "type")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>, // "function"
    pub function: ChatFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatFunction {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_optional_fields_read_as_absent() {
        let req: ChatCompletionRequest = serde_json::from_value(json!({
            "messages": [],
            "model": 42,
            "stream": "yes",
            "temperature": "hot",
            "stop": 5,
            "metadata": "nope",
            "parallel_tool_calls": 1
        }))
        .unwrap();

        assert!(req.model.is_none());
        assert!(req.stream.is_none());
        assert!(req.temperature.is_none());
        assert!(req.stop.is_none());
        assert!(req.metadata.is_none());
        assert!(req.parallel_tool_calls.is_none());
    }

    #[test]
    fn test_missing_messages_is_an_error() {
        let err = serde_json::from_value::<ChatCompletionRequest>(json!({"model": "gpt-4o"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_part_kept_verbatim() {
        let content: ChatContent = serde_json::from_value(json!([
            {"type": "text", "text": "hi"},
            {"type": "input_audio", "input_audio": {"data": "..."}}
        ]))
        .unwrap();

        let ChatContent::Parts(parts) = content else {
            panic!("expected parts");
        };
        assert_eq!(
            parts[0],
            ChatContentPart::Known(ContentPart::Text {
                text: "hi".to_string()
            })
        );
        assert!(matches!(parts[1], ChatContentPart::Unknown(_)));
    }

    #[test]
    fn test_null_content_is_raw() {
        let msg: ChatMessage =
            serde_json::from_value(json!({"role": "assistant", "content": null})).unwrap();
        assert_eq!(msg.parsed_content().unwrap(), ChatContent::Raw(Value::Null));
    }

    #[test]
    fn test_message_content_keeps_unmodelled_keys() {
        let part = json!({"type": "text", "text": "hi", "cache_control": {"type": "ephemeral"}});
        let msg: ChatMessage =
            serde_json::from_value(json!({"role": "system", "content": [part.clone()]})).unwrap();

        assert_eq!(msg.content, json!([part]));
        assert_eq!(
            msg.parsed_content().unwrap(),
            ChatContent::Parts(vec![ChatContentPart::Known(ContentPart::Text {
                text: "hi".to_string()
            })])
        );
    }

    #[test]
    fn test_float_max_tokens_is_kept_as_number() {
        let req: ChatCompletionRequest =
            serde_json::from_value(json!({"messages": [], "max_tokens": 100.0})).unwrap();
        assert_eq!(req.max_tokens.and_then(|n| n.as_f64()), Some(100.0));
    }

    #[test]
    fn test_extra_fields_are_collected() {
        let req: ChatCompletionRequest = serde_json::from_value(json!({
            "messages": [],
            "frequency_penalty": 0.5
        }))
        .unwrap();
        assert!(req.extra.contains_key("frequency_penalty"));
        assert!(!req.extra.contains_key("messages"));
    }
}
