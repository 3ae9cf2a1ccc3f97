//! Translate `OpenAI` Chat Completions requests into Anthropic Messages requests.
//!
//! The translated request is built step by step: start from a request holding only
//! the always-present fields (`model`, `max_tokens`, `messages`), then set each
//! optional field if its source counterpart is present and well-typed. The system
//! message is hoisted to the top-level `system` field and image parts are embedded
//! from `data:` URIs.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Number, Value};
use tracing::{debug, warn};

use super::anthropic_types::{
    ContentBlock, Message, MessageContent, MessagesRequest, Metadata, Tool, ToolChoice,
};
use super::data_uri;
use super::lenient;
use super::openai_types::{
    ChatCompletionRequest, ChatContent, ChatContentPart, ChatMessage, ChatMetadata, ChatTool,
    ChatToolChoice, ContentPart,
};
use crate::config::{TranslateOptions, UnsupportedImages};
use crate::error::{BridgeError, Result};

const SYSTEM_ROLE: &str = "system";

/// Translate a raw JSON request body.
///
/// Fails if `messages` is missing or not a list; every other field is best-effort.
pub fn openai_json_to_anthropic(
    body: &Value,
    options: &TranslateOptions,
) -> Result<MessagesRequest> {
    match body.get("messages") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err(BridgeError::translation("`messages` must be a list")),
        None => return Err(BridgeError::translation("request has no `messages`")),
    }

    let req = ChatCompletionRequest::deserialize(body)?;
    openai_to_anthropic(&req, options)
}

/// Translate an `OpenAI` Chat Completions request into an Anthropic Messages request.
/// Pure function: takes the request + options, returns the translated request.
pub fn openai_to_anthropic(
    req: &ChatCompletionRequest,
    options: &TranslateOptions,
) -> Result<MessagesRequest> {
    let max_tokens = resolve_max_tokens(req.max_tokens.as_ref(), options.default_max_tokens);
    let model = target_model(req.model.as_deref(), &options.models);
    let mut out = MessagesRequest::new(model, max_tokens);

    out.system = extract_system(&req.messages);
    out.messages = translate_messages(&req.messages, options.unsupported_images)?;
    out.metadata = translate_metadata(req.metadata.as_ref());
    out.stream = req.stream;
    out.temperature = req.temperature.clone();
    out.top_p = req.top_p.clone();
    out.stop_sequences = req.stop.as_ref().map(|s| s.to_vec());
    out.tool_choice = translate_tool_choice(req.tool_choice.as_ref(), req.parallel_tool_calls);
    out.tools = translate_tools(req.tools.as_deref());

    if !req.extra.is_empty() {
        let mut dropped: Vec<&str> = req.extra.keys().map(String::as_str).collect();
        dropped.sort_unstable();
        debug!(fields = ?dropped, "Dropping fields with no Anthropic equivalent");
    }

    Ok(out)
}

/// Integral values (`100` or `100.0`) are kept; anything else falls back to the default.
fn resolve_max_tokens(max_tokens: Option<&Number>, default: u64) -> u64 {
    let Some(n) = max_tokens else {
        return default;
    };

    let integral = n.as_u64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    });

    integral.unwrap_or_else(|| {
        debug!(max_tokens = %n, default, "max_tokens is not a token count, using default");
        default
    })
}

fn target_model(model: Option<&str>, model_map: &HashMap<String, String>) -> Option<String> {
    model.map(|m| model_map.get(m).cloned().unwrap_or_else(|| m.to_string()))
}

/// Content of the first `system` message, exactly as sent.
fn extract_system(messages: &[ChatMessage]) -> Option<Value> {
    messages
        .iter()
        .find(|m| m.role == SYSTEM_ROLE)
        .map(|m| m.content.clone())
}

fn translate_messages(
    messages: &[ChatMessage],
    policy: UnsupportedImages,
) -> Result<Vec<Message>> {
    messages
        .iter()
        .filter(|m| m.role != SYSTEM_ROLE)
        .map(|m| {
            Ok(Message {
                role: m.role.clone(),
                content: translate_content(&m.parsed_content()?, policy)?,
            })
        })
        .collect()
}

fn translate_content(content: &ChatContent, policy: UnsupportedImages) -> Result<MessageContent> {
    match content {
        ChatContent::Text(text) => Ok(MessageContent::Text(text.clone())),
        ChatContent::Parts(parts) => {
            let mut blocks = Vec::with_capacity(parts.len());
            for part in parts {
                if let Some(block) = translate_part(part, policy)? {
                    blocks.push(block);
                }
            }
            Ok(MessageContent::Blocks(blocks))
        }
        ChatContent::Raw(value) => Ok(MessageContent::Raw(value.clone())),
    }
}

/// `Ok(None)` means the part was dropped under [`UnsupportedImages::Drop`].
fn translate_part(
    part: &ChatContentPart,
    policy: UnsupportedImages,
) -> Result<Option<ContentBlock>> {
    match part {
        ChatContentPart::Known(ContentPart::Text { text }) => {
            Ok(Some(ContentBlock::Text { text: text.clone() }))
        }
        ChatContentPart::Known(ContentPart::ImageUrl { image_url }) => {
            match data_uri::decode(&image_url.url) {
                Some(source) => Ok(Some(ContentBlock::Image { source })),
                None => match policy {
                    UnsupportedImages::Reject => {
                        Err(BridgeError::unsupported_image(truncate(&image_url.url, 120)))
                    }
                    UnsupportedImages::Drop => {
                        warn!(
                            url = %truncate(&image_url.url, 120),
                            "Dropping image that is not a data: URI"
                        );
                        Ok(None)
                    }
                },
            }
        }
        ChatContentPart::Unknown(value) => {
            let kind = value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("untyped")
                .to_string();
            match policy {
                UnsupportedImages::Reject => Err(BridgeError::unsupported_content(kind)),
                UnsupportedImages::Drop => {
                    warn!(kind = %kind, "Dropping unsupported content part");
                    Ok(None)
                }
            }
        }
    }
}

fn translate_metadata(metadata: Option<&ChatMetadata>) -> Option<Metadata> {
    let user_id = metadata?.user_id.as_ref()?;
    lenient::is_truthy(user_id).then(|| Metadata {
        user_id: user_id.clone(),
    })
}

fn translate_tool_choice(
    choice: Option<&ChatToolChoice>,
    parallel_tool_calls: Option<bool>,
) -> Option<ToolChoice> {
    let disable_parallel_tool_use = parallel_tool_calls.map(|p| !p);

    let translated = match choice? {
        ChatToolChoice::Mode(mode) => match mode.as_str() {
            "auto" => ToolChoice::Auto {
                disable_parallel_tool_use,
            },
            "required" => ToolChoice::Any {
                disable_parallel_tool_use,
            },
            "none" => return None,
            other => {
                debug!(tool_choice = other, "Ignoring unrecognized tool_choice");
                return None;
            }
        },
        ChatToolChoice::Named(named) => {
            let Some(name) = named.function.as_ref().and_then(|f| f.name.clone()) else {
                debug!("Ignoring tool_choice without a function name");
                return None;
            };
            ToolChoice::Tool {
                name,
                disable_parallel_tool_use,
            }
        }
    };

    debug!(tool_choice = translated.type_name(), "Translated tool_choice");
    Some(translated)
}

fn translate_tools(tools: Option<&[ChatTool]>) -> Option<Vec<Tool>> {
    let tools = tools.filter(|t| !t.is_empty())?;

    Some(
        tools
            .iter()
            .map(|t| Tool {
                name: t.function.name.clone(),
                description: t.function.description.clone(),
                input_schema: t
                    .function
                    .parameters
                    .clone()
                    .unwrap_or_else(empty_object_schema),
            })
            .collect(),
    )
}

fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
