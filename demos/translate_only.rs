//! Demonstrate the translation layer on a typical multimodal tool-calling request.
//!
//! Usage:
//!   `cargo run --example translate_only`

use anthropic_bridge::{openai_json_to_anthropic, TranslateOptions};
use serde_json::json;

fn main() {
    // An OpenAI Chat Completions request body
    let openai_req = json!({
        "model": "gpt-4o",
        "max_tokens": 512,
        "temperature": 0.2,
        "stop": "END",
        "tool_choice": "required",
        "parallel_tool_calls": false,
        "messages": [
            {"role": "system", "content": "You are a weather assistant. Be concise."},
            {
                "role": "user",
                "content": [
                    {"type": "text", "text": "Where was this photo taken, and what's the weather there?"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,iVBORw0KGgo="}}
                ]
            }
        ],
        "tools": [{
            "type": "function",
            "function": {
                "name": "get_weather",
                "description": "Get current weather for a city",
                "parameters": {
                    "type": "object",
                    "properties": {"city": {"type": "string"}},
                    "required": ["city"]
                }
            }
        }]
    });

    println!("=== OpenAI request ===");
    println!("{}", serde_json::to_string_pretty(&openai_req).unwrap());

    let anthropic_req = openai_json_to_anthropic(&openai_req, &TranslateOptions::default()).unwrap();

    println!();
    println!("=== Translated request (Anthropic format) ===");
    println!("{}", serde_json::to_string_pretty(&anthropic_req).unwrap());

    // External image URLs cannot be embedded
    let external = json!({
        "messages": [{
            "role": "user",
            "content": [{"type": "image_url", "image_url": {"url": "https://example.com/cat.png"}}]
        }]
    });

    println!();
    match openai_json_to_anthropic(&external, &TranslateOptions::default()) {
        Ok(_) => println!("External image unexpectedly translated"),
        Err(e) => println!("External image rejected: {e}"),
    }
}
