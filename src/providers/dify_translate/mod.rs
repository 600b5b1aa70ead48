//! Pure mapping between the OpenAI chat-completion schema and Dify's
//! `chat-messages` schema.
//!
//! Dify takes a single query string, so the message history is flattened into
//! a transcript. The exact line format and the trailing instruction are read by
//! the backend model and must stay stable.

use crate::core::types::{
    AssistantMessage, BackendRequest, BackendResponse, CHAT_COMPLETION_OBJECT,
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice, FinishReason,
    MessageRole, ResponseMode,
};

const TRANSCRIPT_HEADER: &str = "Chat history:";
const TRANSCRIPT_INSTRUCTION: &str = "Please respond to the last message.";

/// Builds the blocking Dify request for `request`.
///
/// Only the message history travels to the backend. `temperature`, `max_tokens`,
/// `stop`, `stream` and the other generation parameters are dropped here.
pub fn to_backend_request(
    request: &ChatCompletionRequest,
    application_identity: &str,
) -> BackendRequest {
    BackendRequest {
        query: render_transcript(&request.messages),
        inputs: serde_json::Map::new(),
        user: application_identity.to_string(),
        conversation_id: None,
        response_mode: ResponseMode::Blocking,
    }
}

/// Maps a Dify answer back into a single-choice chat completion.
pub fn to_outbound_response(
    response: &BackendResponse,
    requested_model: &str,
) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: response.id.clone(),
        object: CHAT_COMPLETION_OBJECT.to_string(),
        created: millis_to_secs(response.created_at),
        model: requested_model.to_string(),
        choices: vec![Choice {
            index: 0,
            message: AssistantMessage {
                role: MessageRole::Assistant,
                content: Some(response.answer.clone()),
            },
            finish_reason: Some(FinishReason::Stop),
        }],
        usage: response.metadata.usage,
    }
}

pub(crate) fn render_transcript(messages: &[ChatMessage]) -> String {
    let history = messages
        .iter()
        .map(|message| format!("{}: {}", message.role.as_str(), message.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{TRANSCRIPT_HEADER}\n{history}\n\n{TRANSCRIPT_INSTRUCTION}")
}

/// Truncates, never rounds.
fn millis_to_secs(millis: u64) -> u64 {
    millis / 1000
}
