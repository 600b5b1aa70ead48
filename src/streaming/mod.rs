//! Synthetic streaming over a completed answer.
//!
//! The backend is always called in blocking mode. When a caller asks for a
//! stream, the finished answer is split on ASCII spaces and replayed as
//! `chat.completion.chunk` events. Concatenating every delta in order yields
//! the answer byte for byte.

use crate::core::error::GatewayError;
use crate::core::types::{
    CHAT_COMPLETION_CHUNK_OBJECT, ChatCompletionChunk, ChatCompletionResponse, ChunkChoice,
    ChunkDelta, FinishReason,
};

pub const SSE_DONE_FRAME: &str = "data: [DONE]\n\n";

pub fn to_stream_chunks(response: &ChatCompletionResponse) -> Vec<ChatCompletionChunk> {
    let content = match response.content() {
        Some(content) if !content.is_empty() => content,
        _ => return Vec::new(),
    };

    // `split(' ')` keeps empty words so leading, trailing and repeated spaces survive.
    let words = content.split(' ').collect::<Vec<_>>();
    let last_index = words.len() - 1;

    words
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let delta = if index == 0 {
                (*word).to_string()
            } else {
                format!(" {word}")
            };

            ChatCompletionChunk {
                id: response.id.clone(),
                object: CHAT_COMPLETION_CHUNK_OBJECT.to_string(),
                created: response.created,
                model: response.model.clone(),
                choices: vec![ChunkChoice {
                    index: 0,
                    delta: ChunkDelta { content: delta },
                    finish_reason: (index == last_index).then_some(FinishReason::Stop),
                }],
            }
        })
        .collect()
}

pub fn encode_sse_frame(chunk: &ChatCompletionChunk) -> Result<String, GatewayError> {
    let payload = serde_json::to_string(chunk).map_err(|error| GatewayError::StreamEncoding {
        message: error.to_string(),
    })?;
    Ok(format!("data: {payload}\n\n"))
}

/// Renders every chunk as an SSE frame and appends the `[DONE]` terminator,
/// which is present even when there are no chunks.
pub fn render_sse_frames(chunks: &[ChatCompletionChunk]) -> Result<Vec<String>, GatewayError> {
    let mut frames = chunks
        .iter()
        .map(encode_sse_frame)
        .collect::<Result<Vec<_>, _>>()?;
    frames.push(SSE_DONE_FRAME.to_string());
    Ok(frames)
}
