//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! With `alt=sse` the Gemini API streams one `data:` event per
//! [`GenerateContentResponse`] chunk.  This module turns the raw byte stream
//! of an HTTP response into a stream of decoded chunks, handling buffering
//! across network reads, CRLF line endings, and in-stream error events.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde_json::Value;

use crate::observability::{STREAM_BYTES, STREAM_ERRORS, STREAM_EVENTS};
use crate::types::{ApiErrorResponse, GenerateContentResponse};
use crate::{Error, Result};

/// Process a stream of bytes into a stream of response chunks.
///
/// The returned stream ends when the byte stream ends.  Errors are yielded in
/// place; consumers that treat a stream as all-or-nothing should stop at the
/// first one.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result
            .map_err(|e| Error::streaming(format!("Error in HTTP stream: {e}"), Some(Box::new(e))))
    });

    let buffer = String::new();
    let pending: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer, pending),
        move |(mut stream, mut buffer, mut pending)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => {
                            record(&event);
                            return Some((event, (stream, buffer, pending)));
                        }
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        STREAM_BYTES.count(bytes.len() as u64);
                        pending.extend_from_slice(&bytes);
                        match decode_prefix(&mut pending) {
                            Ok(text) => {
                                buffer.push_str(&text);
                                if buffer.contains('\r') {
                                    buffer = buffer.replace("\r\n", "\n");
                                }
                            }
                            Err(e) => {
                                STREAM_ERRORS.click();
                                pending.clear();
                                return Some((Err(e), (stream, buffer, pending)));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        STREAM_ERRORS.click();
                        return Some((Err(e), (stream, buffer, pending)));
                    }
                    None => {
                        if !pending.is_empty() {
                            STREAM_ERRORS.click();
                            pending.clear();
                            return Some((
                                Err(Error::encoding(
                                    "Invalid UTF-8 in stream: truncated character",
                                    None,
                                )),
                                (stream, buffer, pending),
                            ));
                        }
                        // End of stream: a final event may lack its trailing blank line.
                        if buffer.trim().is_empty() {
                            return None;
                        }
                        let tail = std::mem::take(&mut buffer);
                        let event = parse_event(tail.trim_end())?;
                        record(&event);
                        return Some((event, (stream, buffer, pending)));
                    }
                }
            }
        },
    )
}

/// Drain the longest valid UTF-8 prefix of `pending`.
///
/// A character split across network reads stays in `pending` until the rest
/// of it arrives.
fn decode_prefix(pending: &mut Vec<u8>) -> Result<String> {
    let valid = match std::str::from_utf8(pending) {
        Ok(_) => pending.len(),
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        Err(e) => {
            return Err(Error::encoding(
                format!("Invalid UTF-8 in stream: {e}"),
                Some(Box::new(e)),
            ));
        }
    };
    let rest = pending.split_off(valid);
    String::from_utf8(std::mem::replace(pending, rest)).map_err(|e| {
        Error::encoding(
            format!("Invalid UTF-8 in stream: {e}"),
            Some(Box::new(e)),
        )
    })
}

fn record(event: &Result<GenerateContentResponse>) {
    match event {
        Ok(_) => STREAM_EVENTS.click(),
        Err(_) => STREAM_ERRORS.click(),
    }
}

/// Extract a complete SSE event from a buffer string.
///
/// Returns `None` when the buffer does not yet hold a full event.  The inner
/// option is `None` for events that carry no data (comments, keep-alives).
#[allow(clippy::type_complexity)]
fn extract_event(buffer: &str) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    // Each event is delimited by a blank line.
    let (event_text, rest) = buffer.split_once("\n\n")?;
    Some((parse_event(event_text), rest.to_string()))
}

/// Parse the text of one event, joining multiple `data:` lines with newlines.
fn parse_event(event_text: &str) -> Option<Result<GenerateContentResponse>> {
    let mut data: Option<String> = None;
    for line in event_text.lines() {
        let Some(value) = line.strip_prefix("data:") else {
            // `event:`, `id:`, `retry:`, and `:` comments carry nothing we use.
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => data = Some(value.to_string()),
        }
    }
    let data = data?;
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(parse_chunk(data))
}

/// Decode one chunk payload, turning error envelopes into errors.
fn parse_chunk(data: &str) -> Result<GenerateContentResponse> {
    let value: Value = serde_json::from_str(data).map_err(|e| {
        Error::serialization(
            format!("Failed to parse event JSON: {e}"),
            Some(Box::new(e)),
        )
    })?;
    if value.get("error").is_some() {
        let envelope: ApiErrorResponse = serde_json::from_value(value)?;
        return Err(envelope.into_error(500, "error event in stream"));
    }
    Ok(serde_json::from_value(value)?)
}
