//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! and log all API interactions passing through the [`Gemini`](crate::Gemini)
//! client, plus [`StderrLogger`], which writes one JSON line per interaction.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::json;

use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// Implement this trait to capture and record all API interactions,
/// including the outbound request and every streamed chunk.
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log an individual streamed chunk.
    ///
    /// This method is called for each [`GenerateContentResponse`] decoded
    /// from the event stream, in arrival order.
    fn log_stream_event(&self, event: &GenerateContentResponse);

    /// Log the assembled reply of a stream that completed successfully.
    fn log_stream_text(&self, text: &str);
}

/// Writes one JSON object per line to standard error.
///
/// Used by the binaries' `--verbose` flag.
#[derive(Default)]
pub struct StderrLogger {
    lock: Mutex<()>,
}

impl StderrLogger {
    /// Create a new stderr logger.
    pub fn new() -> Self {
        Self::default()
    }

    fn emit(&self, line: serde_json::Value) {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}

impl ClientLogger for StderrLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        self.emit(json!({"kind": "request", "model": model, "request": request}));
    }

    fn log_stream_event(&self, event: &GenerateContentResponse) {
        self.emit(json!({"kind": "stream_event", "event": event}));
    }

    fn log_stream_text(&self, text: &str) {
        self.emit(json!({"kind": "stream_text", "bytes": text.len()}));
    }
}
