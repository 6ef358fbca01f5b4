//! Output rendering for the chat shells.
//!
//! This module provides the [`Renderer`] trait and a plain-text
//! implementation that draws each message as a labelled, timestamped bubble,
//! optionally styled with ANSI escape codes.

use std::io::{self, Stdout, Write};

use crate::transcript::{Message, Role, TranscriptStats};

/// ANSI escape code for bold text (used for bubble labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for timestamps and the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for the thinking indicator).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for blue text (user bubbles).
const ANSI_BLUE: &str = "\x1b[34m";

/// ANSI escape code for red text (assistant bubbles and errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for green text (status banner).
const ANSI_GREEN: &str = "\x1b[32m";

/// Return to column zero and erase the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text of the thinking indicator.
pub const THINKING_TEXT: &str = "Gemini is thinking...";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Capturing output in tests
pub trait Renderer: Send {
    /// Print the application heading.
    fn print_banner(&mut self, title: &str, subtitle: &str);

    /// Print the connection status line.
    ///
    /// `connected` selects between the success and the configuration-error style.
    fn print_status(&mut self, connected: bool, text: &str);

    /// Print one transcript entry as a bubble.
    fn print_message(&mut self, message: &Message);

    /// Show the indicator displayed while a reply is being generated.
    fn start_thinking(&mut self);

    /// Remove the thinking indicator.
    fn finish_thinking(&mut self);

    /// Print the derived message counters.
    fn print_stats(&mut self, stats: &TranscriptStats);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer<W: Write + Send = Stdout> {
    out: W,
    use_color: bool,
    thinking: bool,
}

impl PlainTextRenderer<Stdout> {
    /// Creates a new PlainTextRenderer on stdout with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer on stdout with the specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self::with_writer(io::stdout(), use_color)
    }
}

impl Default for PlainTextRenderer<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> PlainTextRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn with_writer(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            thinking: false,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Consumes the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Writes and flushes; a closed terminal is not worth failing a session over.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl<W: Write + Send> Renderer for PlainTextRenderer<W> {
    fn print_banner(&mut self, title: &str, subtitle: &str) {
        let title = self.styled(ANSI_BOLD, title);
        let subtitle = self.styled(ANSI_ITALIC, subtitle);
        self.emit(&format!("{title}\n{subtitle}\n\n"));
    }

    fn print_status(&mut self, connected: bool, text: &str) {
        let (style, marker) = if connected {
            (ANSI_GREEN, "🟢")
        } else {
            (ANSI_RED, "⚠️")
        };
        let line = self.styled(style, &format!("{marker} {text}"));
        self.emit(&format!("{line}\n"));
    }

    fn print_message(&mut self, message: &Message) {
        let color = match message.role() {
            Role::User => ANSI_BLUE,
            Role::Assistant => ANSI_RED,
        };
        let label = if self.use_color {
            format!("{ANSI_BOLD}{color}{}{ANSI_RESET}", message.role().label())
        } else {
            message.role().label().to_string()
        };
        let time = self.styled(ANSI_DIM, &message.time_label());
        let mut bubble = format!("{label} {time}\n");
        for line in message.content().lines() {
            bubble.push_str("  ");
            bubble.push_str(line);
            bubble.push('\n');
        }
        if message.content().is_empty() {
            bubble.push_str("  \n");
        }
        bubble.push('\n');
        self.emit(&bubble);
    }

    fn start_thinking(&mut self) {
        if self.thinking {
            return;
        }
        self.thinking = true;
        let indicator = if self.use_color {
            format!("{ANSI_DIM}{ANSI_ITALIC}🤖 {THINKING_TEXT}{ANSI_RESET}")
        } else {
            format!("🤖 {THINKING_TEXT}")
        };
        self.emit(&indicator);
    }

    fn finish_thinking(&mut self) {
        if !self.thinking {
            return;
        }
        self.thinking = false;
        if self.use_color {
            self.emit(ANSI_CLEAR_LINE);
        } else {
            self.emit("\n");
        }
    }

    fn print_stats(&mut self, stats: &TranscriptStats) {
        self.emit(&format!(
            "Chat Stats\n  Total Messages: {}\n  Your Messages: {}\n  Bot Responses: {}\n",
            stats.total, stats.user, stats.assistant
        ));
    }

    fn print_error(&mut self, error: &str) {
        self.finish_thinking();
        let line = self.styled(ANSI_RED, &format!("Error: {error}"));
        self.emit(&format!("{line}\n"));
    }

    fn print_info(&mut self, info: &str) {
        self.emit(&format!("{info}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn capture(f: impl FnOnce(&mut PlainTextRenderer<Vec<u8>>)) -> String {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), false);
        f(&mut renderer);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color());
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color());
    }

    #[test]
    fn bubble_layout() {
        let message = Message::with_timestamp(
            Role::Assistant,
            "line one\nline two",
            datetime!(2025-01-01 14:30 UTC),
        );
        let out = capture(|r| r.print_message(&message));
        assert_eq!(out, "Gemini 14:30\n  line one\n  line two\n\n");
    }

    #[test]
    fn colored_bubbles_differ_by_role() {
        let mut renderer = PlainTextRenderer::with_writer(Vec::new(), true);
        renderer.print_message(&Message::user("hi"));
        renderer.print_message(&Message::assistant("hello"));
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains(&format!("{ANSI_BLUE}You")));
        assert!(out.contains(&format!("{ANSI_RED}Gemini")));
    }

    #[test]
    fn thinking_indicator_is_balanced() {
        let out = capture(|r| {
            r.start_thinking();
            r.start_thinking();
            r.finish_thinking();
            r.finish_thinking();
        });
        assert_eq!(out, format!("🤖 {THINKING_TEXT}\n"));
    }

    #[test]
    fn stats_layout() {
        let out = capture(|r| {
            r.print_stats(&TranscriptStats {
                total: 3,
                user: 2,
                assistant: 1,
            })
        });
        assert!(out.contains("Total Messages: 3"));
        assert!(out.contains("Your Messages: 2"));
        assert!(out.contains("Bot Responses: 1"));
    }
}
