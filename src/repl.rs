//! Line classification for the terminal REPL.
//!
//! The REPL has no slash commands.  A line is an exit word, blank, or a prompt
//! for the model.

/// Words that end the REPL, matched case-insensitively after trimming.
pub const EXIT_KEYWORDS: [&str; 3] = ["quit", "exit", "bye"];

/// First line printed on start.
pub const BANNER: &str = "🤖 Gemini AI Chatbot - CLI Mode";

/// Printed under the banner.
pub const EXIT_HINT: &str = "Type 'quit', 'exit', or 'bye' to end the conversation.";

/// The input prompt.
pub const PROMPT: &str = "You: ";

/// Printed before each call.
pub const THINKING: &str = "🤖 Thinking...";

/// Printed when the user leaves with an exit word.
pub const GOODBYE: &str = "👋 Goodbye! Thanks for chatting!";

/// Printed when the user leaves with Ctrl+C or end of input.
pub const INTERRUPTED: &str = "👋 Chat interrupted. Goodbye!";

/// Printed for a blank line.
pub const EMPTY_PROMPT: &str = "Please enter a message.";

/// What to do with one line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Leave the REPL.
    Exit,

    /// Nothing but whitespace.
    Empty,

    /// Send the trimmed text to the model.
    Prompt(&'a str),
}

/// Classify one line read at the `You: ` prompt.
pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Line::Empty
    } else if EXIT_KEYWORDS
        .iter()
        .any(|word| trimmed.eq_ignore_ascii_case(word))
    {
        Line::Exit
    } else {
        Line::Prompt(trimmed)
    }
}
