//! Terminal messenger for chatting with Gemini.
//!
//! Messages are drawn as timestamped bubbles and the conversation is kept for
//! the life of the process.  Replies are grounded with web search.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! gemchat
//!
//! # Use a faster model and plain output
//! gemchat --model gemini-2.5-flash --no-color
//! ```
//!
//! # Commands
//!
//! - `/help` - Show available commands
//! - `/clear` - Clear the conversation
//! - `/stats` - Show message counts
//! - `/model <name>` - Change the model
//! - `/quit` - Exit the application
//!
//! Anything else, `bye` included, is sent to the model.

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use gemchat::Model;
use gemchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, Submission,
    help_text, parse_command,
};

const TITLE: &str = "🤖 Gemini AI Messenger";
const SUBTITLE: &str = "Chat with Google's Gemini AI in your terminal";
const MISSING_KEY: &str =
    "GEMINI_API_KEY not found! Please set it in the environment and restart.";
const ABOUT: &str = "🚀 Powered by Google Gemini AI with advanced web search capabilities.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut session = ChatSession::new(&config);
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    renderer.print_banner(TITLE, SUBTITLE);
    if !session.api_available() {
        renderer.print_status(false, MISSING_KEY);
        std::process::exit(1);
    }
    renderer.print_status(true, "Connected to Gemini AI");
    renderer.print_info(&format!("{ABOUT}\nType /help for commands, /quit to exit\n"));

    let mut rl = DefaultEditor::new()?;
    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        if let Some(cmd) = parse_command(&line) {
            match cmd {
                ChatCommand::Quit => {
                    println!("Goodbye!");
                    break;
                }
                ChatCommand::Clear => {
                    session.clear();
                    renderer.print_info("Chat cleared.");
                }
                ChatCommand::Stats => {
                    renderer.print_stats(&session.stats());
                }
                ChatCommand::Help => {
                    renderer.print_info(help_text());
                }
                ChatCommand::Model(name) => {
                    let model = name
                        .parse()
                        .unwrap_or_else(|_| Model::Custom(name.clone()));
                    session.set_model(model);
                    renderer.print_info(&format!("Model changed to: {name}"));
                }
                ChatCommand::Invalid(message) => {
                    renderer.print_error(&message);
                }
            }
            continue;
        }

        let before = session.transcript().len();
        match session.submit(&line, &mut renderer).await {
            Ok(Submission::Ignored) => {}
            Ok(Submission::Answered) | Ok(Submission::Failed(_)) => {
                for message in &session.transcript().messages()[before..] {
                    renderer.print_message(message);
                }
            }
            Err(err) => renderer.print_error(err.message()),
        }
    }

    Ok(())
}
