//! Minimal terminal REPL for Gemini.
//!
//! Each line is sent on its own, with web search enabled, and the full reply
//! is printed once it has streamed in.  There are no slash commands.
//!
//! # Usage
//!
//! ```bash
//! export GEMINI_API_KEY=...
//! gemchat-cli
//!
//! # Log requests and stream events to stderr
//! gemchat-cli --verbose
//! ```
//!
//! Type `quit`, `exit`, or `bye` to leave.  Ctrl+C leaves at any time,
//! including while a reply is being generated.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::Notify;

use gemchat::Credential;
use gemchat::chat::{ChatArgs, ChatConfig};
use gemchat::repl::{
    BANNER, EMPTY_PROMPT, EXIT_HINT, GOODBYE, INTERRUPTED, Line, PROMPT, THINKING, classify,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("gemchat-cli [OPTIONS]");
    let config = ChatConfig::from(args);
    let generator = config.generator();
    let credential = Credential::from_env();
    let mut rl = DefaultEditor::new()?;

    // Ctrl+C while a call is in flight; rustyline handles it at the prompt.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupts = Arc::new(Notify::new());
    let (flag, notify) = (interrupted.clone(), interrupts.clone());
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::Relaxed);
        notify.notify_waiters();
    })?;

    println!("{BANNER}");
    println!("{EXIT_HINT}\n");

    loop {
        interrupted.store(false, Ordering::Relaxed);

        match rl.readline(PROMPT) {
            Ok(line) => match classify(&line) {
                Line::Exit => {
                    println!("{GOODBYE}");
                    break;
                }
                Line::Empty => {
                    println!("{EMPTY_PROMPT}");
                }
                Line::Prompt(prompt) => {
                    let _ = rl.add_history_entry(prompt);
                    println!("{THINKING}");

                    let cancelled = interrupts.notified();
                    let key = credential.as_ref().map(Credential::expose);
                    tokio::select! {
                        result = generator.generate(prompt, key) => match result {
                            Ok(reply) => println!("Bot: {reply}\n"),
                            Err(err) => println!("❌ Error: {}\n", err.message()),
                        },
                        _ = cancelled => {
                            println!("\n{INTERRUPTED}");
                            break;
                        }
                    }
                    if interrupted.load(Ordering::Relaxed) {
                        println!("\n{INTERRUPTED}");
                        break;
                    }
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{INTERRUPTED}");
                break;
            }
            Err(err) => {
                println!("❌ Error: {err}\n");
                break;
            }
        }
    }

    Ok(())
}
