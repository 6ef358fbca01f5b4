//! Core chat session management.
//!
//! This module provides the [`ChatSession`] struct, which owns the transcript
//! of one conversation and the credential it was started with, and drives the
//! [`ResponseGenerator`] for each submission.

use crate::chat::config::ChatConfig;
use crate::credential::{Credential, missing_credential};
use crate::error::{Error, Result};
use crate::generator::{HttpTransport, ResponseGenerator, Transport};
use crate::observability::{SESSION_IGNORED_SUBMISSIONS, SESSION_SUBMISSIONS};
use crate::render::Renderer;
use crate::transcript::{Message, Transcript, TranscriptStats};
use crate::types::Model;

/// What became of one submission.
#[derive(Debug, Clone)]
pub enum Submission {
    /// The input was blank.  The transcript is unchanged.
    Ignored,

    /// The model replied.  Two entries were appended.
    Answered,

    /// The call failed.  The user entry and an error entry were appended.
    Failed(Error),
}

/// A chat session that manages conversation state.
///
/// The credential is captured once, when the session starts, and never
/// re-read.  The transcript only grows, except through [`ChatSession::clear`].
/// Each submission is sent on its own; earlier turns are shown, not sent.
pub struct ChatSession<T: Transport = HttpTransport> {
    generator: ResponseGenerator<T>,
    credential: Option<Credential>,
    transcript: Transcript,
}

impl ChatSession<HttpTransport> {
    /// Creates a session from configuration, reading the credential from the
    /// environment.
    pub fn new(config: &ChatConfig) -> Self {
        Self::with_generator(config.generator(), Credential::from_env())
    }
}

impl<T: Transport> ChatSession<T> {
    /// Creates a session over an existing generator and credential.
    pub fn with_generator(generator: ResponseGenerator<T>, credential: Option<Credential>) -> Self {
        Self {
            generator,
            credential,
            transcript: Transcript::new(),
        }
    }

    /// Returns true if the session has a credential to call the model with.
    pub fn api_available(&self) -> bool {
        self.credential.is_some()
    }

    /// The error describing why the model cannot be reached, if it cannot.
    pub fn configuration_error(&self) -> Option<Error> {
        match &self.credential {
            Some(_) => None,
            None => Some(missing_credential()),
        }
    }

    /// Submits one line of user input.
    ///
    /// Blank input is ignored.  Otherwise the input is appended verbatim, the
    /// renderer shows its thinking indicator for the duration of the call, and
    /// either the reply or an error entry is appended.  Exactly two entries are
    /// appended per non-blank submission; exit words get no special treatment.
    ///
    /// Fails with a configuration error, without touching the transcript, when
    /// the session has no credential.
    pub async fn submit(&mut self, input: &str, renderer: &mut dyn Renderer) -> Result<Submission> {
        let Some(credential) = &self.credential else {
            return Err(missing_credential());
        };
        if input.trim().is_empty() {
            SESSION_IGNORED_SUBMISSIONS.click();
            return Ok(Submission::Ignored);
        }
        SESSION_SUBMISSIONS.click();

        self.transcript.push(Message::user(input));
        renderer.start_thinking();
        let result = self.generator.generate(input, Some(credential.expose())).await;
        renderer.finish_thinking();

        match result {
            Ok(reply) => {
                self.transcript.push(Message::assistant(reply));
                Ok(Submission::Answered)
            }
            Err(err) => {
                self.transcript.push(Message::error(&err));
                Ok(Submission::Failed(err))
            }
        }
    }

    /// Removes every message from the transcript.
    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Message counts, recomputed from the transcript.
    pub fn stats(&self) -> TranscriptStats {
        self.transcript.stats()
    }

    /// The model replies are requested from.
    pub fn model(&self) -> &Model {
        self.generator.model()
    }

    /// Changes the model used for subsequent submissions.
    pub fn set_model(&mut self, model: Model) {
        self.generator.set_model(model);
    }

    /// The generator this session drives.
    pub fn generator(&self) -> &ResponseGenerator<T> {
        &self.generator
    }

    /// Draws every message, oldest first.
    pub fn render_transcript(&self, renderer: &mut dyn Renderer) {
        for message in &self.transcript {
            renderer.print_message(message);
        }
    }
}
