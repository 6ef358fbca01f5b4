//! Single-turn, search-grounded reply generation.
//!
//! [`ResponseGenerator::generate`] sends one prompt, lets the model search the
//! web as it sees fit, and folds the streamed fragments of the reply into one
//! string.  Nothing is remembered between calls: every call carries exactly one
//! user turn, so a generator can be shared freely between tasks.

use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{Stream, StreamExt};

use crate::client::Gemini;
use crate::client_logger::ClientLogger;
use crate::credential::Credential;
use crate::error::Result;
use crate::observability::{
    GENERATOR_CALLS, GENERATOR_CONFIGURATION_ERRORS, GENERATOR_DURATION, GENERATOR_FRAGMENTS,
    GENERATOR_UPSTREAM_ERRORS, STREAM_TTFB,
};
use crate::types::{GenerateContentRequest, GenerationConfig, Model, Tool};

/// A lazy, finite, non-restartable sequence of reply fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Opens the streaming call to the model.
///
/// This is the seam between reply assembly and the network.  Implementations
/// perform exactly one outbound call per `open`.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` for `model` and return the fragments of the reply.
    async fn open(
        &self,
        credential: &Credential,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<FragmentStream>;
}

/// [`Transport`] over HTTPS to the Gemini API.
///
/// A fresh [`Gemini`] client is built for each call from the credential that
/// call was given.
#[derive(Clone, Default)]
pub struct HttpTransport {
    base_url: Option<String>,
    timeout: Option<Duration>,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl HttpTransport {
    /// Create a transport for the public endpoint with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Override the transport timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Log every request and streamed chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn open(
        &self,
        credential: &Credential,
        model: &Model,
        request: GenerateContentRequest,
    ) -> Result<FragmentStream> {
        let mut client =
            Gemini::with_options(Some(credential.clone()), self.base_url.clone(), self.timeout)?;
        if let Some(logger) = &self.logger {
            client = client.with_logger(Arc::clone(logger));
        }
        let chunks = client.stream_generate_content(model, &request).await?;
        Ok(Box::pin(chunks.map(|chunk| chunk.map(|chunk| chunk.text()))))
    }
}

/// Builds single-turn requests and assembles their streamed replies.
pub struct ResponseGenerator<T: Transport = HttpTransport> {
    transport: T,
    model: Model,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl ResponseGenerator<HttpTransport> {
    /// Create a generator that talks to the Gemini API.
    pub fn new(model: Model) -> Self {
        Self::with_transport(HttpTransport::new(), model)
    }
}

impl<T: Transport> ResponseGenerator<T> {
    /// Create a generator over a custom transport.
    pub fn with_transport(transport: T, model: Model) -> Self {
        Self {
            transport,
            model,
            logger: None,
        }
    }

    /// Log each assembled reply.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The model replies are requested from.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Change the model used for subsequent calls.
    pub fn set_model(&mut self, model: Model) {
        self.model = model;
    }

    /// The transport this generator opens calls with.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The request sent for `prompt`.
    ///
    /// One user turn holding the prompt verbatim, web search enabled, dynamic
    /// reasoning, plain-text output.  No system instruction.
    pub fn request_for(&self, prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest::single_turn(prompt)
            .with_tool(Tool::google_search())
            .with_generation_config(GenerationConfig::plain_text_dynamic())
    }

    /// Generate the model's reply to `prompt`.
    ///
    /// Fails with a configuration error, before any network activity, when
    /// `credential` is absent or empty.  Fails with an upstream error when the
    /// call cannot be made or the stream breaks; text received before the break
    /// is discarded.  A stream with no fragments yields the empty string.
    ///
    /// ```
    /// # use gemchat::{KnownModel, Model, ResponseGenerator};
    /// # tokio_test::block_on(async {
    /// let generator = ResponseGenerator::new(Model::Known(KnownModel::Gemini25Pro));
    /// let err = generator.generate("What is 2+2?", None).await.unwrap_err();
    /// assert!(err.is_configuration());
    /// # });
    /// ```
    pub async fn generate(&self, prompt: &str, credential: Option<&str>) -> Result<String> {
        GENERATOR_CALLS.click();
        let credential = match Credential::require(credential) {
            Ok(credential) => credential,
            Err(err) => {
                GENERATOR_CONFIGURATION_ERRORS.click();
                return Err(err);
            }
        };

        let start = Instant::now();
        let result = self.stream_and_collect(prompt, &credential, start).await;
        GENERATOR_DURATION.add(start.elapsed().as_secs_f64());
        match result {
            Ok(reply) => {
                if let Some(logger) = &self.logger {
                    logger.log_stream_text(&reply);
                }
                Ok(reply)
            }
            Err(err) => {
                if err.is_configuration() {
                    GENERATOR_CONFIGURATION_ERRORS.click();
                } else {
                    GENERATOR_UPSTREAM_ERRORS.click();
                }
                Err(err)
            }
        }
    }

    async fn stream_and_collect(
        &self,
        prompt: &str,
        credential: &Credential,
        start: Instant,
    ) -> Result<String> {
        let request = self.request_for(prompt);
        let mut fragments = self.transport.open(credential, &self.model, request).await?;
        let mut reply = String::new();
        let mut first = true;
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            if first {
                STREAM_TTFB.add(start.elapsed().as_secs_f64());
                first = false;
            }
            GENERATOR_FRAGMENTS.click();
            reply.push_str(&fragment);
        }
        Ok(reply)
    }
}
