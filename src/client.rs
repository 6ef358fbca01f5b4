use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::Stream;
use futures::stream::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use url::Url;

use crate::client_logger::ClientLogger;
use crate::credential::Credential;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, Model};

/// Default endpoint of the Gemini API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Default transport timeout for a whole request, stream included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini API.
#[derive(Clone)]
pub struct Gemini {
    credential: Credential,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The credential can be provided directly or read from the
    /// `GEMINI_API_KEY` environment variable.
    pub fn new(credential: Option<Credential>) -> Result<Self> {
        Self::with_options(credential, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        credential: Option<Credential>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let credential = match credential {
            Some(credential) => credential,
            None => Credential::load()?,
        };

        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {e}"),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            credential,
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request and streamed chunk.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The transport timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );
        let key = HeaderValue::from_str(self.credential.expose()).map_err(|_| {
            Error::configuration("GEMINI_API_KEY contains characters not allowed in a header")
        })?;
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// The URL of `method` on `model`, e.g. `models/gemini-2.5-pro:streamGenerateContent`.
    fn endpoint(&self, model: &Model, method: &str) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("models/{}:{method}", model.as_str()))?)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("request failed");

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {e}"),
                    Some(Box::new(e)),
                );
            }
        };

        // Prefer the structured envelope; some proxies answer with bare text.
        match serde_json::from_str::<ApiErrorResponse>(&error_body) {
            Ok(envelope) => envelope.into_error(status_code, reason),
            Err(_) if error_body.trim().is_empty() => Error::api(status_code, None, reason),
            Err(_) => Error::api(status_code, None, error_body.trim()),
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {e}"),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {e}"), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {e}"), Some(Box::new(e)))
        }
    }

    /// Generate content and receive the reply as a stream of chunks.
    ///
    /// Chunks arrive in the order the server produced them.  The stream yields
    /// an error in place if the connection breaks or the server reports an
    /// error mid-stream.
    pub async fn stream_generate_content(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>> {
        let mut url = self.endpoint(model, "streamGenerateContent")?;
        url.set_query(Some("alt=sse"));
        let headers = self.default_headers()?;

        if let Some(logger) = &self.logger {
            logger.log_request(model, request);
        }

        CLIENT_REQUESTS.click();
        let start = Instant::now();
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                CLIENT_REQUEST_ERRORS.click();
                self.map_send_error(e)
            })?;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return Err(Self::process_error_response(response).await);
        }

        let logger = self.logger.clone();
        let events = process_sse(response.bytes_stream()).inspect(move |event| {
            if let (Some(logger), Ok(event)) = (&logger, event) {
                logger.log_stream_event(event);
            }
        });
        Ok(Box::pin(events))
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("credential", &self.credential)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

/// Parse a base URL, making sure relative joins append to its path.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    fn credential() -> Option<Credential> {
        Some(Credential::new("test-key").unwrap())
    }

    #[test]
    fn client_creation() {
        let client = Gemini::new(credential()).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

        let client = Gemini::with_options(
            credential(),
            Some("http://127.0.0.1:8080/v1beta".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/v1beta/");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn endpoint_resolution() {
        let client = Gemini::new(credential()).unwrap();
        let url = client
            .endpoint(
                &Model::Known(KnownModel::Gemini25Pro),
                "streamGenerateContent",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-pro:streamGenerateContent"
        );
    }

    #[test]
    fn invalid_base_url() {
        let err = Gemini::with_options(credential(), Some("not a url".to_string()), None)
            .unwrap_err();
        assert!(err.message().contains("URL parse error"));
    }

    #[test]
    fn header_carries_key() {
        let client = Gemini::new(credential()).unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
    }

    #[test]
    fn unprintable_key_is_configuration_error() {
        let client = Gemini::new(Some(Credential::new("bad\nkey").unwrap())).unwrap();
        assert!(client.default_headers().unwrap_err().is_configuration());
    }

    #[test]
    fn debug_hides_key() {
        let client = Gemini::new(credential()).unwrap();
        assert!(!format!("{client:?}").contains("test-key"));
    }
}
