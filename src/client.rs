//! [`Client`] for the Chat Completions API, the [`Generate`] seam and related
//! types.

use std::{future::Future, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{key, prompt::Message, ChatCompletion, Key, Model, Prompt};

/// Result type for the client. See also [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Produces article text from a prompt. [`Client`] is the real
/// implementation; tests and demos can substitute their own.
pub trait Generate {
    /// Send `prompt` as a single user message and return the trimmed text of
    /// the first choice. One failure is final; there is no retry.
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Client for an OpenAI compatible Chat Completions API.
///
/// See [`Self::new`] for creating a new client and [`Self::complete`] and
/// [`Generate::generate`] to get started.
#[derive(Clone)]
pub struct Client {
    /// Inner [`reqwest::Client`]. It is **not necessary** to set the API key
    /// on a custom client.
    ///
    /// ## Note:
    /// - The API [`Key`] is **set automatically on requests**.
    /// - **Do not use** `client.inner.post` directly. Use [`Self::post`]
    ///   instead to safely set the API [`Key`] as sensitive.
    pub inner: reqwest::Client,
    /// API [`Key`]. It can be set to a new [`Key`] to change the key used for
    /// requests.
    pub key: Arc<Key>,
    /// [`Model`] used by [`Generate::generate`].
    pub model: Model,
    /// Base URL of the API, without the `/chat/completions` suffix.
    pub base_url: String,
    timeout: Option<Duration>,
}

impl Client {
    /// Our user agent.
    pub const USER_AGENT: &'static str =
        concat!(env!("CARGO_PKG_NAME"), "-", env!("CARGO_PKG_VERSION"));
    /// Default base URL for the API.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    /// Create a new client from any type that can be converted into a [`Key`].
    ///
    /// ## Note:
    /// - It's safest to use a [`String`]. It will be zeroized after
    ///   conversion.
    pub fn new<K>(key: K) -> Result<Self>
    where
        K: TryInto<Key, Error = key::InvalidKey>,
    {
        Self::from_key(key.try_into()?)
    }

    /// Create a new client with the given key, the default [`Model`], the
    /// default base URL and no timeout.
    pub fn from_key(key: Key) -> Result<Self> {
        #[cfg(feature = "log")]
        {
            log::info!(concat!(
                "Creating ",
                env!("CARGO_PKG_NAME"),
                " client..."
            ));
            log::debug!(concat!("Crate version: ", env!("CARGO_PKG_VERSION")));
        }

        Ok(Self {
            inner: Self::build_inner(None)?,
            key: Arc::new(key),
            model: Model::default(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: None,
        })
    }

    fn build_inner(
        timeout: Option<Duration>,
    ) -> reqwest::Result<reqwest::Client> {
        // Headers for all requests.
        let mut headers = reqwest::header::HeaderMap::new();

        // Content type needs to be set to JSON.
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(Self::USER_AGENT);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        builder.build()
    }

    /// Set the [`Model`] used by [`Generate::generate`].
    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the base URL. Useful for testing or for another compatible
    /// endpoint. A trailing `/` is ignored.
    pub fn base_url<S>(mut self, base_url: S) -> Self
    where
        S: Into<String>,
    {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the total request timeout. [`None`] (the default) waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Result<Self> {
        #[cfg(feature = "log")]
        log::debug!("Request timeout: {:?}", timeout);

        self.inner = Self::build_inner(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// The configured request timeout.
    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// URL of the chat completions endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Create a [`reqwest::RequestBuilder`] with the API key set as a sensitive
    /// header value.
    pub fn request_raw<U>(
        &self,
        method: reqwest::Method,
        url: U,
    ) -> Result<reqwest::RequestBuilder>
    where
        U: reqwest::IntoUrl,
    {
        #[cfg(feature = "log")]
        {
            log::debug!("{} request to {}", method, url.as_str());
        }

        let mut val =
            reqwest::header::HeaderValue::from_str(&self.key.bearer())?;
        val.set_sensitive(true);

        Ok(self
            .inner
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, val))
    }

    /// Send a POST request with the API key set as a sensitive header value.
    pub async fn post<U, B>(
        &self,
        url: U,
        body: B,
    ) -> Result<reqwest::Response>
    where
        U: reqwest::IntoUrl,
        B: serde::Serialize,
    {
        let req = self.request_raw(reqwest::Method::POST, url)?;

        #[cfg(feature = "log")]
        {
            if let Ok(json) = serde_json::to_string_pretty(&body) {
                log::debug!("Sending body:\n{}", json);
            } else {
                log::warn!("Could not serialize body. Request will fail.");
            }
        }

        Ok(req.json(&body).send().await?)
    }

    /// Post a [`Prompt`] (or anything that serializes like one) to the chat
    /// completions endpoint.
    ///
    /// See also [`Self::complete_custom`] for a custom URL.
    pub async fn complete<P>(&self, prompt: P) -> Result<ChatCompletion<'static>>
    where
        P: Serialize,
    {
        self.complete_custom(prompt, self.endpoint()).await
    }

    /// Post a [`complete`] request to a custom URL.
    ///
    /// [`complete`]: Self::complete
    pub async fn complete_custom<P, U>(
        &self,
        prompt: P,
        url: U,
    ) -> Result<ChatCompletion<'static>>
    where
        P: Serialize,
        U: reqwest::IntoUrl,
    {
        let response: reqwest::Response = self.post(url, prompt).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            let error = ApiError::from_body(status.as_u16(), &body);

            #[cfg(feature = "log")]
            log::warn!("Service rejected the request: {}", error);

            return Err(error.into());
        }

        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(completion) => Ok(completion),
            Err(e) => {
                #[cfg(feature = "log")]
                log::warn!("Could not parse completion: {}\n{}", e, body);

                Err(e.into())
            }
        }
    }
}

impl Generate for Client {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let prompt = Prompt::default()
            .model(self.model)
            .add_message(Message::user(prompt));

        let completion = self.complete(&prompt).await?;

        #[cfg(feature = "log")]
        {
            if let Some(usage) = &completion.usage {
                log::debug!(
                    "Tokens used: {} prompt, {} completion",
                    usage.prompt_tokens,
                    usage.completion_tokens
                );
            }
        }

        if completion.choices.is_empty() {
            return Err(Error::UnexpectedResponse {
                message: "The response contained no choices.",
            });
        }

        match completion.text() {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => Err(Error::UnexpectedResponse {
                message: "The first choice contained no text.",
            }),
        }
    }
}

/// [`Client`] error type. This is what a failed generation reports to the
/// front-end.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP error, including timeouts and connection failures.
    #[error("HTTP error: {0}")]
    HTTP(#[from] reqwest::Error),
    /// Data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The key could not be used.
    #[error("Key error: {0}")]
    Key(#[from] key::InvalidKey),
    /// The key could not be placed in a header.
    #[error("Header error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    /// The service returned an error status.
    #[error("Service error: {0}")]
    Api(#[from] ApiError),
    /// Unexpected response from the API, such as a completion with no
    /// choices.
    #[error("Unexpected response: {message}")]
    #[allow(missing_docs)]
    UnexpectedResponse { message: &'static str },
}

/// Error returned by the service with a non-success status.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{} ({status}): {message}", .kind.as_deref().unwrap_or("error"))]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Error `type`, such as `invalid_request_error` or
    /// `insufficient_quota`.
    pub kind: Option<String>,
    /// Error `code`, such as `invalid_api_key`.
    pub code: Option<String>,
    /// Human readable message.
    pub message: String,
}

impl ApiError {
    /// Parse an error body. Bodies that do not follow the usual
    /// `{"error": {...}}` shape are kept verbatim as the message.
    pub fn from_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ApiErrorWrapper>(body) {
            Ok(ApiErrorWrapper { error }) => Self {
                status,
                kind: error.kind,
                code: error.code.map(|c| match c {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
                message: error.message,
            },
            Err(_) => Self {
                status,
                kind: None,
                code: None,
                message: body.trim().to_string(),
            },
        }
    }

    /// Whether the credential was rejected.
    pub fn is_authentication(&self) -> bool {
        self.status == 401
    }

    /// Whether the account is rate limited or out of quota.
    pub fn is_quota(&self) -> bool {
        self.status == 429
    }
}

// The API nests the error object under an "error" key.
#[derive(Deserialize)]
struct ApiErrorWrapper {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    // Some servers send integers here.
    #[serde(default)]
    code: Option<serde_json::Value>,
}
