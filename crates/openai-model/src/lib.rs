//! A model provider for OpenAI-compatible APIs.

#[macro_use]
extern crate tracing;

mod config;
mod proto;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use backoff::ExponentialBackoff;
use cogni_model::{
    Decision, ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
};
use reqwest::{Client, StatusCode, header};

pub use config::{OpenAIConfig, OpenAIConfigBuilder};
use proto::{ChatCompletion, ChatCompletionRequest};

/// Error type for [`OpenAIProvider`].
#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// OpenAI-compatible model provider.
///
/// Rate-limited requests are retried with an exponential backoff, until
/// the configured retry timeout elapses.
#[derive(Clone, Debug)]
pub struct OpenAIProvider {
    client: Client,
    config: Arc<OpenAIConfig>,
}

impl OpenAIProvider {
    /// Creates a new `OpenAIProvider` with the given configuration.
    #[inline]
    pub fn new(config: OpenAIConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }
}

impl ModelProvider for OpenAIProvider {
    type Error = Error;

    fn complete(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Decision, Self::Error>> + Send + 'static
    {
        let openai_req = Arc::new(proto::create_request(
            &req.entries,
            &req.tools,
            &self.config,
        ));
        let client = self.client.clone();
        let config = Arc::clone(&self.config);

        async move {
            let policy = ExponentialBackoff {
                max_elapsed_time: Some(config.retry_timeout),
                ..Default::default()
            };
            backoff::future::retry(policy, || {
                let fut = send_once(
                    client.clone(),
                    Arc::clone(&config),
                    Arc::clone(&openai_req),
                );
                async move {
                    fut.await.map_err(|err| {
                        if err.kind.is_transient() {
                            warn!("rate limited, retrying: {err}");
                            backoff::Error::transient(err)
                        } else {
                            backoff::Error::permanent(err)
                        }
                    })
                }
            })
            .await
        }
    }
}

async fn send_once(
    client: Client,
    config: Arc<OpenAIConfig>,
    openai_req: Arc<ChatCompletionRequest>,
) -> Result<Decision, Error> {
    let resp = client
        .post(format!("{}{}", config.base_url, "/chat/completions"))
        .header(header::AUTHORIZATION, format!("Bearer {}", config.api_key))
        .header(header::CONTENT_TYPE, "application/json")
        .json(openai_req.as_ref())
        .send()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;

    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::new(
            format!("Server responded with {status}"),
            ErrorKind::RateLimitExceeded,
        ));
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::new(
            format!("Server responded with {status}: {body}"),
            ErrorKind::Other,
        ));
    }

    let completion: ChatCompletion = resp
        .json()
        .await
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
    trace!("got completion: {}", completion.id);
    proto::create_decision(completion)
}
