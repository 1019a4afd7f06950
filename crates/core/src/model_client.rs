use std::pin::Pin;
use std::sync::Arc;

use cogni_model::{Decision, ModelProvider, ModelProviderError, ModelRequest};
use tracing::Instrument;

use crate::BackendError;

type CompleteResult = Result<Decision, Box<dyn ModelProviderError>>;
type BoxedCompleteFuture = Pin<Box<dyn Future<Output = CompleteResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedCompleteFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            trace!(
                "got a request: {} entries, {} tools",
                req.entries.len(),
                req.tools.len()
            );
            let fut = provider.complete(&req);
            Box::pin(
                async move {
                    match fut.await {
                        Ok(decision) => {
                            trace!("got a decision: {decision:?}");
                            Ok(decision)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the decision.
    ///
    /// The request is sent exactly once, failures are never retried here.
    #[inline]
    pub async fn complete(
        &self,
        req: ModelRequest,
    ) -> Result<Decision, BackendError> {
        (self.handler_fn)(req).await.map_err(BackendError::new)
    }
}

#[cfg(test)]
mod tests {
    use cogni_model::{Entry, ErrorKind};
    use cogni_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    fn request() -> ModelRequest {
        ModelRequest {
            entries: vec![Entry::user("Hi")],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_complete() {
        let model_provider = TestModelProvider::default();
        for _ in 0..3 {
            model_provider.add_response(PresetResponse::text("How are you?"));
        }

        let model_client = ModelClient::new(model_provider.clone());
        for _ in 0..3 {
            let decision = model_client.complete(request()).await.unwrap();
            assert_eq!(decision.content.as_deref(), Some("How are you?"));
            assert!(decision.raw.is_some());
        }
        assert_eq!(model_provider.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_error_handling() {
        let model_provider = TestModelProvider::default();
        model_provider
            .add_response(PresetResponse::text("Later.").with_failures(1));
        let model_client = ModelClient::new(model_provider.clone());

        let err = model_client.complete(request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert!(std::error::Error::source(&err).is_some());
        // Not retried by the client.
        assert_eq!(model_provider.requests().len(), 1);
    }
}
