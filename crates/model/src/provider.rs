use std::error::Error;

use crate::error::ErrorKind;
use crate::request::ModelRequest;
use crate::response::Decision;

/// The error type for a model provider.
pub trait ModelProviderError: Error + Send + Sync + 'static {
    /// Returns the kind of this error.
    fn kind(&self) -> ErrorKind;
}

/// A type that represents a completion backend, which turns a conversation
/// history and the available tools into one [`Decision`].
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state, but callers should not rely on it,
/// and the provider should be prepared for being dropped anytime.
///
/// Callers never retry a failed request. If a provider wants a retry
/// policy, it should implement it inside `complete`.
pub trait ModelProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ModelProviderError;

    /// Requests a decision from the model.
    fn complete(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Decision, Self::Error>> + Send + 'static;
}
