use std::error::Error;
use std::fmt::{self, Debug, Display};

use cogni_model::{ErrorKind, ModelProviderError};

/// The error returned when the completion backend fails during a turn.
///
/// Entries appended before the failure stay in the history, nothing is
/// appended for the decision that was never obtained.
pub struct BackendError(Box<dyn ModelProviderError>);

impl BackendError {
    #[inline]
    pub(crate) fn new(inner: Box<dyn ModelProviderError>) -> Self {
        Self(inner)
    }

    /// Returns the kind of the underlying provider error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.0.kind()
    }
}

impl Debug for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BackendError").field(&self.0).finish()
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "completion backend failed: {}", self.0)
    }
}

impl Error for BackendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.0.as_ref())
    }
}
