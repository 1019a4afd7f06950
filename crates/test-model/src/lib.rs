//! A local scripted model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cogni_model::{
    Decision, ErrorKind, ModelProvider, ModelProviderError, ModelRequest,
};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[derive(Default)]
struct Script {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local scripted model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should respond to each request. Responses are consumed in the
/// order they were added, one per request. If there are no enough
/// responses in the script, an error will be returned.
///
/// Clones share the same script, so a test can keep a clone to inspect the
/// received requests after handing the provider to an agent.
///
/// # Note
///
/// This type is not optimized for production use, every request is copied
/// and kept. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Arc<Mutex<Script>>,
}

impl TestModelProvider {
    /// Appends a response to the script.
    #[inline]
    pub fn add_response(&self, preset: PresetResponse) {
        self.lock().responses.push_back(preset);
    }

    /// Returns all the requests received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock().requests.clone()
    }

    /// Returns the number of responses that haven't been consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.lock().responses.len()
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_decision(&self, req: &ModelRequest) -> Result<Decision, Error> {
        let mut script = self.lock();
        script.requests.push(req.clone());

        let Some(preset) = script.responses.front_mut() else {
            return Err(Error {
                message: "no enough responses",
                kind: ErrorKind::Other,
            });
        };

        match preset.failures {
            Some(0) => {
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::Other,
                });
            }
            Some(failures) => {
                // The next request succeeds once all failures are used up.
                preset.failures = (failures > 1).then(|| failures - 1);
                return Err(Error {
                    message: "preset failure",
                    kind: ErrorKind::RateLimitExceeded,
                });
            }
            None => {}
        }

        let decision = preset.to_decision();
        script.responses.pop_front();
        Ok(decision)
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;

    fn complete(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Decision, Self::Error>> + Send + 'static
    {
        ready(self.next_decision(req))
    }
}
