use std::future::ready;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;

use futures_util::FutureExt;

use super::{Error, Tool, ToolArguments, ToolResult};

pub(crate) trait ToolObject: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn execute(
        &self,
        arguments: &str,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>>;
}

pub(crate) struct AnyTool<T: Tool>(pub T);

impl<T: Tool> ToolObject for AnyTool<T> {
    #[inline]
    fn name(&self) -> &str {
        self.0.name()
    }

    #[inline]
    fn description(&self) -> &str {
        self.0.description()
    }

    fn execute(
        &self,
        arguments: &str,
    ) -> Pin<Box<dyn Future<Output = ToolResult> + Send>> {
        let input = match serde_json::from_str::<ToolArguments>(arguments) {
            Ok(args) => args.tool_input,
            Err(err) => {
                warn!("malformed arguments for {}: {err}", self.0.name());
                let reason = format!(
                    "Invalid arguments for tool '{}': {err}",
                    self.0.name()
                );
                return Box::pin(ready(ToolResult::Err(
                    Error::invalid_input().with_reason(reason),
                )));
            }
        };

        let name = self.0.name().to_owned();
        let fut = match panic::catch_unwind(AssertUnwindSafe(|| {
            self.0.run(input)
        })) {
            Ok(fut) => fut,
            Err(_) => return Box::pin(ready(Err(panicked(&name)))),
        };
        Box::pin(AssertUnwindSafe(fut).catch_unwind().map(move |result| {
            result.unwrap_or_else(|_| Err(panicked(&name)))
        }))
    }
}

#[inline]
fn panicked(name: &str) -> Error {
    error!("tool {name} panicked");
    Error::panicked().with_reason(format!("Tool '{name}' panicked."))
}
