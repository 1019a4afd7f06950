use std::collections::HashSet;

use cogni_model::{Entry, Role};

/// A pure predicate over a finished conversation history.
///
/// Assertions only read the history, and are evaluated independently of
/// each other.
pub trait Assertion: Send + Sync {
    /// Returns the identity of this assertion, used as the key in the
    /// simulation results.
    fn id(&self) -> String;

    /// Evaluates the assertion against the history.
    fn evaluate(&self, history: &[Entry]) -> bool;
}

/// Passes if any assistant entry requested the tool at least once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolUsed {
    tool_name: String,
}

impl ToolUsed {
    /// Creates the assertion for the given tool name.
    #[inline]
    pub fn new<S: Into<String>>(tool_name: S) -> Self {
        Self {
            tool_name: tool_name.into(),
        }
    }
}

impl Assertion for ToolUsed {
    fn id(&self) -> String {
        format!("tool_used({})", self.tool_name)
    }

    fn evaluate(&self, history: &[Entry]) -> bool {
        history
            .iter()
            .flat_map(Entry::tool_calls)
            .any(|call| call.name == self.tool_name)
    }
}

/// Passes if the last entry is an assistant entry whose content is not
/// empty and contains the expected text.
///
/// The comparison ignores case unless [`ResponseContains::case_sensitive`]
/// is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseContains {
    expected: String,
    case_sensitive: bool,
}

impl ResponseContains {
    /// Creates a case-insensitive assertion for the given text.
    #[inline]
    pub fn new<S: Into<String>>(expected: S) -> Self {
        Self {
            expected: expected.into(),
            case_sensitive: false,
        }
    }

    /// Sets whether the comparison is case-sensitive.
    #[inline]
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }
}

impl Assertion for ResponseContains {
    fn id(&self) -> String {
        if self.case_sensitive {
            format!("response_contains({:?}, case_sensitive)", self.expected)
        } else {
            format!("response_contains({:?})", self.expected)
        }
    }

    fn evaluate(&self, history: &[Entry]) -> bool {
        let Some(last) = history.last() else {
            return false;
        };
        if last.role() != Role::Assistant {
            return false;
        }
        let Some(content) = last.content().filter(|c| !c.is_empty()) else {
            return false;
        };

        if self.case_sensitive {
            content.contains(&self.expected)
        } else {
            content
                .to_lowercase()
                .contains(&self.expected.to_lowercase())
        }
    }
}

/// Passes if the history keeps the structural invariants of a
/// conversation.
///
/// The single system entry comes first, and every tool entry answers a
/// request of the nearest preceding assistant entry, in request order,
/// exactly once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WellFormedHistory;

impl Assertion for WellFormedHistory {
    fn id(&self) -> String {
        "well_formed_history".to_owned()
    }

    fn evaluate(&self, history: &[Entry]) -> bool {
        let Some((first, rest)) = history.split_first() else {
            return false;
        };
        if first.role() != Role::System {
            return false;
        }

        let mut answered = HashSet::new();
        // Ids of the latest assistant entry not yet answered, in reverse.
        let mut pending: Vec<&str> = vec![];
        for entry in rest {
            match entry {
                Entry::System { .. } => return false,
                Entry::Assistant(assistant) => {
                    pending = assistant
                        .tool_calls
                        .iter()
                        .rev()
                        .map(|call| call.id.as_str())
                        .collect();
                }
                Entry::Tool(tool) => {
                    if pending.pop() != Some(tool.tool_call_id.as_str()) {
                        return false;
                    }
                    if !answered.insert(tool.tool_call_id.as_str()) {
                        return false;
                    }
                }
                // A new user turn leaves earlier requests unanswerable.
                Entry::User { .. } => pending.clear(),
            }
        }
        true
    }
}
