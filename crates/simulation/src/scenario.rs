use serde::{Deserialize, Serialize};

use crate::{Assertion, ResponseContains, ToolUsed, WellFormedHistory};

/// A runnable test case for an agent: a name, the user inputs to send in
/// order, and the assertions to check afterwards.
pub struct Scenario {
    name: String,
    steps: Vec<String>,
    assertions: Vec<Box<dyn Assertion>>,
}

impl Scenario {
    /// Creates a scenario without steps or assertions.
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            steps: vec![],
            assertions: vec![],
        }
    }

    /// Appends a user input.
    #[inline]
    pub fn with_step<S: Into<String>>(mut self, input: S) -> Self {
        self.steps.push(input.into());
        self
    }

    /// Appends several user inputs.
    #[inline]
    pub fn with_steps<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(inputs.into_iter().map(Into::into));
        self
    }

    /// Adds an assertion.
    #[inline]
    pub fn with_assertion<A: Assertion + 'static>(
        mut self,
        assertion: A,
    ) -> Self {
        self.assertions.push(Box::new(assertion));
        self
    }

    /// Returns the name of the scenario.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the user inputs.
    #[inline]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Returns the assertions.
    #[inline]
    pub fn assertions(&self) -> &[Box<dyn Assertion>] {
        &self.assertions
    }
}

/// The declarative form of a [`Scenario`], as written in scenario files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDef {
    /// Name of the scenario.
    pub name: String,
    /// User inputs, sent in order.
    pub steps: Vec<String>,
    /// Assertions checked after the last step.
    #[serde(default)]
    pub assertions: Vec<AssertionDef>,
}

/// The declarative form of the built-in assertions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssertionDef {
    /// See [`ToolUsed`].
    ToolUsed {
        /// Name of the tool.
        tool_name: String,
    },
    /// See [`ResponseContains`].
    ResponseContains {
        /// The expected text.
        text: String,
        /// Whether the comparison is case-sensitive.
        #[serde(default)]
        case_sensitive: bool,
    },
    /// See [`WellFormedHistory`].
    WellFormedHistory,
}

impl From<AssertionDef> for Box<dyn Assertion> {
    fn from(def: AssertionDef) -> Self {
        match def {
            AssertionDef::ToolUsed { tool_name } => {
                Box::new(ToolUsed::new(tool_name))
            }
            AssertionDef::ResponseContains {
                text,
                case_sensitive,
            } => Box::new(
                ResponseContains::new(text).case_sensitive(case_sensitive),
            ),
            AssertionDef::WellFormedHistory => Box::new(WellFormedHistory),
        }
    }
}

impl From<ScenarioDef> for Scenario {
    fn from(def: ScenarioDef) -> Self {
        Scenario {
            name: def.name,
            steps: def.steps,
            assertions: def.assertions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parses a JSON array of [`ScenarioDef`]s into scenarios.
pub fn load_scenarios(json: &str) -> Result<Vec<Scenario>, serde_json::Error> {
    let defs: Vec<ScenarioDef> = serde_json::from_str(json)?;
    Ok(defs.into_iter().map(Scenario::from).collect())
}
