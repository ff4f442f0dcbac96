// src/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::CommandError;

// --- COMMAND DESCRIPTION MODELS ---
// Everything in this section is `'static` data emitted into the catalog. A spec is
// never built at runtime, so invocations can hold `&'static CommandSpec` freely.

/// The declared type of a command parameter.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    String,
    Boolean,
    Integer,
    StringList,
    StringMap,
    Json,
}

impl ParameterType {
    /// Whether the type is a collection (copied defensively, defaulted to empty in legacy mode).
    pub fn is_collection(self) -> bool {
        matches!(self, Self::StringList | Self::StringMap)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::StringList => "list of strings",
            Self::StringMap => "map of strings (key=value)",
            Self::Json => "JSON document",
        };
        f.write_str(name)
    }
}

/// Where a parameter may take its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// Only `--Name value`.
    Named,
    /// Named, or the single unnamed value on the command line.
    Positional,
    /// Named, positional, or a value piped in from the host.
    Pipeline,
}

/// Declaratively defines one parameter of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDef {
    pub name: &'static str,
    /// The backend request member the value is copied into.
    pub member: &'static str,
    pub kind: ParameterType,
    pub required: bool,
    pub aliases: &'static [&'static str],
    pub source: ParameterSource,
}

impl ParameterDef {
    /// An optional, named-only parameter.
    pub const fn named(name: &'static str, member: &'static str, kind: ParameterType) -> Self {
        Self {
            name,
            member,
            kind,
            required: false,
            aliases: &[],
            source: ParameterSource::Named,
        }
    }

    /// Marks the parameter as mandatory.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accepts the unnamed command line value.
    pub const fn positional(mut self) -> Self {
        self.source = ParameterSource::Positional;
        self
    }

    /// Accepts the unnamed command line value or a piped value.
    pub const fn pipeline(mut self) -> Self {
        self.source = ParameterSource::Pipeline;
        self
    }

    /// Alternative names accepted by the binder.
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Whether this parameter may receive the unnamed value.
    pub fn accepts_unnamed(&self) -> bool {
        matches!(
            self.source,
            ParameterSource::Positional | ParameterSource::Pipeline
        )
    }
}

/// How disruptive an operation is. Ordered, so it can be compared against the
/// configured confirmation threshold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmImpact {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for ConfirmImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

/// Static description of one backend operation exposed as a command.
#[derive(Debug, PartialEq, Eq)]
pub struct CommandSpec {
    /// Operation-style name, e.g. `DisableStandardsBatch`.
    pub name: &'static str,
    pub verb: &'static str,
    pub noun: &'static str,
    pub noun_aliases: &'static [&'static str],
    /// The backend API action, e.g. `BatchDisableStandards`.
    pub operation: &'static str,
    pub about: &'static str,
    pub parameters: &'static [ParameterDef],
    /// Top level members of the response. Field projections are validated against these.
    pub response_fields: &'static [&'static str],
    /// Select expression used when the caller does not give one.
    pub default_select: &'static str,
    pub confirm_impact: ConfirmImpact,
}

impl CommandSpec {
    /// Looks up a parameter by its exact declared name.
    pub fn parameter(&self, name: &str) -> Option<&'static ParameterDef> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// The parameter that receives the unnamed command line or pipeline value, if any.
    pub fn unnamed_parameter(&self) -> Option<&'static ParameterDef> {
        self.parameters.iter().find(|p| p.accepts_unnamed())
    }

    /// Whether the operation changes state on the backend.
    pub fn is_mutating(&self) -> bool {
        self.confirm_impact > ConfirmImpact::None
    }
}

// --- INVOCATION MODELS ---

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Placeholder for an absent required value in legacy mode.
    Null,
    String(String),
    Boolean(bool),
    Integer(i64),
    StringList(Vec<String>),
    StringMap(BTreeMap<String, String>),
    Json(Value),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// `Null`, a whitespace-only string, or an empty list or map. A required parameter
    /// holding a blank value counts as not supplied.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.trim().is_empty(),
            Self::StringList(items) => items.is_empty(),
            Self::StringMap(map) => map.is_empty(),
            Self::Boolean(_) | Self::Integer(_) | Self::Json(_) => false,
        }
    }

    /// The empty placeholder legacy mode substitutes for a missing parameter of this type.
    pub fn placeholder_for(kind: ParameterType) -> Self {
        match kind {
            ParameterType::StringList => Self::StringList(Vec::new()),
            ParameterType::StringMap => Self::StringMap(BTreeMap::new()),
            _ => Self::Null,
        }
    }

    /// Converts to the JSON representation used in backend requests.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::String(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Integer(i) => Value::from(*i),
            Self::StringList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            Self::StringMap(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
            Self::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("<null>"),
            Self::String(s) => f.write_str(s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::StringList(items) => f.write_str(&items.join(", ")),
            Self::StringMap(map) => {
                let pairs: Vec<String> = map.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                f.write_str(&pairs.join(", "))
            }
            Self::Json(v) => write!(f, "{}", v),
        }
    }
}

/// The values supplied for one invocation, keyed by declared parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundParameters {
    values: BTreeMap<&'static str, ParamValue>,
}

impl BoundParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.values.keys().copied()
    }

    pub(crate) fn insert(&mut self, name: &'static str, value: ParamValue) {
        self.values.insert(name, value);
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ParamValue> {
        self.values.get_mut(name)
    }

    pub(crate) fn into_inner(self) -> BTreeMap<&'static str, ParamValue> {
        self.values
    }
}

/// The outcome of one invocation. Callers always receive one of these, never a panic
/// or a bare error.
#[derive(Debug)]
pub enum InvocationResult {
    /// The call completed; `output` is the projected value, `response` the raw one.
    Success { output: Value, response: Value },
    /// The confirmation gate declined the operation. No request was built.
    Aborted,
    Failure(CommandError),
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Failure(CommandError::Cancelled))
    }

    /// The process exit code this result maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success { .. } => 0,
            Self::Aborted => 2,
            Self::Failure(CommandError::Cancelled) => 130,
            Self::Failure(_) => 1,
        }
    }
}
