// src/core/projection.rs

use crate::{
    core::binder,
    models::{BoundParameters, CommandSpec},
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::{fmt, str::FromStr, sync::Arc};
use thiserror::Error;

lazy_static! {
    static ref FIELD_PATH_RE: Regex =
        Regex::new(r"^[A-Za-z][A-Za-z0-9_]*(?:\.[A-Za-z][A-Za-z0-9_]*)*$")
            .expect("field path regex must compile");
    static ref PARAMETER_ECHO_RE: Regex =
        Regex::new(r"^\^([A-Za-z][A-Za-z0-9_-]*)$").expect("parameter echo regex must compile");
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("the expression is empty")]
    Empty,
    #[error("'{0}' is not a valid select expression (expected '*', '^Parameter' or 'Field[.Sub]')")]
    Malformed(String),
    #[error("'{field}' is not a member of the {operation} response")]
    UnknownField {
        field: String,
        operation: &'static str,
    },
    #[error("'^{0}' does not name a parameter of this command")]
    UnknownParameter(String),
}

/// What part of an invocation becomes the command's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionExpression {
    /// `*`
    WholeResponse,
    /// `Field` or `Field.Sub.Path`
    Field(Vec<String>),
    /// `^Parameter`
    Parameter(String),
}

impl FromStr for ProjectionExpression {
    type Err = ProjectionError;

    /// Parses the select syntax. Only the shape is checked here; names are checked
    /// against a command by [`Projector::compile`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();
        if expr.is_empty() {
            return Err(ProjectionError::Empty);
        }
        if expr == "*" {
            return Ok(Self::WholeResponse);
        }
        if let Some(caps) = PARAMETER_ECHO_RE.captures(expr) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return Ok(Self::Parameter(name.to_string()));
        }
        if FIELD_PATH_RE.is_match(expr) {
            return Ok(Self::Field(expr.split('.').map(str::to_string).collect()));
        }
        Err(ProjectionError::Malformed(expr.to_string()))
    }
}

impl fmt::Display for ProjectionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WholeResponse => f.write_str("*"),
            Self::Field(path) => f.write_str(&path.join(".")),
            Self::Parameter(name) => write!(f, "^{}", name),
        }
    }
}

type ProjectFn = dyn Fn(&Value) -> Value + Send + Sync;

/// A select expression compiled against one command and one set of bound parameters.
/// Applying it is pure: the same response always yields the same output.
#[derive(Clone)]
pub struct Projector {
    expression: ProjectionExpression,
    apply: Arc<ProjectFn>,
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

impl Projector {
    /// Resolves every name in `expression` eagerly, so a bad select fails before any
    /// request is sent rather than when the response comes back.
    pub fn compile(
        expression: ProjectionExpression,
        spec: &CommandSpec,
        bound: &BoundParameters,
    ) -> Result<Self, ProjectionError> {
        let apply: Arc<ProjectFn> = match &expression {
            ProjectionExpression::WholeResponse => Arc::new(|response: &Value| response.clone()),
            ProjectionExpression::Field(path) => {
                let (head, rest) = path
                    .split_first()
                    .ok_or_else(|| ProjectionError::Malformed(expression.to_string()))?;
                let declared = spec
                    .response_fields
                    .iter()
                    .find(|f| f.eq_ignore_ascii_case(head))
                    .ok_or_else(|| ProjectionError::UnknownField {
                        field: head.clone(),
                        operation: spec.operation,
                    })?;

                let mut resolved: Vec<String> = vec![(*declared).to_string()];
                resolved.extend(rest.iter().cloned());
                Arc::new(move |response: &Value| walk(response, &resolved))
            }
            ProjectionExpression::Parameter(name) => {
                let def = binder::resolve_parameter(spec, name)
                    .ok_or_else(|| ProjectionError::UnknownParameter(name.clone()))?;
                // The echoed value is fixed for the invocation, so it is captured now.
                let echoed = bound
                    .get(def.name)
                    .map(|v| v.to_json())
                    .unwrap_or(Value::Null);
                Arc::new(move |_: &Value| echoed.clone())
            }
        };

        Ok(Self { expression, apply })
    }

    /// Parses `select` and compiles it, falling back to the command's default.
    pub fn resolve(
        select: Option<&str>,
        spec: &CommandSpec,
        bound: &BoundParameters,
    ) -> Result<Self, ProjectionError> {
        let expression: ProjectionExpression = select.unwrap_or(spec.default_select).parse()?;
        Self::compile(expression, spec, bound)
    }

    pub fn expression(&self) -> &ProjectionExpression {
        &self.expression
    }

    /// Applies the projection. Total over any JSON value.
    pub fn project(&self, response: &Value) -> Value {
        (self.apply)(response)
    }
}

/// Follows `path` through objects. Arrays met on the way are mapped element-wise,
/// and missing members yield `null`.
fn walk(value: &Value, path: &[String]) -> Value {
    let Some((head, rest)) = path.split_first() else {
        return value.clone();
    };
    match value {
        Value::Object(map) => {
            let member = map
                .get(head)
                .or_else(|| {
                    map.iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(head))
                        .map(|(_, v)| v)
                })
                .unwrap_or(&Value::Null);
            walk(member, rest)
        }
        Value::Array(items) => Value::Array(items.iter().map(|item| walk(item, path)).collect()),
        _ => Value::Null,
    }
}
