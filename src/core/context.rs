// src/core/context.rs

use crate::{
    core::projection::Projector,
    error::CommandError,
    models::{BoundParameters, CommandSpec, ParamValue},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// How the context builder treats a required parameter with no value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BindingMode {
    /// Fail with `MissingRequiredParameter`.
    #[default]
    Strict,
    /// Warn and continue with a placeholder: `null` for scalars, an empty collection
    /// for lists and maps.
    Legacy,
}

/// The validated, typed snapshot of one invocation. Owned by that invocation only.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    invocation_id: Uuid,
    spec: &'static CommandSpec,
    values: BTreeMap<&'static str, ParamValue>,
    projector: Projector,
    warnings: Vec<String>,
}

impl ExecutionContext {
    /// Correlation id used in log lines for this invocation.
    pub fn invocation_id(&self) -> Uuid {
        self.invocation_id
    }

    pub fn spec(&self) -> &'static CommandSpec {
        self.spec
    }

    pub fn value(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn projector(&self) -> &Projector {
        &self.projector
    }

    /// Non-fatal problems found while building the context (legacy mode only).
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Applies the resolved projection to a raw response.
    pub fn project(&self, response: &Value) -> Value {
        self.projector.project(response)
    }

    /// A short description of what the operation acts on, for confirmation prompts.
    /// Uses the unnamed-value parameter when bound, the operation name otherwise.
    pub fn target(&self) -> String {
        self.spec
            .unnamed_parameter()
            .and_then(|def| self.values.get(def.name))
            .filter(|v| !v.is_null())
            .map(|v| v.to_string())
            .unwrap_or_else(|| self.spec.operation.to_string())
    }
}

/// Builds the execution context for one invocation.
///
/// Required parameters are checked first, so a missing value fails before the select
/// expression is even looked at. A blank value (`""`, or a list or map with no items)
/// counts as missing. A custom `select` is compiled eagerly; without one the
/// command's default is used.
///
/// # Errors
/// `MissingRequiredParameter` (strict mode only) or `InvalidProjection`.
pub fn build_context(
    spec: &'static CommandSpec,
    bound: BoundParameters,
    select: Option<&str>,
    mode: BindingMode,
) -> Result<ExecutionContext, CommandError> {
    let mut warnings = Vec::new();
    let mut values = bound.into_inner();

    for def in spec.parameters.iter().filter(|p| p.required) {
        if values.get(def.name).is_some_and(|v| !v.is_blank()) {
            continue;
        }
        match mode {
            BindingMode::Strict => {
                return Err(CommandError::MissingRequiredParameter {
                    command: spec.name,
                    parameter: def.name,
                });
            }
            BindingMode::Legacy => {
                let warning = format!(
                    "Required parameter '{}' of '{}' has no value; continuing with an empty placeholder.",
                    def.name, spec.name
                );
                log::warn!("{}", warning);
                warnings.push(warning);
                values.insert(def.name, ParamValue::placeholder_for(def.kind));
            }
        }
    }

    // The projector only reads the bound values, so it is compiled from a snapshot of them.
    let mut snapshot = BoundParameters::new();
    for (name, value) in &values {
        snapshot.insert(*name, value.clone());
    }
    let projector = Projector::resolve(select, spec, &snapshot)?;

    let invocation_id = Uuid::new_v4();
    log::debug!(
        "[{}] Context ready for '{}' with select '{}'",
        invocation_id,
        spec.name,
        projector.expression()
    );

    Ok(ExecutionContext {
        invocation_id,
        spec,
        values,
        projector,
        warnings,
    })
}
