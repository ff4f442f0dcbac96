// src/core/binder.rs

use crate::{
    error::CommandError,
    models::{BoundParameters, CommandSpec, ParamValue, ParameterDef, ParameterType},
};
use std::collections::BTreeMap;

/// The raw values a host supplied for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationInput {
    /// `(name, value)` pairs in the order they were given. `None` is a bare switch.
    pub named: Vec<(String, Option<String>)>,
    /// The single unnamed value, from the command line or the pipeline.
    pub positional: Option<String>,
}

impl InvocationInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a named value. Chainable, mostly for tests and embedders.
    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.named.push((name.to_string(), Some(value.to_string())));
        self
    }

    pub fn with_switch(mut self, name: &str) -> Self {
        self.named.push((name.to_string(), None));
        self
    }

    pub fn with_positional(mut self, value: &str) -> Self {
        self.positional = Some(value.to_string());
        self
    }
}

/// Lowercases and strips dashes/underscores so `--standards-subscription-arn`,
/// `-StandardsSubscriptionArn` and `standards_subscription_arn` all match.
fn normalize(name: &str) -> String {
    name.trim_start_matches('-')
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds the parameter a host-supplied name refers to, by name or alias.
pub fn resolve_parameter(spec: &CommandSpec, name: &str) -> Option<&'static ParameterDef> {
    let wanted = normalize(name);
    spec.parameters.iter().find(|p| {
        normalize(p.name) == wanted || p.aliases.iter().any(|alias| normalize(alias) == wanted)
    })
}

/// Binds raw host input to a command's declared parameters. Pure: nothing outside the
/// returned value is touched.
///
/// # Errors
/// - `UnknownParameter` for a name no parameter or alias matches, or an unnamed value
///   when the command takes none.
/// - `TypeMismatch` when a value cannot be converted to the declared type.
/// - `DuplicateParameter` when a scalar parameter is given twice.
pub fn bind(spec: &CommandSpec, input: &InvocationInput) -> Result<BoundParameters, CommandError> {
    let mut bound = BoundParameters::new();

    for (name, raw) in &input.named {
        let def = resolve_parameter(spec, name).ok_or_else(|| CommandError::UnknownParameter {
            command: spec.name,
            name: name.clone(),
        })?;
        let value = convert(def, raw.as_deref())?;
        merge_into(&mut bound, def, value)?;
    }

    if let Some(raw) = &input.positional {
        let def = spec
            .unnamed_parameter()
            .ok_or_else(|| CommandError::UnknownParameter {
                command: spec.name,
                name: raw.clone(),
            })?;
        let value = convert(def, Some(raw))?;
        merge_into(&mut bound, def, value)?;
    }

    log::trace!(
        "Bound {} parameter(s) for '{}': {:?}",
        bound.len(),
        spec.name,
        bound.names().collect::<Vec<_>>()
    );
    Ok(bound)
}

/// Collections accumulate repeated values; scalars may only be given once.
fn merge_into(
    bound: &mut BoundParameters,
    def: &'static ParameterDef,
    value: ParamValue,
) -> Result<(), CommandError> {
    match (bound.get_mut(def.name), value) {
        (None, value) => {
            bound.insert(def.name, value);
            Ok(())
        }
        (Some(ParamValue::StringList(existing)), ParamValue::StringList(more)) => {
            existing.extend(more);
            Ok(())
        }
        (Some(ParamValue::StringMap(existing)), ParamValue::StringMap(more)) => {
            existing.extend(more);
            Ok(())
        }
        (Some(_), _) => Err(CommandError::DuplicateParameter(def.name)),
    }
}

fn mismatch(def: &ParameterDef, raw: &str, reason: impl Into<String>) -> CommandError {
    CommandError::TypeMismatch {
        parameter: def.name,
        expected: def.kind,
        value: raw.to_string(),
        reason: reason.into(),
    }
}

/// Converts one raw value into the declared type.
fn convert(def: &ParameterDef, raw: Option<&str>) -> Result<ParamValue, CommandError> {
    let Some(raw) = raw else {
        // A bare `--Name` is only meaningful for switches.
        return match def.kind {
            ParameterType::Boolean => Ok(ParamValue::Boolean(true)),
            _ => Err(mismatch(def, "", "a value is required")),
        };
    };

    match def.kind {
        ParameterType::String => Ok(ParamValue::String(raw.to_string())),
        ParameterType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(ParamValue::Boolean(true)),
            "false" | "no" | "0" | "off" => Ok(ParamValue::Boolean(false)),
            _ => Err(mismatch(def, raw, "expected true or false")),
        },
        ParameterType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(ParamValue::Integer)
            .map_err(|e| mismatch(def, raw, e.to_string())),
        // Piped values arrive one per line.
        ParameterType::StringList => Ok(ParamValue::StringList(
            raw.split([',', '\n', '\r'])
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        ParameterType::StringMap => {
            let mut map = BTreeMap::new();
            for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| mismatch(def, raw, format!("'{}' is not a key=value pair", pair)))?;
                let key = key.trim();
                if key.is_empty() {
                    return Err(mismatch(def, raw, "keys cannot be empty"));
                }
                map.insert(key.to_string(), value.trim().to_string());
            }
            Ok(ParamValue::StringMap(map))
        }
        ParameterType::Json => serde_json::from_str(raw)
            .map(ParamValue::Json)
            .map_err(|e| mismatch(def, raw, e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfirmImpact, ParameterDef};

    static TEST_PARAMS: &[ParameterDef] = &[
        ParameterDef::named(
            "StandardsSubscriptionArn",
            "StandardsSubscriptionArns",
            ParameterType::StringList,
        )
        .required()
        .pipeline()
        .aliases(&["StandardsSubscriptionArns"]),
        ParameterDef::named("MaxResults", "MaxResults", ParameterType::Integer),
        ParameterDef::named("EnableDefaultStandards", "EnableDefaultStandards", ParameterType::Boolean),
        ParameterDef::named("Tag", "Tags", ParameterType::StringMap).aliases(&["Tags"]),
        ParameterDef::named("HubArn", "HubArn", ParameterType::String),
        ParameterDef::named("Rule", "AutomationRules", ParameterType::Json),
    ];

    static TEST_SPEC: CommandSpec = CommandSpec {
        name: "TestCommand",
        verb: "test",
        noun: "command",
        noun_aliases: &[],
        operation: "Test",
        about: "test",
        parameters: TEST_PARAMS,
        response_fields: &[],
        default_select: "*",
        confirm_impact: ConfirmImpact::None,
    };

    #[test]
    fn test_names_match_case_and_separator_insensitively() {
        let input = InvocationInput::new()
            .with("--standards-subscription-arn", "arn:a")
            .with("hub_arn", "arn:hub")
            .with("-MAXRESULTS", "10");
        let bound = bind(&TEST_SPEC, &input).unwrap();
        assert_eq!(
            bound.get("StandardsSubscriptionArn"),
            Some(&ParamValue::StringList(vec!["arn:a".to_string()]))
        );
        assert_eq!(
            bound.get("HubArn"),
            Some(&ParamValue::String("arn:hub".to_string()))
        );
        assert_eq!(bound.get("MaxResults"), Some(&ParamValue::Integer(10)));
    }

    #[test]
    fn test_alias_binds_to_canonical_name() {
        let bound = bind(&TEST_SPEC, &InvocationInput::new().with("Tags", "env=prod")).unwrap();
        assert!(bound.contains("Tag"));
        assert!(!bound.contains("Tags"));
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let err = bind(&TEST_SPEC, &InvocationInput::new().with("--region-name", "x")).unwrap_err();
        assert!(
            matches!(err, CommandError::UnknownParameter { ref name, .. } if name == "--region-name")
        );
    }

    #[test]
    fn test_type_mismatch_for_integer_and_boolean() {
        let err = bind(&TEST_SPEC, &InvocationInput::new().with("MaxResults", "ten")).unwrap_err();
        assert!(matches!(
            err,
            CommandError::TypeMismatch { parameter: "MaxResults", expected: ParameterType::Integer, .. }
        ));

        let err = bind(
            &TEST_SPEC,
            &InvocationInput::new().with("EnableDefaultStandards", "maybe"),
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::TypeMismatch { parameter: "EnableDefaultStandards", .. }));
    }

    #[test]
    fn test_bare_switch_means_true_but_only_for_booleans() {
        let bound = bind(
            &TEST_SPEC,
            &InvocationInput::new().with_switch("EnableDefaultStandards"),
        )
        .unwrap();
        assert_eq!(bound.get("EnableDefaultStandards"), Some(&ParamValue::Boolean(true)));

        let err = bind(&TEST_SPEC, &InvocationInput::new().with_switch("HubArn")).unwrap_err();
        assert!(matches!(err, CommandError::TypeMismatch { parameter: "HubArn", .. }));
    }

    #[test]
    fn test_lists_accumulate_and_split_on_commas() {
        let input = InvocationInput::new()
            .with("StandardsSubscriptionArn", "arn:a, arn:b")
            .with("StandardsSubscriptionArns", "arn:c")
            .with_positional("arn:d");
        let bound = bind(&TEST_SPEC, &input).unwrap();
        assert_eq!(
            bound.get("StandardsSubscriptionArn"),
            Some(&ParamValue::StringList(vec![
                "arn:a".to_string(),
                "arn:b".to_string(),
                "arn:c".to_string(),
                "arn:d".to_string()
            ]))
        );
    }

    #[test]
    fn test_lists_split_on_line_breaks() {
        let bound = bind(
            &TEST_SPEC,
            &InvocationInput::new().with_positional("arn:a\r\narn:b\n\narn:c, arn:d"),
        )
        .unwrap();
        assert_eq!(
            bound.get("StandardsSubscriptionArn"),
            Some(&ParamValue::StringList(vec![
                "arn:a".to_string(),
                "arn:b".to_string(),
                "arn:c".to_string(),
                "arn:d".to_string()
            ]))
        );
    }

    #[test]
    fn test_blank_list_binds_as_empty() {
        let bound = bind(
            &TEST_SPEC,
            &InvocationInput::new().with("StandardsSubscriptionArn", " , "),
        )
        .unwrap();
        assert_eq!(
            bound.get("StandardsSubscriptionArn"),
            Some(&ParamValue::StringList(vec![]))
        );
    }

    #[test]
    fn test_scalar_given_twice_is_duplicate() {
        let input = InvocationInput::new().with("HubArn", "a").with("hub-arn", "b");
        let err = bind(&TEST_SPEC, &input).unwrap_err();
        assert!(matches!(err, CommandError::DuplicateParameter("HubArn")));
    }

    #[test]
    fn test_string_map_requires_key_value_pairs() {
        let bound = bind(
            &TEST_SPEC,
            &InvocationInput::new().with("Tag", "env=prod").with("Tag", "team = secops"),
        )
        .unwrap();
        let ParamValue::StringMap(map) = bound.get("Tag").unwrap() else {
            panic!("Expected a string map");
        };
        assert_eq!(map.get("env").map(String::as_str), Some("prod"));
        assert_eq!(map.get("team").map(String::as_str), Some("secops"));

        let err = bind(&TEST_SPEC, &InvocationInput::new().with("Tag", "noequals")).unwrap_err();
        assert!(matches!(err, CommandError::TypeMismatch { parameter: "Tag", .. }));
    }

    #[test]
    fn test_json_parameter_parses_document() {
        let bound = bind(
            &TEST_SPEC,
            &InvocationInput::new().with("Rule", r#"[{"RuleName":"suppress-low"}]"#),
        )
        .unwrap();
        assert_eq!(
            bound.get("Rule"),
            Some(&ParamValue::Json(serde_json::json!([{ "RuleName": "suppress-low" }])))
        );
        assert!(bind(&TEST_SPEC, &InvocationInput::new().with("Rule", "{nope")).is_err());
    }

    #[test]
    fn test_positional_without_receiver_is_unknown() {
        static NO_POSITIONAL: CommandSpec = CommandSpec {
            name: "NoPositional",
            verb: "test",
            noun: "none",
            noun_aliases: &[],
            operation: "Test",
            about: "test",
            parameters: &[],
            response_fields: &[],
            default_select: "*",
            confirm_impact: ConfirmImpact::None,
        };
        let err = bind(&NO_POSITIONAL, &InvocationInput::new().with_positional("x")).unwrap_err();
        assert!(matches!(err, CommandError::UnknownParameter { command: "NoPositional", .. }));
    }

    #[test]
    fn test_empty_input_binds_nothing() {
        assert!(bind(&TEST_SPEC, &InvocationInput::new()).unwrap().is_empty());
    }
}
