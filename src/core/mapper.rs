// src/core/mapper.rs

use crate::{client::BackendRequest, core::context::ExecutionContext};

/// Maps an execution context to the backend request.
///
/// Only non-null values are copied, so an optional parameter that was never bound is
/// absent from the request rather than present and empty. Every value is converted into
/// a fresh JSON value; the request never shares storage with the context.
pub fn map_request(ctx: &ExecutionContext) -> BackendRequest {
    let spec = ctx.spec();
    let mut request = BackendRequest::new(spec.operation);

    for def in spec.parameters {
        match ctx.value(def.name) {
            Some(value) if !value.is_null() => {
                request.members.insert(def.member.to_string(), value.to_json());
            }
            _ => {}
        }
    }

    log::trace!(
        "[{}] Mapped {} member(s) for {}: {:?}",
        ctx.invocation_id(),
        request.members.len(),
        request.operation,
        request.members.keys().collect::<Vec<_>>()
    );
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            binder::{self, InvocationInput},
            context::{BindingMode, build_context},
        },
        models::{CommandSpec, ConfirmImpact, ParameterDef, ParameterType},
    };
    use serde_json::json;

    static TEST_PARAMS: &[ParameterDef] = &[
        ParameterDef::named("Tag", "Tags", ParameterType::StringMap),
        ParameterDef::named("EnableDefaultStandards", "EnableDefaultStandards", ParameterType::Boolean),
        ParameterDef::named("ControlFindingGenerator", "ControlFindingGenerator", ParameterType::String),
        ParameterDef::named("AccountId", "AccountIds", ParameterType::StringList).required(),
    ];

    static TEST_SPEC: CommandSpec = CommandSpec {
        name: "EnableSecurityHub",
        verb: "enable",
        noun: "securityhub",
        noun_aliases: &[],
        operation: "EnableSecurityHub",
        about: "test",
        parameters: TEST_PARAMS,
        response_fields: &[],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
    };

    fn context_for(input: InvocationInput, mode: BindingMode) -> ExecutionContext {
        let bound = binder::bind(&TEST_SPEC, &input).unwrap();
        build_context(&TEST_SPEC, bound, None, mode).unwrap()
    }

    #[test]
    fn test_only_the_set_optional_field_is_mapped() {
        let ctx = context_for(
            InvocationInput::new()
                .with("AccountId", "111122223333")
                .with("ControlFindingGenerator", "SECURITY_CONTROL"),
            BindingMode::Strict,
        );
        let request = map_request(&ctx);

        assert_eq!(request.operation, "EnableSecurityHub");
        assert_eq!(
            request.member("ControlFindingGenerator"),
            Some(&json!("SECURITY_CONTROL"))
        );
        assert!(!request.has_member("Tags"));
        assert!(!request.has_member("EnableDefaultStandards"));
        assert_eq!(request.members.len(), 2);
    }

    #[test]
    fn test_parameter_names_map_to_request_members() {
        let ctx = context_for(
            InvocationInput::new()
                .with("AccountId", "111122223333,444455556666")
                .with("Tag", "env=prod"),
            BindingMode::Strict,
        );
        let request = map_request(&ctx);
        assert_eq!(
            request.member("AccountIds"),
            Some(&json!(["111122223333", "444455556666"]))
        );
        assert_eq!(request.member("Tags"), Some(&json!({ "env": "prod" })));
        assert!(!request.has_member("AccountId"));
    }

    #[test]
    fn test_legacy_placeholders_follow_null_vs_empty_rules() {
        // Required list missing in legacy mode: mapped as an empty list, not omitted.
        let ctx = context_for(InvocationInput::new(), BindingMode::Legacy);
        let request = map_request(&ctx);
        assert_eq!(request.member("AccountIds"), Some(&json!([])));
        assert_eq!(request.members.len(), 1);
    }

    #[test]
    fn test_request_is_a_snapshot_of_the_context() {
        let ctx = context_for(
            InvocationInput::new().with("AccountId", "111122223333"),
            BindingMode::Strict,
        );
        let mut first = map_request(&ctx);
        if let Some(serde_json::Value::Array(items)) = first.members.get_mut("AccountIds") {
            items.push(json!("999999999999"));
        }
        let second = map_request(&ctx);
        assert_eq!(second.member("AccountIds"), Some(&json!(["111122223333"])));
    }
}
