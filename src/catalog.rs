//! # Command Catalog
//!
//! The registry of Security Hub operations exposed as commands. Each entry is plain
//! `'static` data: the parameters a command accepts, the request member each one maps
//! to, the members of the response and the default select expression.
//!
//! Adding a command means adding one `CommandSpec` to `COMMAND_REGISTRY`; nothing else
//! in the crate needs to change.

use crate::models::{CommandSpec, ConfirmImpact, ParameterDef, ParameterType};

use ParameterType::{Boolean, Integer, Json, String as Str, StringList, StringMap};

const EMPTY_RESPONSE: &[&str] = &[];

/// The single source of truth for all commands.
pub static COMMAND_REGISTRY: &[CommandSpec] = &[
    // --- Hub ---
    CommandSpec {
        name: "EnableSecurityHub",
        verb: "enable",
        noun: "securityhub",
        noun_aliases: &["hub"],
        operation: "EnableSecurityHub",
        about: "Enables Security Hub for the account in the current region.",
        parameters: &[
            ParameterDef::named("Tag", "Tags", StringMap).aliases(&["Tags"]),
            ParameterDef::named("EnableDefaultStandard", "EnableDefaultStandards", Boolean)
                .aliases(&["EnableDefaultStandards"]),
            ParameterDef::named("ControlFindingGenerator", "ControlFindingGenerator", Str),
        ],
        response_fields: EMPTY_RESPONSE,
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "DisableSecurityHub",
        verb: "disable",
        noun: "securityhub",
        noun_aliases: &["hub"],
        operation: "DisableSecurityHub",
        about: "Disables Security Hub for the account in the current region.",
        parameters: &[],
        response_fields: EMPTY_RESPONSE,
        default_select: "*",
        confirm_impact: ConfirmImpact::High,
    },
    CommandSpec {
        name: "DescribeHub",
        verb: "get",
        noun: "hub",
        noun_aliases: &["securityhub"],
        operation: "DescribeHub",
        about: "Returns details about the Hub resource in the account.",
        parameters: &[ParameterDef::named("HubArn", "HubArn", Str).pipeline()],
        response_fields: &[
            "HubArn",
            "SubscribedAt",
            "AutoEnableControls",
            "ControlFindingGenerator",
        ],
        default_select: "*",
        confirm_impact: ConfirmImpact::None,
    },
    // --- Standards ---
    CommandSpec {
        name: "EnableStandardsBatch",
        verb: "enable",
        noun: "standards-batch",
        noun_aliases: &["standards"],
        operation: "BatchEnableStandards",
        about: "Enables the standards specified by the provided subscription requests.",
        parameters: &[ParameterDef::named(
            "StandardsSubscriptionRequest",
            "StandardsSubscriptionRequests",
            Json,
        )
        .required()
        .pipeline()
        .aliases(&["StandardsSubscriptionRequests"])],
        response_fields: &["StandardsSubscriptions"],
        default_select: "StandardsSubscriptions",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "DisableStandardsBatch",
        verb: "disable",
        noun: "standards-batch",
        noun_aliases: &["standards"],
        operation: "BatchDisableStandards",
        about: "Disables the standards specified by the provided subscription ARNs.",
        parameters: &[ParameterDef::named(
            "StandardsSubscriptionArn",
            "StandardsSubscriptionArns",
            StringList,
        )
        .required()
        .pipeline()
        .aliases(&["StandardsSubscriptionArns"])],
        response_fields: &["StandardsSubscriptions"],
        default_select: "StandardsSubscriptions",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "GetEnabledStandards",
        verb: "get",
        noun: "enabled-standards",
        noun_aliases: &[],
        operation: "GetEnabledStandards",
        about: "Returns the standards that are currently enabled.",
        parameters: &[
            ParameterDef::named("StandardsSubscriptionArn", "StandardsSubscriptionArns", StringList)
                .pipeline()
                .aliases(&["StandardsSubscriptionArns"]),
            ParameterDef::named("MaxResult", "MaxResults", Integer).aliases(&["MaxItems", "MaxResults"]),
            ParameterDef::named("NextToken", "NextToken", Str),
        ],
        response_fields: &["StandardsSubscriptions", "NextToken"],
        default_select: "StandardsSubscriptions",
        confirm_impact: ConfirmImpact::None,
    },
    CommandSpec {
        name: "UpdateStandardsControl",
        verb: "update",
        noun: "standards-control",
        noun_aliases: &[],
        operation: "UpdateStandardsControl",
        about: "Enables or disables a control in a standard.",
        parameters: &[
            ParameterDef::named("StandardsControlArn", "StandardsControlArn", Str)
                .required()
                .pipeline(),
            ParameterDef::named("ControlStatus", "ControlStatus", Str),
            ParameterDef::named("DisabledReason", "DisabledReason", Str),
        ],
        response_fields: EMPTY_RESPONSE,
        default_select: "^StandardsControlArn",
        confirm_impact: ConfirmImpact::Medium,
    },
    // --- Automation rules ---
    CommandSpec {
        name: "CreateAutomationRule",
        verb: "new",
        noun: "automation-rule",
        noun_aliases: &[],
        operation: "CreateAutomationRule",
        about: "Creates an automation rule based on input parameters.",
        parameters: &[
            ParameterDef::named("RuleName", "RuleName", Str).required().positional(),
            ParameterDef::named("RuleOrder", "RuleOrder", Integer).required(),
            ParameterDef::named("Description", "Description", Str).required(),
            ParameterDef::named("Criterion", "Criteria", Json)
                .required()
                .aliases(&["Criteria"]),
            ParameterDef::named("Action", "Actions", Json)
                .required()
                .aliases(&["Actions"]),
            ParameterDef::named("RuleStatus", "RuleStatus", Str),
            ParameterDef::named("IsTerminal", "IsTerminal", Boolean),
            ParameterDef::named("Tag", "Tags", StringMap).aliases(&["Tags"]),
        ],
        response_fields: &["RuleArn"],
        default_select: "RuleArn",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "GetAutomationRulesBatch",
        verb: "get",
        noun: "automation-rules-batch",
        noun_aliases: &["automation-rules"],
        operation: "BatchGetAutomationRules",
        about: "Retrieves a list of details for automation rules based on rule ARNs.",
        parameters: &[ParameterDef::named("AutomationRulesArn", "AutomationRulesArns", StringList)
            .required()
            .pipeline()
            .aliases(&["AutomationRulesArns"])],
        response_fields: &["Rules", "UnprocessedAutomationRules"],
        default_select: "Rules",
        confirm_impact: ConfirmImpact::None,
    },
    CommandSpec {
        name: "UpdateAutomationRulesBatch",
        verb: "update",
        noun: "automation-rules-batch",
        noun_aliases: &["automation-rules"],
        operation: "BatchUpdateAutomationRules",
        about: "Updates one or more automation rules based on rule ARNs and input parameters.",
        parameters: &[ParameterDef::named(
            "UpdateAutomationRulesRequestItem",
            "UpdateAutomationRulesRequestItems",
            Json,
        )
        .required()
        .pipeline()
        .aliases(&["UpdateAutomationRulesRequestItems"])],
        response_fields: &["ProcessedAutomationRules", "UnprocessedAutomationRules"],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "DeleteAutomationRulesBatch",
        verb: "remove",
        noun: "automation-rules-batch",
        noun_aliases: &["automation-rules"],
        operation: "BatchDeleteAutomationRules",
        about: "Deletes one or more automation rules.",
        parameters: &[ParameterDef::named("AutomationRulesArn", "AutomationRulesArns", StringList)
            .required()
            .pipeline()
            .aliases(&["AutomationRulesArns"])],
        response_fields: &["ProcessedAutomationRules", "UnprocessedAutomationRules"],
        default_select: "*",
        confirm_impact: ConfirmImpact::High,
    },
    // --- Members ---
    CommandSpec {
        name: "CreateMembers",
        verb: "new",
        noun: "members",
        noun_aliases: &["member"],
        operation: "CreateMembers",
        about: "Creates member associations in Security Hub between the administrator and other accounts.",
        parameters: &[ParameterDef::named("AccountDetail", "AccountDetails", Json)
            .required()
            .pipeline()
            .aliases(&["AccountDetails"])],
        response_fields: &["UnprocessedAccounts"],
        default_select: "UnprocessedAccounts",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "InviteMembers",
        verb: "invite",
        noun: "members",
        noun_aliases: &["member"],
        operation: "InviteMembers",
        about: "Invites other AWS accounts to become member accounts for the administrator account.",
        parameters: &[ParameterDef::named("AccountId", "AccountIds", StringList)
            .required()
            .pipeline()
            .aliases(&["AccountIds"])],
        response_fields: &["UnprocessedAccounts"],
        default_select: "UnprocessedAccounts",
        confirm_impact: ConfirmImpact::Medium,
    },
    // --- Integrations ---
    CommandSpec {
        name: "RegisterConnectorV2",
        verb: "register",
        noun: "connector-v2",
        noun_aliases: &["connector"],
        operation: "RegisterConnectorV2",
        about: "Completes the registration of a third-party connector after OAuth authorization.",
        parameters: &[
            ParameterDef::named("AuthCode", "AuthCode", Str).required(),
            ParameterDef::named("AuthState", "AuthState", Str).required(),
        ],
        response_fields: &["ConnectorArn", "ConnectorId"],
        default_select: "*",
        confirm_impact: ConfirmImpact::Medium,
    },
    CommandSpec {
        name: "DisableImportFindingsForProduct",
        verb: "disable",
        noun: "product-import",
        noun_aliases: &["import-findings-for-product"],
        operation: "DisableImportFindingsForProduct",
        about: "Stops the import of findings from a product integration.",
        parameters: &[ParameterDef::named("ProductSubscriptionArn", "ProductSubscriptionArn", Str)
            .required()
            .pipeline()],
        response_fields: EMPTY_RESPONSE,
        default_select: "^ProductSubscriptionArn",
        confirm_impact: ConfirmImpact::Medium,
    },
];

fn normalize(word: &str) -> String {
    word.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Finds a command by verb and noun (or noun alias). Case and dashes are ignored.
pub fn find_command(verb: &str, noun: &str) -> Option<&'static CommandSpec> {
    let verb = normalize(verb);
    let noun = normalize(noun);
    COMMAND_REGISTRY.iter().find(|spec| {
        normalize(spec.verb) == verb
            && (normalize(spec.noun) == noun
                || spec.noun_aliases.iter().any(|alias| normalize(alias) == noun))
    })
}

/// Finds a command by its operation-style name, e.g. `DisableStandardsBatch`.
pub fn find_by_name(name: &str) -> Option<&'static CommandSpec> {
    COMMAND_REGISTRY
        .iter()
        .find(|spec| spec.name.eq_ignore_ascii_case(name))
}

pub fn all() -> &'static [CommandSpec] {
    COMMAND_REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::projection::Projector, models::BoundParameters};
    use std::collections::HashSet;

    #[test]
    fn test_every_default_select_compiles() {
        for spec in all() {
            let result = Projector::resolve(None, spec, &BoundParameters::new());
            assert!(
                result.is_ok(),
                "Default select '{}' of '{}' does not compile: {:?}",
                spec.default_select,
                spec.name,
                result.err()
            );
        }
    }

    #[test]
    fn test_parameter_names_and_aliases_are_unique_per_command() {
        for spec in all() {
            let mut seen = HashSet::new();
            for def in spec.parameters {
                for name in std::iter::once(&def.name).chain(def.aliases.iter()) {
                    assert!(
                        seen.insert(normalize(name)),
                        "'{}' is declared twice in '{}'",
                        name,
                        spec.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_required_parameters_are_never_switches() {
        for spec in all() {
            for def in spec.parameters.iter().filter(|p| p.required) {
                assert_ne!(def.kind, Boolean, "{}.{}", spec.name, def.name);
            }
        }
    }

    #[test]
    fn test_at_most_one_unnamed_receiver_per_command() {
        for spec in all() {
            let count = spec.parameters.iter().filter(|p| p.accepts_unnamed()).count();
            assert!(count <= 1, "'{}' has {} unnamed receivers", spec.name, count);
        }
    }

    #[test]
    fn test_verb_noun_pairs_are_unique() {
        let mut seen = HashSet::new();
        for spec in all() {
            assert!(
                seen.insert((normalize(spec.verb), normalize(spec.noun))),
                "{} {} is registered twice",
                spec.verb,
                spec.noun
            );
        }
    }

    #[test]
    fn test_find_command_by_noun_and_alias() {
        let spec = find_command("Disable", "StandardsBatch").unwrap();
        assert_eq!(spec.name, "DisableStandardsBatch");
        assert_eq!(find_command("disable", "standards").unwrap().operation, "BatchDisableStandards");
        assert_eq!(find_command("get", "securityhub").unwrap().name, "DescribeHub");
        assert!(find_command("explode", "hub").is_none());
    }

    #[test]
    fn test_find_by_name_ignores_case() {
        assert_eq!(
            find_by_name("enablesecurityhub").unwrap().operation,
            "EnableSecurityHub"
        );
        assert!(find_by_name("Nope").is_none());
    }

    #[test]
    fn test_mutating_commands_require_confirmation_impact() {
        for name in ["EnableSecurityHub", "DisableSecurityHub", "DeleteAutomationRulesBatch"] {
            assert!(find_by_name(name).unwrap().is_mutating(), "{}", name);
        }
        assert!(!find_by_name("DescribeHub").unwrap().is_mutating());
    }
}
