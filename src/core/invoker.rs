// src/core/invoker.rs

use crate::{
    CancellationToken,
    client::{BackendClient, BackendRequest, BoxError, ClientError},
    core::context::ExecutionContext,
    error::CommandError,
    models::InvocationResult,
};
use std::error::Error;

/// Substrings resolver failures carry in their messages across platforms and HTTP stacks.
const NAME_RESOLUTION_MARKERS: &[&str] = &[
    "failed to lookup address",
    "name or service not known",
    "no such host is known",
    "nodename nor servname",
    "temporary failure in name resolution",
    "dns error",
];

/// Performs the single backend call for an invocation and projects its response.
///
/// The call races the cancellation token; once the token fires the in-flight future is
/// dropped and `Cancelled` is returned. No retries happen here. Errors never escape:
/// every outcome is an [`InvocationResult`].
pub async fn invoke(
    client: &dyn BackendClient,
    ctx: &ExecutionContext,
    request: BackendRequest,
    cancellation_token: &CancellationToken,
) -> InvocationResult {
    let id = ctx.invocation_id();
    log::debug!(
        "[{}] Calling {} at {}",
        id,
        request.operation,
        client.endpoint()
    );

    let outcome = tokio::select! {
        biased;
        _ = cancellation_token.cancelled() => {
            log::debug!("[{}] Cancellation requested, abandoning {}", id, request.operation);
            return InvocationResult::Failure(CommandError::Cancelled);
        }
        outcome = client.invoke(&request, cancellation_token) => outcome,
    };

    match outcome {
        Ok(response) => {
            log::debug!("[{}] {} succeeded", id, request.operation);
            let output = ctx.project(&response);
            InvocationResult::Success { output, response }
        }
        Err(e) => {
            log::debug!("[{}] {} failed: {}", id, request.operation, e);
            InvocationResult::Failure(translate_error(e, client, request.operation))
        }
    }
}

/// Maps a client error onto the command error taxonomy. Name-resolution failures are
/// rewrapped with the endpoint and region; everything else passes through unchanged.
pub fn translate_error(
    error: ClientError,
    client: &dyn BackendClient,
    operation: &'static str,
) -> CommandError {
    match error {
        ClientError::Transport(source) if is_name_resolution_failure(&source) => {
            CommandError::NameResolution {
                message: format!(
                    "Name resolution failure attempting to reach service endpoint '{}' (region '{}'). \
                     Check that the region is valid for this service and that the host can be \
                     resolved from this network.",
                    client.endpoint(),
                    client.region()
                ),
                source,
            }
        }
        ClientError::Transport(source) => CommandError::Transport { source },
        ClientError::Service { code, message } => CommandError::Backend {
            operation,
            code,
            message,
        },
    }
}

/// Walks the source chain looking for a resolver failure.
pub fn is_name_resolution_failure(error: &BoxError) -> bool {
    let mut current: Option<&(dyn Error + 'static)> = Some(&**error);
    while let Some(err) = current {
        let message = err.to_string().to_lowercase();
        if NAME_RESOLUTION_MARKERS.iter().any(|m| message.contains(m)) {
            return true;
        }
        current = err.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::DryRunClient,
        core::{
            binder::{self, InvocationInput},
            context::{BindingMode, build_context},
        },
        models::{CommandSpec, ConfirmImpact},
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::{fmt, io, time::Duration};

    static TEST_SPEC: CommandSpec = CommandSpec {
        name: "DescribeHub",
        verb: "get",
        noun: "hub",
        noun_aliases: &[],
        operation: "DescribeHub",
        about: "test",
        parameters: &[],
        response_fields: &["HubArn"],
        default_select: "HubArn",
        confirm_impact: ConfirmImpact::None,
    };

    fn context() -> ExecutionContext {
        let bound = binder::bind(&TEST_SPEC, &InvocationInput::new()).unwrap();
        build_context(&TEST_SPEC, bound, None, BindingMode::Strict).unwrap()
    }

    #[derive(Debug)]
    struct Wrapped {
        message: &'static str,
        inner: io::Error,
    }

    impl fmt::Display for Wrapped {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Wrapped {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.inner)
        }
    }

    enum Behaviour {
        Respond(Value),
        Fail(fn() -> ClientError),
        Hang,
    }

    struct ScriptedClient(Behaviour);

    #[async_trait]
    impl BackendClient for ScriptedClient {
        fn endpoint(&self) -> &str {
            "https://securityhub.mars-north-1.amazonaws.com"
        }

        fn region(&self) -> &str {
            "mars-north-1"
        }

        async fn invoke(
            &self,
            _request: &BackendRequest,
            _cancellation_token: &CancellationToken,
        ) -> Result<Value, ClientError> {
            match &self.0 {
                Behaviour::Respond(v) => Ok(v.clone()),
                Behaviour::Fail(make) => Err(make()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Value::Null)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_success_is_projected() {
        let client = ScriptedClient(Behaviour::Respond(json!({ "HubArn": "arn:hub" })));
        let ctx = context();
        let result = invoke(
            &client,
            &ctx,
            BackendRequest::new("DescribeHub"),
            &CancellationToken::new(),
        )
        .await;
        let InvocationResult::Success { output, response } = result else {
            panic!("Expected success");
        };
        assert_eq!(output, json!("arn:hub"));
        assert_eq!(response, json!({ "HubArn": "arn:hub" }));
    }

    #[tokio::test]
    async fn test_cancellation_interrupts_a_hanging_call() {
        let client = ScriptedClient(Behaviour::Hang);
        let ctx = context();
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            invoke(&client, &ctx, BackendRequest::new("DescribeHub"), &token),
        )
        .await
        .expect("invoke must observe cancellation promptly");
        assert!(result.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancellation_wins_over_a_ready_response() {
        let client = DryRunClient::new("us-east-1", None);
        let token = CancellationToken::new();
        token.cancel();
        let result = invoke(&client, &context(), BackendRequest::new("DescribeHub"), &token).await;
        assert!(result.is_cancelled());
    }

    #[tokio::test]
    async fn test_name_resolution_failure_is_enriched() {
        let client = ScriptedClient(Behaviour::Fail(|| {
            ClientError::Transport(Box::new(Wrapped {
                message: "error sending request",
                inner: io::Error::other("failed to lookup address information: Name or service not known"),
            }))
        }));
        let result = invoke(
            &client,
            &context(),
            BackendRequest::new("DescribeHub"),
            &CancellationToken::new(),
        )
        .await;
        let InvocationResult::Failure(CommandError::NameResolution { message, source }) = result
        else {
            panic!("Expected a name resolution failure");
        };
        assert!(message.contains("https://securityhub.mars-north-1.amazonaws.com"));
        assert!(message.contains("mars-north-1"));
        assert_eq!(source.to_string(), "error sending request");
    }

    #[tokio::test]
    async fn test_other_transport_failures_pass_through() {
        let client = ScriptedClient(Behaviour::Fail(|| {
            ClientError::Transport(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }));
        let result = invoke(
            &client,
            &context(),
            BackendRequest::new("DescribeHub"),
            &CancellationToken::new(),
        )
        .await;
        let InvocationResult::Failure(err) = result else {
            panic!("Expected failure");
        };
        assert!(matches!(err, CommandError::Transport { .. }));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn test_service_errors_become_backend_errors() {
        let client = ScriptedClient(Behaviour::Fail(|| ClientError::Service {
            code: "InvalidAccessException".to_string(),
            message: "Account is not subscribed to AWS Security Hub".to_string(),
        }));
        let result = invoke(
            &client,
            &context(),
            BackendRequest::new("DescribeHub"),
            &CancellationToken::new(),
        )
        .await;
        assert!(matches!(
            result,
            InvocationResult::Failure(CommandError::Backend { operation: "DescribeHub", ref code, .. })
                if code == "InvalidAccessException"
        ));
    }

    #[test]
    fn test_name_resolution_detection_checks_whole_chain() {
        let direct: BoxError = Box::new(io::Error::other("dns error: no record found"));
        assert!(is_name_resolution_failure(&direct));

        let nested: BoxError = Box::new(Wrapped {
            message: "request failed",
            inner: io::Error::other("No such host is known. (os error 11001)"),
        });
        assert!(is_name_resolution_failure(&nested));

        let unrelated: BoxError = Box::new(io::Error::other("tls handshake eof"));
        assert!(!is_name_resolution_failure(&unrelated));
    }
}
