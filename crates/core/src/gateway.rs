use crate::error::GatewayError;
use crate::introspection::describe_tools;
use crate::metrics::Metrics;
use crate::types::{ExecuteRequest, ExecuteResponse, ResetResponse, ToolList};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::task::AbortOnDropHandle;
use toolgate_memory::SessionStateStore;
use toolgate_tools::{ToolContext, ToolError, ToolRegistry};
use tracing::{error, info, warn};

/// Resolves, validates and invokes tools on behalf of callers.
pub struct Gateway {
    registry: Arc<ToolRegistry>,
    sessions: Arc<SessionStateStore>,
    metrics: Arc<Metrics>,
    timeout: Duration,
}

impl Gateway {
    pub fn new(
        registry: Arc<ToolRegistry>,
        sessions: Arc<SessionStateStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            registry,
            sessions,
            metrics: Metrics::new(),
            timeout,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn sessions(&self) -> &SessionStateStore {
        &self.sessions
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse, GatewayError> {
        let ExecuteRequest {
            tool,
            inputs,
            session_id,
        } = request;

        let Some(descriptor) = self.registry.find_by_id(&tool) else {
            warn!(tool = %tool, "Rejected call to unknown tool");
            self.metrics.inc_rejected_tools();
            return Err(GatewayError::InvalidTool(tool));
        };

        let input = match descriptor.validate(inputs.unwrap_or(Value::Null)) {
            Ok(input) => input,
            Err(errors) => {
                warn!(tool = %tool, error = %errors, "Rejected tool input");
                self.metrics.inc_rejected_inputs();
                return Err(GatewayError::InvalidInput(errors));
            }
        };

        let ctx = ToolContext::new(
            descriptor.id(),
            session_id,
            Arc::clone(&self.sessions),
            self.timeout,
        );
        let request_id = ctx.request_id().to_string();
        // Cancels the tool's token however this call ends.
        let _cancel_on_exit = ctx.cancellation().clone().drop_guard();

        info!(tool = %tool, request_id = %request_id, session = ?ctx.session_id(), "Dispatching tool");
        self.metrics.inc_invocations();

        // Aborted if this future is dropped, so a departed caller leaves no
        // tool running behind it.
        let handle =
            AbortOnDropHandle::new(tokio::spawn(async move { descriptor.invoke(ctx, input).await }));

        let outcome = match timeout(self.timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => {
                if join_err.is_panic() {
                    error!(tool = %tool, request_id = %request_id, "Tool panicked");
                } else {
                    error!(tool = %tool, request_id = %request_id, "Tool task was cancelled");
                }
                self.metrics.inc_internal_failures();
                return Err(GatewayError::InternalFailure);
            }
            Err(_) => {
                warn!(
                    tool = %tool,
                    request_id = %request_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Tool timed out"
                );
                self.metrics.inc_timeouts();
                return Err(GatewayError::Timeout);
            }
        };

        match outcome {
            Ok(result) => {
                self.metrics.inc_successes();
                Ok(ExecuteResponse { result })
            }
            Err(err) => Err(self.classify(&tool, &request_id, err)),
        }
    }

    fn classify(&self, tool: &str, request_id: &str, err: ToolError) -> GatewayError {
        match err {
            ToolError::Execution(message) => {
                warn!(tool, request_id, error = %message, "Tool failed");
                self.metrics.inc_tool_failures();
                GatewayError::ExecutionFailed(message)
            }
            ToolError::NotFound(message) => {
                self.metrics.inc_tool_failures();
                GatewayError::NotFound(message)
            }
            ToolError::Conflict(message) => {
                self.metrics.inc_tool_failures();
                GatewayError::Conflict(message)
            }
            ToolError::Internal(source) => {
                error!(tool, request_id, error = %source, "Tool raised an internal error");
                self.metrics.inc_internal_failures();
                GatewayError::InternalFailure
            }
        }
    }

    pub fn list_tools(&self) -> ToolList {
        ToolList {
            tools: describe_tools(&self.registry),
        }
    }

    /// Drops one session's tool state, or every session's when `session_id`
    /// is `None`. Unknown sessions are not an error.
    pub fn reset(&self, session_id: Option<&str>) -> ResetResponse {
        let dropped = self.sessions.reset(session_id);
        info!(session = ?session_id, dropped, "Reset tool sessions");
        self.metrics.add_session_resets(dropped as u64);
        ResetResponse { success: true }
    }
}
