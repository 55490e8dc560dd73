use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use toolgate_memory::SessionStateStore;

/// Per-invocation context handed to a tool.
///
/// Carries the caller's session (if any), a request id for log correlation,
/// the invocation deadline and a cancellation token that fires when the
/// caller goes away or the deadline passes.
#[derive(Clone)]
pub struct ToolContext {
    request_id: String,
    tool_id: String,
    session_id: Option<String>,
    deadline: Instant,
    cancel: CancellationToken,
    state: Arc<SessionStateStore>,
}

impl ToolContext {
    pub fn new(
        tool_id: impl Into<String>,
        session_id: Option<String>,
        state: Arc<SessionStateStore>,
        timeout: Duration,
    ) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            tool_id: tool_id.into(),
            session_id,
            deadline: Instant::now() + timeout,
            cancel: CancellationToken::new(),
            state,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the invocation is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// State this tool kept under the caller's session. Always `None` for
    /// calls without a session.
    pub fn load_state(&self) -> Option<Value> {
        let session = self.session_id.as_deref()?;
        self.state.get(session, &self.tool_id)
    }

    /// Persists state for this tool under the caller's session. Returns
    /// `false` when the call has no session to store it under.
    pub fn store_state(&self, value: Value) -> bool {
        match self.session_id.as_deref() {
            Some(session) => {
                self.state.set(session, &self.tool_id, value);
                true
            }
            None => false,
        }
    }
}
