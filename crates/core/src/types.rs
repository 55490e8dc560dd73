use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of an invocation request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub tool: String,
    #[serde(default)]
    pub inputs: Option<Value>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ExecuteRequest {
    pub fn new(tool: impl Into<String>, inputs: Value) -> Self {
        Self {
            tool: tool.into(),
            inputs: Some(inputs),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecuteResponse {
    pub result: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolList {
    pub tools: Vec<ToolSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetResponse {
    pub success: bool,
}
