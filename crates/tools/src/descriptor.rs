use crate::context::ToolContext;
use crate::error::{ToolError, ValidationError};
use crate::schema::{Describe, Schema};
use crate::traits::Tool;
use async_trait::async_trait;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Input that passed a descriptor's schema. Only [`ToolDescriptor::validate`]
/// can produce one, so tool functions never see raw payloads.
pub struct ValidatedInput {
    tool_id: String,
    value: Box<dyn Any + Send>,
}

impl ValidatedInput {
    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }
}

impl fmt::Debug for ValidatedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedInput")
            .field("tool_id", &self.tool_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
trait ErasedTool: Send + Sync {
    fn validate(&self, raw: Value) -> Result<Box<dyn Any + Send>, ValidationError>;

    async fn invoke(
        &self,
        ctx: ToolContext,
        input: Box<dyn Any + Send>,
    ) -> Result<Value, ToolError>;
}

struct Typed<T: Tool> {
    tool: T,
    input: Schema<T::Input>,
}

#[async_trait]
impl<T: Tool> ErasedTool for Typed<T> {
    fn validate(&self, raw: Value) -> Result<Box<dyn Any + Send>, ValidationError> {
        let parsed = self.input.parse(raw)?;
        Ok(Box::new(parsed))
    }

    async fn invoke(
        &self,
        ctx: ToolContext,
        input: Box<dyn Any + Send>,
    ) -> Result<Value, ToolError> {
        let input = input
            .downcast::<T::Input>()
            .map_err(|_| ToolError::internal("validated input has the wrong type"))?;
        let output = self.tool.call(ctx, *input).await?;
        serde_json::to_value(output).map_err(ToolError::internal)
    }
}

/// Registry entry: identity, metadata, published schemas and the callable.
pub struct ToolDescriptor {
    id: String,
    name: String,
    description: String,
    input_schema: Value,
    output_schema: Option<Value>,
    inner: Arc<dyn ErasedTool>,
}

impl ToolDescriptor {
    pub fn new<T: Tool>(tool: T) -> Self {
        let input = Schema::<T::Input>::new();
        let output_schema = tool
            .declares_output()
            .then(|| Schema::<T::Output>::new().describe());

        Self {
            id: tool.id().to_string(),
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            input_schema: input.describe(),
            output_schema,
            inner: Arc::new(Typed { tool, input }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    pub fn output_schema(&self) -> Option<&Value> {
        self.output_schema.as_ref()
    }

    pub fn validate(&self, raw: Value) -> Result<ValidatedInput, ValidationError> {
        let value = self.inner.validate(raw)?;
        Ok(ValidatedInput {
            tool_id: self.id.clone(),
            value,
        })
    }

    pub async fn invoke(
        &self,
        ctx: ToolContext,
        input: ValidatedInput,
    ) -> Result<Value, ToolError> {
        if input.tool_id != self.id {
            return Err(ToolError::internal(format!(
                "input validated for {} passed to {}",
                input.tool_id, self.id
            )));
        }
        self.inner.invoke(ctx, input.value).await
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
