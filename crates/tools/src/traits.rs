use crate::context::ToolContext;
use crate::error::ToolError;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

/// Anything a tool can accept: deserializable from JSON, describable as a
/// JSON Schema, and carrying its own constraint checks.
pub trait ToolInput: DeserializeOwned + JsonSchema + Validate + Send + 'static {}

impl<T> ToolInput for T where T: DeserializeOwned + JsonSchema + Validate + Send + 'static {}

pub trait ToolOutput: Serialize + JsonSchema + Send + 'static {}

impl<T> ToolOutput for T where T: Serialize + JsonSchema + Send + 'static {}

/// A statically typed tool. Erased into a [`ToolDescriptor`] for the registry.
///
/// `call` only ever receives an `Input` that passed deserialization and
/// `Validate`; the result is serialized from `Output`, so the published
/// output schema always matches what the tool returns.
///
/// [`ToolDescriptor`]: crate::descriptor::ToolDescriptor
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    type Input: ToolInput;
    type Output: ToolOutput;

    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Whether the output schema is published through introspection.
    fn declares_output(&self) -> bool {
        true
    }

    async fn call(&self, ctx: ToolContext, input: Self::Input) -> Result<Self::Output, ToolError>;
}
