use crate::types::ToolSummary;
use toolgate_tools::{ToolDescriptor, ToolRegistry};

impl From<&ToolDescriptor> for ToolSummary {
    fn from(descriptor: &ToolDescriptor) -> Self {
        Self {
            id: descriptor.id().to_string(),
            name: descriptor.name().to_string(),
            description: descriptor.description().to_string(),
            input_schema: descriptor.input_schema().clone(),
            output_schema: descriptor.output_schema().cloned(),
        }
    }
}

/// Serializable description of every registered tool, in registry order.
pub fn describe_tools(registry: &ToolRegistry) -> Vec<ToolSummary> {
    registry
        .list_all()
        .iter()
        .map(|descriptor| ToolSummary::from(descriptor.as_ref()))
        .collect()
}
