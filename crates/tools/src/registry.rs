use crate::descriptor::ToolDescriptor;
use crate::error::RegistryError;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered set of tools, assembled once at startup and shared read-only.
pub struct ToolRegistry {
    tools: Vec<Arc<ToolDescriptor>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Appends a group of descriptors in order. The whole group is rejected,
    /// leaving the registry unchanged, if any id is already registered or
    /// repeated within the group.
    pub fn register<I>(&mut self, descriptors: I) -> Result<&mut Self, RegistryError>
    where
        I: IntoIterator<Item = ToolDescriptor>,
    {
        let batch: Vec<ToolDescriptor> = descriptors.into_iter().collect();

        let mut seen = std::collections::HashSet::new();
        for descriptor in &batch {
            if self.index.contains_key(descriptor.id()) || !seen.insert(descriptor.id()) {
                return Err(RegistryError::DuplicateTool(descriptor.id().to_string()));
            }
        }

        for descriptor in batch {
            tracing::debug!(tool = descriptor.id(), "Registering tool");
            self.index
                .insert(descriptor.id().to_string(), self.tools.len());
            self.tools.push(Arc::new(descriptor));
        }
        Ok(self)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Arc<ToolDescriptor>> {
        self.index.get(id).map(|&i| Arc::clone(&self.tools[i]))
    }

    /// All tools in registration order.
    pub fn list_all(&self) -> &[Arc<ToolDescriptor>] {
        &self.tools
    }

    pub fn ids(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.id().to_string()).collect()
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ToolContext;
    use crate::error::ToolError;
    use crate::traits::Tool;
    use async_trait::async_trait;
    use schemars::JsonSchema;
    use serde::Deserialize;
    use serde_json::Value;
    use validator::Validate;

    #[derive(Deserialize, JsonSchema, Validate)]
    struct NoInput {}

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        type Input = NoInput;
        type Output = Value;

        fn id(&self) -> &str {
            self.0
        }

        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "test tool"
        }

        async fn call(&self, _ctx: ToolContext, _input: NoInput) -> Result<Value, ToolError> {
            Ok(Value::Null)
        }
    }

    fn group(ids: &[&'static str]) -> Vec<ToolDescriptor> {
        ids.iter().map(|id| ToolDescriptor::new(Named(*id))).collect()
    }

    #[test]
    fn test_register_and_find() {
        let mut registry = ToolRegistry::new();
        registry.register(group(&["a", "b"])).unwrap();

        assert_eq!(registry.find_by_id("a").unwrap().id(), "a");
        assert!(registry.find_by_id("missing").is_none());
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn test_groups_concatenate_in_order() {
        let mut registry = ToolRegistry::new();
        registry
            .register(group(&["c", "a"]))
            .unwrap()
            .register(group(&["b"]))
            .unwrap();
        assert_eq!(registry.ids(), ["c", "a", "b"]);
    }

    #[test]
    fn test_duplicate_across_groups_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register(group(&["a"])).unwrap();

        let err = registry.register(group(&["b", "a"])).err().unwrap();
        assert_eq!(err, RegistryError::DuplicateTool("a".into()));
        assert_eq!(registry.ids(), ["a"]);
    }

    #[test]
    fn test_duplicate_within_group_rejected() {
        let mut registry = ToolRegistry::new();
        assert!(registry.register(group(&["x", "x"])).is_err());
        assert!(registry.is_empty());
    }
}
