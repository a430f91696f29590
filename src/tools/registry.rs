//! Tool Registry
//!
//! Ordered mapping of tool name to {description, implementation}. Seeded
//! with built-ins at process start, grown at runtime by committed tools.
//! Duplicate names are permitted; the last registration wins on lookup.

use crate::types::ToolSpec;

pub struct ToolRegistry {
    tools: Vec<ToolSpec>,
}

impl ToolRegistry {
    /// Build a registry from an ordered seed set.
    pub fn new(seed: Vec<ToolSpec>) -> Self {
        ToolRegistry { tools: seed }
    }

    /// Append a tool. No uniqueness check; a later registration with the
    /// same name shadows earlier ones in `find`.
    pub fn register(&mut self, tool: ToolSpec) {
        self.tools.push(tool);
    }

    /// Look up a tool by name. Resolution order: the last registered match
    /// is authoritative.
    pub fn find(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.iter().rev().find(|t| t.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Iterate (name, description) pairs in registration order, for prompt
    /// construction. Implementation text is never shown to the provider.
    pub fn catalog(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tools
            .iter()
            .map(|t| (t.name.as_str(), t.description.as_str()))
    }

    /// Clone the full ordered set (name + description + implementation)
    /// for persistence.
    pub fn export(&self) -> Vec<ToolSpec> {
        self.tools.clone()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(name: &str, implementation: &str) -> ToolSpec {
        ToolSpec {
            name: name.to_string(),
            description: format!("test tool {name}"),
            implementation: implementation.to_string(),
        }
    }

    #[test]
    fn test_find_returns_last_registration() {
        let mut registry = ToolRegistry::new(vec![tool("greet", "1")]);
        registry.register(tool("greet", "2"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find("greet").unwrap().implementation, "2");
    }

    #[test]
    fn test_find_missing_tool() {
        let registry = ToolRegistry::new(vec![tool("greet", "1")]);
        assert!(registry.find("no_such_tool").is_none());
    }

    #[test]
    fn test_catalog_order_and_shape() {
        let registry = ToolRegistry::new(vec![tool("a", "1"), tool("b", "2")]);

        let pairs: Vec<(&str, &str)> = registry.catalog().collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "a");
        assert_eq!(pairs[1].0, "b");
        // The catalog carries descriptions, never implementations.
        assert!(pairs.iter().all(|(_, d)| d.starts_with("test tool")));
    }

    #[test]
    fn test_export_preserves_order() {
        let mut registry = ToolRegistry::new(vec![tool("a", "1")]);
        registry.register(tool("b", "2"));

        let exported = registry.export();
        assert_eq!(exported[0].name, "a");
        assert_eq!(exported[1].name, "b");
    }
}
