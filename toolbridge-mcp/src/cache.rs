//! Snapshot of the tool descriptors last fetched from the server.

use std::sync::Arc;

use crate::types::ToolDescriptor;

/// The most recently fetched tool list.
///
/// Cloning is cheap and yields the same snapshot; a refresh builds a new
/// cache instead of editing this one, so earlier clones stay valid.
#[derive(Debug, Clone, Default)]
pub struct ToolCache {
    descriptors: Arc<[ToolDescriptor]>,
}

impl ToolCache {
    /// Build a cache from a freshly fetched list, keeping server order.
    #[must_use]
    pub fn new(descriptors: Vec<ToolDescriptor>) -> Self {
        Self {
            descriptors: descriptors.into(),
        }
    }

    /// The shared descriptor slice.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[ToolDescriptor]> {
        Arc::clone(&self.descriptors)
    }

    /// Look up a descriptor by tool name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Iterate descriptors in server order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.descriptors.iter()
    }

    /// Number of cached descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the server advertised no tools.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_server_order() {
        let cache = ToolCache::new(vec![
            ToolDescriptor::new("b", json!({})),
            ToolDescriptor::new("a", json!({})),
        ]);
        let names: Vec<&str> = cache.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_none());
    }

    #[test]
    fn snapshot_outlives_replacement() {
        let mut cache = ToolCache::new(vec![ToolDescriptor::new("old", json!({}))]);
        let before = cache.snapshot();
        cache = ToolCache::new(vec![ToolDescriptor::new("new", json!({}))]);
        assert_eq!(before[0].name, "old");
        assert_eq!(cache.snapshot()[0].name, "new");
    }

    #[test]
    fn default_is_empty() {
        assert!(ToolCache::default().is_empty());
    }
}
