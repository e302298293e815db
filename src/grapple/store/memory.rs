use super::{Layer, LayerStore};
use crate::error::Result;
use std::collections::HashMap;

/// In-memory layers for testing and development.
/// Does NOT persist data.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    layers: HashMap<Layer, String>,
    writes: usize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: Layer, contents: impl Into<String>) -> Self {
        self.layers.insert(layer, contents.into());
        self
    }

    /// Simulates another session rewriting a layer on disk.
    pub fn set_layer(&mut self, layer: Layer, contents: impl Into<String>) {
        self.layers.insert(layer, contents.into());
    }

    pub fn layer(&self, layer: Layer) -> Option<&str> {
        self.layers.get(&layer).map(String::as_str)
    }

    /// Number of cache writes so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl LayerStore for InMemoryStore {
    fn read(&self, layer: Layer) -> Result<Option<String>> {
        Ok(self.layers.get(&layer).cloned())
    }

    fn write_cache(&mut self, contents: &str) -> Result<()> {
        self.layers.insert(Layer::Cache, contents.to_string());
        self.writes += 1;
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use serde_json::{json, Value};

    /// Builds cache/user layers as JSON documents.
    #[derive(Default)]
    pub struct LayerFixture {
        cache: Option<Value>,
        user: Option<Value>,
    }

    impl LayerFixture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds `project` with the given marks to the cache layer.
        pub fn cache_project(mut self, project: &str, marks: Value) -> Self {
            let cache = self.cache.get_or_insert_with(|| json!({"projects": {}}));
            cache["projects"][project] = json!({"mark": {"marks": marks}});
            self
        }

        pub fn cache(mut self, value: Value) -> Self {
            self.cache = Some(value);
            self
        }

        pub fn user(mut self, value: Value) -> Self {
            self.user = Some(value);
            self
        }

        pub fn build(self) -> InMemoryStore {
            let mut store = InMemoryStore::new();
            if let Some(cache) = self.cache {
                store.set_layer(Layer::Cache, cache.to_string());
            }
            if let Some(user) = self.user {
                store.set_layer(Layer::User, user.to_string());
            }
            store
        }
    }
}
