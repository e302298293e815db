//! # Storage Layer
//!
//! grapple persists to two JSON files that share one schema:
//!
//! - the **user** layer, hand-written by the user (never written by grapple),
//! - the **cache** layer, rewritten on every save.
//!
//! [`LayerStore`] abstracts where those files live so that the config logic can
//! be tested without touching the filesystem.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, one `grapple.json` in the platform
//!   config dir and one in the platform data dir.
//! - [`memory::InMemoryStore`]: in-memory layers for tests.
//!
//! Stores only move text around. Parsing, and the decision that a missing or
//! unreadable layer counts as empty, belong to [`crate::config`].

use crate::error::Result;

pub mod fs;
pub mod memory;

/// One of the two persisted config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    User,
    Cache,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::User => write!(f, "user"),
            Layer::Cache => write!(f, "cache"),
        }
    }
}

pub trait LayerStore {
    /// Raw contents of a layer, or `None` when it does not exist.
    fn read(&self, layer: Layer) -> Result<Option<String>>;

    /// Replaces the cache layer.
    fn write_cache(&mut self, contents: &str) -> Result<()>;
}
