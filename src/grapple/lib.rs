//! # Grapple Architecture
//!
//! Grapple keeps a handful of **file marks per project** (or per VCS branch)
//! and lets an editor jump between them by a stable number. It is a library
//! first: an editor plugin drives the API directly, and the bundled `grapple`
//! binary is one more client.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - Saves the configuration when the invocation ends         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Parses mark ids, emits change events                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Operates on the active project's mark list               │
//! │  - Returns CmdResult, never prints                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Config + Storage (config.rs, merge.rs, store/)             │
//! │  - Layered JSON config: defaults < cache < user < overrides │
//! │  - Refresh-merge on save; FileStore / InMemoryStore         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stable Indexes
//!
//! Marks are addressed by a 1-based index that does not move when an earlier
//! mark is removed: the removed slot becomes a hole. See [`marks`] for the list
//! invariants and [`index`] for how user input maps onto slots.
//!
//! ## Logging
//!
//! Library code logs through `tracing` and never prints. The binary installs a
//! subscriber on stderr filtered by `GRAPPLE_LOG`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`config`]: Layer loading, repair pass, refresh-merge save
//! - [`merge`]: The typed layer merge
//! - [`store`]: Storage abstraction and implementations
//! - [`marks`]: The sparse mark list
//! - [`index`]: Mark ids and the stable/dense numberings
//! - [`nav`]: Goto, next and previous resolution
//! - [`menu`]: The list-editor session
//! - [`editor`]: External editor integration
//! - [`events`]: Change listeners
//! - [`paths`]: Project keys and filename normalization
//! - [`model`]: Core data types
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod index;
pub mod init;
pub mod marks;
pub mod menu;
pub mod merge;
pub mod model;
pub mod nav;
pub mod paths;
pub mod store;
