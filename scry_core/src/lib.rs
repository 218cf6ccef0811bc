//! `scry_core` reads and writes per-document metadata gathered from several
//! independent providers, and gives path based access to arbitrary nested
//! `serde_json` data.
//!
//! ## Pipeline
//!
//! ```text
//! Source (current | identifier | handle | list)
//!   → SourceResolver (flattens lists, looks each document up)
//!   → dispatch (one result, or a map keyed by identifier for list sources)
//!   → Aggregator (frontmatter + `file` structural data + `cache` → Metadata)
//! ```
//!
//! ## Modules
//!
//! - [`deep`]: `get`/`get_or`/`contains`/`visit`/`set`/`remove` over nested values.
//! - [`config`]: configuration loaded from `scry.toml`.
//! - [`frontmatter`] and [`outline`]: the leading YAML block and the heading
//!   structure of a markdown document.
//!
//! ## Key Types
//!
//! - [`PropertyPath`]: an ordered list of key and index steps.
//! - [`Source`]: which document or documents an operation targets.
//! - [`Scried`]: a bare result or a map keyed by [`DocumentId`].
//! - [`Metadata`]: one document's merged frontmatter, `file` and `cache`.
//! - [`Scrier`]: the facade tying a [`Vault`] to a session [`CacheStore`].
//! - [`MemoryVault`] and [`MarkdownVault`]: ready made collaborators.
//!
//! ## Quick Start
//!
//! ```rust
//! use scry_core::MemoryDocument;
//! use scry_core::MemoryVault;
//! use scry_core::Scrier;
//! use scry_core::UpdateOptions;
//! use serde_json::json;
//!
//! let mut frontmatter = serde_json::Map::new();
//! frontmatter.insert("title".into(), json!("Today"));
//! let vault = MemoryVault::new()
//! 	.with_document("notes/today.md", MemoryDocument::new(frontmatter, "# Plans\n"))
//! 	.with_active("notes/today.md");
//! let scrier = Scrier::new(vault);
//!
//! let title = scrier.get_property(None::<&str>, "title").unwrap();
//! assert_eq!(title.into_one(), Some(Some(json!("Today"))));
//!
//! let patched = scrier
//! 	.patch_property("notes/today.md", "tags.0", &json!("work"), UpdateOptions::default())
//! 	.unwrap();
//! assert!(patched.is_one());
//! ```

pub use access::*;
pub use aggregate::*;
pub use cache::*;
pub use collect::*;
pub use config::*;
pub use deep::Fallback;
pub use deep::ThenDo;
pub use deep::Update;
pub use dispatch::*;
pub use document::*;
pub use error::*;
pub use markdown_vault::*;
pub use memory::*;
pub use metadata::*;
pub use path::*;
pub use providers::*;
pub use scrier::*;
pub use sections::*;
pub use source::*;

mod access;
mod aggregate;
mod cache;
mod collect;
pub mod config;
pub mod deep;
mod dispatch;
mod document;
#[allow(unused_assignments)]
mod error;
pub mod frontmatter;
mod markdown_vault;
mod memory;
mod metadata;
pub mod outline;
mod path;
mod providers;
mod scrier;
mod sections;
mod source;

#[cfg(test)]
mod __fixtures;
