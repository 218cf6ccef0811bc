//! The collaborators scry reads from and delegates writes to.
//!
//! Each concern is its own trait so hosts can back them with different
//! engines. [`Vault`] bundles them and is implemented for any type that
//! provides all of them.

use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::ScryResult;
use crate::metadata::StructuralData;

/// Knows which document the user is looking at.
pub trait CurrentDocumentProvider {
	fn active(&self) -> Option<DocumentHandle>;
}

/// Finds documents by identifier.
pub trait DocumentLookup {
	fn by_identifier(&self, id: &str) -> Option<DocumentHandle>;
}

/// The frontmatter index.
pub trait FrontmatterProvider {
	/// The document's frontmatter, or `None` when it has none.
	fn frontmatter(&self, handle: &DocumentHandle) -> ScryResult<Option<Map<String, Value>>>;
}

/// The derived-cache index: identifiers, timestamps and the raw heading list.
pub trait StructuralProvider {
	fn structure(&self, handle: &DocumentHandle) -> ScryResult<StructuralData>;
}

/// Loads the text under one heading. Only called when a section's content
/// is actually read.
pub trait ContentLoader {
	fn load_section(&self, handle: &DocumentHandle, heading: &str) -> ScryResult<String>;
}

/// Rewrites a document's frontmatter in place.
pub trait MutationEditor {
	/// Shallow-merge `data` into the existing frontmatter.
	fn patch(&self, handle: &DocumentHandle, data: &Map<String, Value>) -> ScryResult<()>;

	/// Replace the frontmatter with `frontmatter`.
	fn set(&self, handle: &DocumentHandle, frontmatter: &Map<String, Value>) -> ScryResult<()>;

	/// Remove the top level `keys` from the frontmatter. Absent keys are
	/// ignored.
	fn clear(&self, handle: &DocumentHandle, keys: &[String]) -> ScryResult<()>;
}

/// Every collaborator a [`crate::Scrier`] needs.
pub trait Vault:
	CurrentDocumentProvider
	+ DocumentLookup
	+ FrontmatterProvider
	+ StructuralProvider
	+ ContentLoader
	+ MutationEditor
{
}

impl<T> Vault for T where
	T: CurrentDocumentProvider
		+ DocumentLookup
		+ FrontmatterProvider
		+ StructuralProvider
		+ ContentLoader
		+ MutationEditor
{
}
