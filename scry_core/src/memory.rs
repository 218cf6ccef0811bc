use std::cell::Cell;
use std::cell::RefCell;

use indexmap::IndexMap;
use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::DocumentId;
use crate::ScryError;
use crate::ScryResult;
use crate::metadata::StructuralData;
use crate::outline;
use crate::providers::ContentLoader;
use crate::providers::CurrentDocumentProvider;
use crate::providers::DocumentLookup;
use crate::providers::FrontmatterProvider;
use crate::providers::MutationEditor;
use crate::providers::StructuralProvider;

/// A document held by a [`MemoryVault`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
	/// `None` when the document has no frontmatter at all.
	pub frontmatter: Option<Map<String, Value>>,
	/// Markdown body, without frontmatter.
	pub body: String,
	pub created_unix_ms: u64,
	pub modified_unix_ms: u64,
	/// Reported under `file` next to the structural fields.
	pub extra: Map<String, Value>,
}

impl MemoryDocument {
	pub fn new(frontmatter: Map<String, Value>, body: impl Into<String>) -> Self {
		Self {
			frontmatter: Some(frontmatter),
			body: body.into(),
			..Self::default()
		}
	}

	/// A document with a body and no frontmatter block.
	pub fn body_only(body: impl Into<String>) -> Self {
		Self {
			body: body.into(),
			..Self::default()
		}
	}
}

/// Documents kept in memory. Implements every collaborator, so it can back a
/// [`crate::Scrier`] directly.
#[derive(Debug, Default)]
pub struct MemoryVault {
	documents: RefCell<IndexMap<DocumentId, MemoryDocument>>,
	active: RefCell<Option<DocumentId>>,
	failure: RefCell<Option<String>>,
	edits: Cell<usize>,
}

impl MemoryVault {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_document(self, id: impl Into<DocumentId>, document: MemoryDocument) -> Self {
		self.insert(id, document);
		self
	}

	pub fn with_active(self, id: impl Into<DocumentId>) -> Self {
		self.set_active(Some(id.into()));
		self
	}

	pub fn insert(&self, id: impl Into<DocumentId>, document: MemoryDocument) {
		self.documents.borrow_mut().insert(id.into(), document);
	}

	pub fn remove(&self, id: &str) -> Option<MemoryDocument> {
		self.documents.borrow_mut().shift_remove(id)
	}

	pub fn set_active(&self, id: Option<DocumentId>) {
		*self.active.borrow_mut() = id;
	}

	/// A copy of the stored document.
	pub fn document(&self, id: &str) -> Option<MemoryDocument> {
		self.documents.borrow().get(id).cloned()
	}

	/// Every identifier, in insertion order.
	pub fn ids(&self) -> Vec<DocumentId> {
		self.documents.borrow().keys().cloned().collect()
	}

	/// Make every following edit fail with `message`, or succeed again with
	/// `None`.
	pub fn fail_edits(&self, message: Option<&str>) {
		*self.failure.borrow_mut() = message.map(str::to_string);
	}

	/// Number of edits applied so far.
	pub fn edit_count(&self) -> usize {
		self.edits.get()
	}

	fn read<T>(&self, handle: &DocumentHandle, f: impl FnOnce(&MemoryDocument) -> T) -> ScryResult<T> {
		self.documents
			.borrow()
			.get(handle.id())
			.map(f)
			.ok_or_else(|| ScryError::DocumentNotFound(handle.id().to_string()))
	}

	fn edit(
		&self,
		handle: &DocumentHandle,
		f: impl FnOnce(&mut Map<String, Value>),
	) -> ScryResult<()> {
		if let Some(message) = self.failure.borrow().as_deref() {
			return Err(ScryError::provider("editor", message));
		}

		let mut documents = self.documents.borrow_mut();
		let document = documents
			.get_mut(handle.id())
			.ok_or_else(|| ScryError::DocumentNotFound(handle.id().to_string()))?;
		f(document.frontmatter.get_or_insert_with(Map::new));
		document.modified_unix_ms += 1;
		self.edits.set(self.edits.get() + 1);

		Ok(())
	}
}

impl CurrentDocumentProvider for MemoryVault {
	fn active(&self) -> Option<DocumentHandle> {
		self.active.borrow().as_ref().map(DocumentHandle::new)
	}
}

impl DocumentLookup for MemoryVault {
	fn by_identifier(&self, id: &str) -> Option<DocumentHandle> {
		self.documents
			.borrow()
			.get_key_value(id)
			.map(|(id, _)| DocumentHandle::new(id))
	}
}

impl FrontmatterProvider for MemoryVault {
	fn frontmatter(&self, handle: &DocumentHandle) -> ScryResult<Option<Map<String, Value>>> {
		self.read(handle, |document| document.frontmatter.clone())
	}
}

impl StructuralProvider for MemoryVault {
	fn structure(&self, handle: &DocumentHandle) -> ScryResult<StructuralData> {
		let (body, created_unix_ms, modified_unix_ms, extra) = self.read(handle, |document| {
			(
				document.body.clone(),
				document.created_unix_ms,
				document.modified_unix_ms,
				document.extra.clone(),
			)
		})?;

		Ok(StructuralData {
			path: handle.id().clone(),
			created_unix_ms,
			modified_unix_ms,
			size: body.len() as u64,
			raw_sections: outline::headings(&body, 0)?,
			extra,
		})
	}
}

impl ContentLoader for MemoryVault {
	fn load_section(&self, handle: &DocumentHandle, heading: &str) -> ScryResult<String> {
		let body = self.read(handle, |document| document.body.clone())?;
		outline::section_text(&body, heading)?.ok_or_else(|| {
			ScryError::provider(
				"content loader",
				format!("`{}` has no section `{heading}`", handle.id()),
			)
		})
	}
}

impl MutationEditor for MemoryVault {
	fn patch(&self, handle: &DocumentHandle, data: &Map<String, Value>) -> ScryResult<()> {
		self.edit(handle, |frontmatter| {
			for (key, value) in data {
				frontmatter.insert(key.clone(), value.clone());
			}
		})
	}

	fn set(&self, handle: &DocumentHandle, frontmatter: &Map<String, Value>) -> ScryResult<()> {
		self.edit(handle, |existing| existing.clone_from(frontmatter))
	}

	fn clear(&self, handle: &DocumentHandle, keys: &[String]) -> ScryResult<()> {
		self.edit(handle, |frontmatter| {
			for key in keys {
				frontmatter.shift_remove(key);
			}
		})
	}
}
