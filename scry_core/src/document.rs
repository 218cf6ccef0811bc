use std::borrow::Borrow;
use std::fmt;
use std::fmt::Display;

use derive_more::Deref;
use serde::Deserialize;
use serde::Serialize;

/// The opaque `/` separated path naming a document, e.g. `notes/today.md`.
#[derive(
	Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Deref,
)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
	pub fn new(path: impl Into<String>) -> Self {
		Self(path.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The final path segment, e.g. `today.md`.
	pub fn name(&self) -> &str {
		self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, name)| name)
	}

	/// The containing folder, or `""` at the root.
	pub fn folder(&self) -> &str {
		self.0.rsplit_once('/').map_or("", |(folder, _)| folder)
	}

	/// The extension without its dot, or `""`. Dot files have no extension.
	pub fn extension(&self) -> &str {
		match self.name().rsplit_once('.') {
			Some((stem, extension)) if !stem.is_empty() => extension,
			_ => "",
		}
	}

	/// The name without its extension, e.g. `today`.
	pub fn stem(&self) -> &str {
		let name = self.name();
		match self.extension() {
			"" => name,
			extension => &name[..name.len() - extension.len() - 1],
		}
	}

	/// The full path without its extension, e.g. `notes/today`.
	pub fn without_extension(&self) -> &str {
		match self.extension() {
			"" => &self.0,
			extension => &self.0[..self.0.len() - extension.len() - 1],
		}
	}

	/// A document in the same folder with the same extension and a new stem.
	pub fn with_stem(&self, stem: &str) -> Self {
		let mut path = String::new();
		if !self.folder().is_empty() {
			path.push_str(self.folder());
			path.push('/');
		}
		path.push_str(stem);
		if !self.extension().is_empty() {
			path.push('.');
			path.push_str(self.extension());
		}

		Self(path)
	}
}

impl Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl Borrow<str> for DocumentId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for DocumentId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl From<&str> for DocumentId {
	fn from(path: &str) -> Self {
		Self(path.to_string())
	}
}

impl From<String> for DocumentId {
	fn from(path: String) -> Self {
		Self(path)
	}
}

impl From<&DocumentId> for DocumentId {
	fn from(id: &DocumentId) -> Self {
		id.clone()
	}
}

/// A collaborator's reference to a document. Only its identifier is visible
/// to scry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle {
	id: DocumentId,
}

impl DocumentHandle {
	pub fn new(id: impl Into<DocumentId>) -> Self {
		Self { id: id.into() }
	}

	pub fn id(&self) -> &DocumentId {
		&self.id
	}
}

impl Display for DocumentHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.id, f)
	}
}
