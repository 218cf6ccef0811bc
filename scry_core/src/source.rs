use serde_json::Value;

use crate::DocumentHandle;
use crate::DocumentId;
use crate::ScryError;
use crate::ScryResult;
use crate::deep;
use crate::metadata::FILE_KEY;
use crate::path::Step;
use crate::providers::CurrentDocumentProvider;
use crate::providers::DocumentLookup;

/// Which document or documents an operation targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Source {
	/// The active document.
	#[default]
	Current,
	Id(DocumentId),
	Handle(DocumentHandle),
	/// Any number of sources, flattened when resolved. Always produces a
	/// keyed result, even with a single element.
	Many(Vec<Source>),
}

impl Source {
	pub fn many<I, S>(sources: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Source>,
	{
		Self::Many(sources.into_iter().map(Into::into).collect())
	}

	pub fn is_many(&self) -> bool {
		matches!(self, Self::Many(_))
	}

	/// Read a source from JSON: `null` is the active document, a string is an
	/// identifier, an array is many sources, and an object is treated as
	/// aggregated metadata identified by its `file.path`.
	pub fn from_metadata_value(value: &Value) -> ScryResult<Self> {
		match value {
			Value::Null => Ok(Self::Current),
			Value::String(id) => Ok(Self::Id(DocumentId::new(id.as_str()))),
			Value::Array(items) => {
				items
					.iter()
					.map(Self::from_metadata_value)
					.collect::<ScryResult<Vec<_>>>()
					.map(Self::Many)
			}
			other => {
				let path = [Step::key(FILE_KEY), Step::key("path")];
				match deep::get(other, &path[..]) {
					Some(Value::String(id)) => Ok(Self::Id(DocumentId::new(id.as_str()))),
					_ => Err(ScryError::DocumentNotFound(other.to_string())),
				}
			}
		}
	}
}

impl From<&str> for Source {
	fn from(id: &str) -> Self {
		Self::Id(id.into())
	}
}

impl From<String> for Source {
	fn from(id: String) -> Self {
		Self::Id(id.into())
	}
}

impl From<DocumentId> for Source {
	fn from(id: DocumentId) -> Self {
		Self::Id(id)
	}
}

impl From<&DocumentId> for Source {
	fn from(id: &DocumentId) -> Self {
		Self::Id(id.clone())
	}
}

impl From<DocumentHandle> for Source {
	fn from(handle: DocumentHandle) -> Self {
		Self::Handle(handle)
	}
}

impl From<&DocumentHandle> for Source {
	fn from(handle: &DocumentHandle) -> Self {
		Self::Handle(handle.clone())
	}
}

impl<T: Into<Source>> From<Vec<T>> for Source {
	fn from(sources: Vec<T>) -> Self {
		Self::many(sources)
	}
}

impl<T: Into<Source>> From<Option<T>> for Source {
	fn from(source: Option<T>) -> Self {
		source.map_or(Self::Current, Into::into)
	}
}

/// Turns [`Source`]s into concrete document handles.
#[derive(Debug)]
pub struct SourceResolver<'v, V: ?Sized> {
	vault: &'v V,
}

impl<'v, V> SourceResolver<'v, V>
where
	V: CurrentDocumentProvider + DocumentLookup + ?Sized,
{
	pub fn new(vault: &'v V) -> Self {
		Self { vault }
	}

	/// Resolve every document `source` names, in order. Nested sources are
	/// flattened and duplicates are kept.
	pub fn resolve_all(&self, source: &Source) -> ScryResult<Vec<DocumentHandle>> {
		let mut handles = Vec::new();
		self.collect(source, &mut handles)?;
		tracing::debug!(count = handles.len(), "resolved source");

		Ok(handles)
	}

	/// Resolve `source` to exactly one document.
	pub fn resolve_one(&self, source: &Source) -> ScryResult<DocumentHandle> {
		let mut handles = self.resolve_all(source)?;
		if handles.len() != 1 {
			return Err(ScryError::AmbiguousSource {
				count: handles.len(),
			});
		}

		Ok(handles.remove(0))
	}

	/// Look up a document by identifier.
	pub fn lookup(&self, id: &str) -> ScryResult<DocumentHandle> {
		self.vault
			.by_identifier(id)
			.ok_or_else(|| ScryError::DocumentNotFound(id.to_string()))
	}

	fn collect(&self, source: &Source, handles: &mut Vec<DocumentHandle>) -> ScryResult<()> {
		match source {
			Source::Current => {
				let handle = self.vault.active().ok_or(ScryError::NoCurrentDocument)?;
				tracing::trace!(document = %handle, "resolved active document");
				handles.push(handle);
			}
			Source::Id(id) => handles.push(self.lookup(id)?),
			Source::Handle(handle) => handles.push(self.lookup(handle.id())?),
			Source::Many(sources) => {
				for source in sources {
					self.collect(source, handles)?;
				}
			}
		}

		Ok(())
	}
}
