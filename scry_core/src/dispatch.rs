use indexmap::IndexMap;
use serde::Serialize;

use crate::DocumentHandle;
use crate::DocumentId;
use crate::ScryResult;
use crate::providers::CurrentDocumentProvider;
use crate::providers::DocumentLookup;
use crate::source::Source;
use crate::source::SourceResolver;

/// The result of an operation over a [`Source`].
///
/// A single, non-list source yields [`Scried::One`]. A list source yields
/// [`Scried::Many`] keyed by document identifier in resolution order, even
/// when the list resolves to a single document or to none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scried<T> {
	One(T),
	Many(IndexMap<DocumentId, T>),
}

impl<T> Scried<T> {
	pub fn is_one(&self) -> bool {
		matches!(self, Self::One(_))
	}

	pub fn is_many(&self) -> bool {
		matches!(self, Self::Many(_))
	}

	pub fn as_one(&self) -> Option<&T> {
		match self {
			Self::One(value) => Some(value),
			Self::Many(_) => None,
		}
	}

	pub fn into_one(self) -> Option<T> {
		match self {
			Self::One(value) => Some(value),
			Self::Many(_) => None,
		}
	}

	pub fn as_many(&self) -> Option<&IndexMap<DocumentId, T>> {
		match self {
			Self::One(_) => None,
			Self::Many(values) => Some(values),
		}
	}

	pub fn into_many(self) -> Option<IndexMap<DocumentId, T>> {
		match self {
			Self::One(_) => None,
			Self::Many(values) => Some(values),
		}
	}

	/// Number of results held.
	pub fn len(&self) -> usize {
		match self {
			Self::One(_) => 1,
			Self::Many(values) => values.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Every result regardless of shape, in resolution order.
	pub fn values(&self) -> Box<dyn Iterator<Item = &T> + '_> {
		match self {
			Self::One(value) => Box::new(std::iter::once(value)),
			Self::Many(values) => Box::new(values.values()),
		}
	}

	/// Transform each result while keeping the shape.
	pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Scried<U> {
		match self {
			Self::One(value) => Scried::One(f(value)),
			Self::Many(values) => {
				Scried::Many(values.into_iter().map(|(id, value)| (id, f(value))).collect())
			}
		}
	}
}

/// Resolve `source` and run `op` once per resolved document.
///
/// Duplicate documents in a list source run `op` again; the later result
/// replaces the earlier one and keeps its position.
pub fn dispatch<V, T, F>(
	resolver: &SourceResolver<'_, V>,
	source: &Source,
	mut op: F,
) -> ScryResult<Scried<T>>
where
	V: CurrentDocumentProvider + DocumentLookup + ?Sized,
	F: FnMut(&DocumentHandle) -> ScryResult<T>,
{
	let handles = resolver.resolve_all(source)?;

	if !source.is_many() {
		if let [handle] = handles.as_slice() {
			return op(handle).map(Scried::One);
		}
	}

	let mut results = IndexMap::with_capacity(handles.len());
	for handle in &handles {
		let value = op(handle)?;
		results.insert(handle.id().clone(), value);
	}

	Ok(Scried::Many(results))
}
