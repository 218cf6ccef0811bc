use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Map;
use serde_json::Value;

use crate::DocumentId;
use crate::ScryResult;
use crate::deep;
use crate::deep::Fallback;
use crate::deep::Update;
use crate::path::AsPath;

/// A document's scratch mapping. Clones share the same underlying map, so a
/// value written through one handle is visible through every other.
///
/// Never written back to the document.
#[derive(Debug, Clone, Default)]
pub struct Cache(Rc<RefCell<Map<String, Value>>>);

impl Cache {
	pub fn get<P>(&self, path: &P) -> Option<Value>
	where
		P: AsPath + ?Sized,
	{
		self.with(|map| {
			let path = path.as_path();
			let (first, rest) = path.split_first()?;
			let head = map.get(first.as_key().as_ref())?;
			deep::get(head, rest).cloned()
		})
	}

	pub fn get_or<'f, P>(&self, path: &P, fallback: impl Into<Fallback<'f>>) -> Value
	where
		P: AsPath + ?Sized,
	{
		match self.get(path) {
			Some(value) => value,
			None => Fallback::from_into(fallback),
		}
	}

	pub fn contains<P>(&self, path: &P) -> bool
	where
		P: AsPath + ?Sized,
	{
		self.get(path).is_some()
	}

	/// Write `value` at `path`. A factory may read this cache while it runs;
	/// the map is only borrowed again once the new value is ready.
	pub fn set<'f, P>(&self, path: &P, value: impl Into<Update<'f>>) -> ScryResult<()>
	where
		P: AsPath + ?Sized,
	{
		let mut map = self.snapshot();
		deep::set_in_map(&mut map, path, value)?;
		*self.0.borrow_mut() = map;

		Ok(())
	}

	pub fn remove(&self, key: &str) -> Option<Value> {
		self.0.borrow_mut().shift_remove(key)
	}

	pub fn clear(&self) {
		self.0.borrow_mut().clear();
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}

	/// Run `f` with read access to the map.
	pub fn with<R>(&self, f: impl FnOnce(&Map<String, Value>) -> R) -> R {
		f(&self.0.borrow())
	}

	/// A copy of the current contents.
	pub fn snapshot(&self) -> Map<String, Value> {
		self.0.borrow().clone()
	}

	/// Whether both handles point at the same mapping.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}

/// Per-session store of document caches, created empty and dropped or cleared
/// when the session ends.
#[derive(Debug, Default)]
pub struct CacheStore {
	entries: RefCell<HashMap<DocumentId, Cache>>,
}

impl CacheStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// The cache for `id`, created empty on first access.
	pub fn cache_for(&self, id: &DocumentId) -> Cache {
		self.entries
			.borrow_mut()
			.entry(id.clone())
			.or_default()
			.clone()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.entries.borrow().contains_key(id)
	}

	/// Drop the cache for one document. Existing handles keep their contents
	/// but are no longer returned by [`CacheStore::cache_for`].
	pub fn forget(&self, id: &str) -> Option<Cache> {
		self.entries.borrow_mut().remove(id)
	}

	pub fn clear(&self) {
		self.entries.borrow_mut().clear();
	}

	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}
