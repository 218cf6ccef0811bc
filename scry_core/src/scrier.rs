use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::ScryResult;
use crate::aggregate::Aggregator;
use crate::aggregate::ClearProperties;
use crate::aggregate::UpdateOptions;
use crate::cache::Cache;
use crate::cache::CacheStore;
use crate::config::ScryConfig;
use crate::deep::Update;
use crate::dispatch::Scried;
use crate::dispatch::dispatch;
use crate::metadata::FileData;
use crate::metadata::Metadata;
use crate::path::AsPath;
use crate::path::PropertyPath;
use crate::providers::Vault;
use crate::sections::Sections;
use crate::source::Source;
use crate::source::SourceResolver;

/// Read and write merged document metadata over a [`Vault`].
///
/// Every operation takes a [`Source`] and returns a [`Scried`]: a bare value
/// for a single source and a map keyed by identifier for a list source.
/// The scrier owns the session's [`CacheStore`].
#[derive(Debug)]
pub struct Scrier<V> {
	vault: V,
	caches: CacheStore,
	config: ScryConfig,
}

impl<V: Vault> Scrier<V> {
	pub fn new(vault: V) -> Self {
		Self::with_config(vault, ScryConfig::default())
	}

	pub fn with_config(vault: V, config: ScryConfig) -> Self {
		Self {
			vault,
			caches: CacheStore::new(),
			config,
		}
	}

	pub fn vault(&self) -> &V {
		&self.vault
	}

	pub fn config(&self) -> &ScryConfig {
		&self.config
	}

	pub fn caches(&self) -> &CacheStore {
		&self.caches
	}

	pub fn resolver(&self) -> SourceResolver<'_, V> {
		SourceResolver::new(&self.vault)
	}

	pub fn aggregator(&self) -> Aggregator<'_, V> {
		Aggregator::new(&self.vault, &self.caches, &self.config.write)
	}

	/// Parse a path spec with the configured delimiter.
	pub fn path<P: AsPath + ?Sized>(&self, path: &P) -> PropertyPath {
		path.as_path_with(&self.config.delimiter).into_owned()
	}

	/// Run `op` for each document `source` resolves to.
	pub fn dispatch<T>(
		&self,
		source: impl Into<Source>,
		op: impl FnMut(&DocumentHandle) -> ScryResult<T>,
	) -> ScryResult<Scried<T>> {
		dispatch(&self.resolver(), &source.into(), op)
	}

	/// Merged metadata of each document.
	pub fn get(&self, source: impl Into<Source>) -> ScryResult<Scried<Metadata>> {
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| aggregator.aggregate(handle))
	}

	/// One property of each document's merged metadata, `None` when missing.
	pub fn get_property<P>(
		&self,
		source: impl Into<Source>,
		path: &P,
	) -> ScryResult<Scried<Option<Value>>>
	where
		P: AsPath + ?Sized,
	{
		let path = self.path(path);
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| Ok(aggregator.aggregate(handle)?.get(&path)))
	}

	pub fn frontmatter(&self, source: impl Into<Source>) -> ScryResult<Scried<Map<String, Value>>> {
		self.dispatch(source, |handle| {
			Ok(self.vault.frontmatter(handle)?.unwrap_or_default())
		})
	}

	pub fn file(&self, source: impl Into<Source>) -> ScryResult<Scried<FileData>> {
		self.dispatch(source, |handle| {
			Ok(FileData::new(handle, self.vault.structure(handle)?))
		})
	}

	pub fn cache(&self, source: impl Into<Source>) -> ScryResult<Scried<Cache>> {
		self.dispatch(source, |handle| Ok(self.caches.cache_for(handle.id())))
	}

	pub fn sections(&self, source: impl Into<Source>) -> ScryResult<Scried<Sections>> {
		self.dispatch(source, |handle| {
			let structure = self.vault.structure(handle)?;
			Ok(Sections::from_raw(handle, &structure.raw_sections))
		})
	}

	/// The text under `heading` in each document.
	pub fn load_section(
		&self,
		source: impl Into<Source>,
		heading: &str,
	) -> ScryResult<Scried<String>> {
		self.dispatch(source, |handle| self.vault.load_section(handle, heading))
	}

	/// Shallow-merge `data` into each document's frontmatter.
	pub fn patch(
		&self,
		source: impl Into<Source>,
		data: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Scried<Metadata>> {
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| aggregator.patch(handle, data, options))
	}

	/// Write `value` at `path` within each document's frontmatter.
	pub fn patch_property<P>(
		&self,
		source: impl Into<Source>,
		path: &P,
		value: &Value,
		options: UpdateOptions,
	) -> ScryResult<Scried<Metadata>>
	where
		P: AsPath + ?Sized,
	{
		let path = self.path(path);
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| {
			aggregator.patch_property(handle, &path, value.clone(), options)
		})
	}

	/// Replace the value at `path` within each document's frontmatter with
	/// `update(previous)`. `previous` is `None` when the path is missing.
	pub fn update_property<P>(
		&self,
		source: impl Into<Source>,
		path: &P,
		update: impl Fn(Option<&Value>) -> Value,
		options: UpdateOptions,
	) -> ScryResult<Scried<Metadata>>
	where
		P: AsPath + ?Sized,
	{
		let path = self.path(path);
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| {
			aggregator.patch_property(handle, &path, Update::factory(&update), options)
		})
	}

	/// Replace each document's frontmatter.
	pub fn set(
		&self,
		source: impl Into<Source>,
		frontmatter: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Scried<Metadata>> {
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| aggregator.set(handle, frontmatter, options))
	}

	pub fn clear(
		&self,
		source: impl Into<Source>,
		properties: impl Into<ClearProperties>,
		options: UpdateOptions,
	) -> ScryResult<Scried<Metadata>> {
		let properties = properties.into();
		let aggregator = self.aggregator();
		self.dispatch(source, |handle| aggregator.clear(handle, &properties, options))
	}

	/// A view of the active document.
	pub fn current(&self) -> ScryResult<CurrentDocument<'_, V>> {
		let handle = self.resolver().resolve_one(&Source::Current)?;
		let data = self.aggregator().aggregate(&handle)?;

		Ok(CurrentDocument {
			scrier: self,
			handle,
			data,
		})
	}

	/// Drop every document cache.
	pub fn end_session(&self) {
		tracing::debug!(documents = self.caches.len(), "ending session");
		self.caches.clear();
	}

	/// Drop one document's cache.
	pub fn forget(&self, id: &str) -> Option<Cache> {
		self.caches.forget(id)
	}
}

/// The active document and its metadata at the time it was read.
#[derive(Debug)]
pub struct CurrentDocument<'s, V> {
	scrier: &'s Scrier<V>,
	handle: DocumentHandle,
	data: Metadata,
}

impl<V: Vault> CurrentDocument<'_, V> {
	pub fn handle(&self) -> &DocumentHandle {
		&self.handle
	}

	pub fn data(&self) -> &Metadata {
		&self.data
	}

	/// The identifier without its extension, e.g. `notes/today`.
	pub fn path(&self) -> &str {
		self.handle.id().without_extension()
	}

	pub fn path_with_extension(&self) -> &str {
		self.handle.id().as_str()
	}

	pub fn matter(&self) -> &Map<String, Value> {
		self.data.frontmatter()
	}

	pub fn cache(&self) -> &Cache {
		self.data.cache()
	}

	pub fn sections(&self) -> &Sections {
		self.data.sections()
	}

	/// The write methods return the fresh metadata of the document written to.
	/// This view is refreshed when that is the active document itself.
	pub fn patch(
		&mut self,
		data: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let fresh = self.scrier.aggregator().patch(&self.handle, data, options)?;
		Ok(self.absorb(fresh))
	}

	pub fn patch_property<P>(
		&mut self,
		path: &P,
		value: &Value,
		options: UpdateOptions,
	) -> ScryResult<Metadata>
	where
		P: AsPath + ?Sized,
	{
		let path = self.scrier.path(path);
		let fresh = self
			.scrier
			.aggregator()
			.patch_property(&self.handle, &path, value.clone(), options)?;
		Ok(self.absorb(fresh))
	}

	pub fn set(
		&mut self,
		frontmatter: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let fresh = self.scrier.aggregator().set(&self.handle, frontmatter, options)?;
		Ok(self.absorb(fresh))
	}

	pub fn clear(
		&mut self,
		properties: impl Into<ClearProperties>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let fresh = self
			.scrier
			.aggregator()
			.clear(&self.handle, &properties.into(), options)?;
		Ok(self.absorb(fresh))
	}

	/// Re-read the document's metadata.
	pub fn refresh(&mut self) -> ScryResult<&Metadata> {
		self.data = self.scrier.aggregator().aggregate(&self.handle)?;
		Ok(&self.data)
	}

	fn absorb(&mut self, fresh: Metadata) -> Metadata {
		if fresh.id() == self.handle.id() {
			self.data = fresh.clone();
		}

		fresh
	}
}
