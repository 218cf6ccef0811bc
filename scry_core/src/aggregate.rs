use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::ScryResult;
use crate::cache::CacheStore;
use crate::config::WriteConfig;
use crate::deep;
use crate::deep::Update;
use crate::metadata::FileData;
use crate::metadata::Metadata;
use crate::path::PropertyPath;
use crate::providers::Vault;
use crate::source::SourceResolver;

/// Redirects a write away from the document it was addressed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
	/// Write to the document's companion values document.
	pub to_values_file: bool,
	/// Write to the prototype document shared by the document's folder.
	pub prototype: bool,
}

impl UpdateOptions {
	pub fn values_file() -> Self {
		Self {
			to_values_file: true,
			prototype: false,
		}
	}

	pub fn prototype() -> Self {
		Self {
			to_values_file: false,
			prototype: true,
		}
	}

	fn redirects(self) -> bool {
		self.to_values_file || self.prototype
	}
}

/// The frontmatter keys a clear removes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ClearProperties {
	/// Every key.
	#[default]
	All,
	/// The named keys.
	Keys(Vec<String>),
	/// The keys present in a mapping, whatever their values.
	KeysOf(Map<String, Value>),
}

impl ClearProperties {
	/// The keys of `frontmatter` this selection removes, in frontmatter order.
	fn select(&self, frontmatter: &Map<String, Value>) -> Vec<String> {
		frontmatter
			.keys()
			.filter(|key| {
				match self {
					Self::All => true,
					Self::Keys(keys) => keys.iter().any(|name| name == *key),
					Self::KeysOf(map) => map.contains_key(key.as_str()),
				}
			})
			.cloned()
			.collect()
	}
}

impl From<&str> for ClearProperties {
	fn from(key: &str) -> Self {
		Self::Keys(vec![key.to_string()])
	}
}

impl From<Vec<String>> for ClearProperties {
	fn from(keys: Vec<String>) -> Self {
		Self::Keys(keys)
	}
}

impl From<Vec<&str>> for ClearProperties {
	fn from(keys: Vec<&str>) -> Self {
		Self::Keys(keys.into_iter().map(str::to_string).collect())
	}
}

impl From<Map<String, Value>> for ClearProperties {
	fn from(map: Map<String, Value>) -> Self {
		Self::KeysOf(map)
	}
}

impl<T: Into<ClearProperties>> From<Option<T>> for ClearProperties {
	fn from(properties: Option<T>) -> Self {
		properties.map_or(Self::All, Into::into)
	}
}

/// Builds merged metadata for one document and applies writes through the
/// vault's editor.
#[derive(Debug)]
pub struct Aggregator<'a, V: ?Sized> {
	vault: &'a V,
	caches: &'a CacheStore,
	write: &'a WriteConfig,
}

impl<'a, V> Aggregator<'a, V>
where
	V: Vault + ?Sized,
{
	pub fn new(vault: &'a V, caches: &'a CacheStore, write: &'a WriteConfig) -> Self {
		Self {
			vault,
			caches,
			write,
		}
	}

	/// Gather frontmatter, structural data and the cache into one view.
	/// Section text is not loaded.
	pub fn aggregate(&self, handle: &DocumentHandle) -> ScryResult<Metadata> {
		let frontmatter = self.vault.frontmatter(handle)?.unwrap_or_default();
		let structure = self.vault.structure(handle)?;
		let file = FileData::new(handle, structure);
		let cache = self.caches.cache_for(handle.id());
		tracing::debug!(
			document = %handle,
			keys = frontmatter.len(),
			sections = file.sections.len(),
			"aggregated metadata"
		);

		Ok(Metadata::new(handle.clone(), frontmatter, file, cache))
	}

	/// Shallow-merge `data` into the target's frontmatter.
	pub fn patch(
		&self,
		handle: &DocumentHandle,
		data: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let target = self.write_target(handle, options)?;
		tracing::debug!(document = %target, keys = data.len(), "patching frontmatter");
		self.vault.patch(&target, data)?;

		self.aggregate(&target)
	}

	/// Write `update` at `path` within the target's frontmatter and store the
	/// whole resulting frontmatter.
	pub fn patch_property<'f>(
		&self,
		handle: &DocumentHandle,
		path: &PropertyPath,
		update: impl Into<Update<'f>>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let target = self.write_target(handle, options)?;
		let mut frontmatter = self.vault.frontmatter(&target)?.unwrap_or_default();
		deep::set_in_map(&mut frontmatter, path, update)?;
		tracing::debug!(document = %target, %path, "patching frontmatter property");
		self.vault.set(&target, &frontmatter)?;

		self.aggregate(&target)
	}

	/// Replace the target's frontmatter with `frontmatter`.
	pub fn set(
		&self,
		handle: &DocumentHandle,
		frontmatter: &Map<String, Value>,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let target = self.write_target(handle, options)?;
		tracing::debug!(document = %target, keys = frontmatter.len(), "replacing frontmatter");
		self.vault.set(&target, frontmatter)?;

		self.aggregate(&target)
	}

	/// Remove the selected frontmatter keys from the target. The editor is not
	/// called when none of them are present.
	pub fn clear(
		&self,
		handle: &DocumentHandle,
		properties: &ClearProperties,
		options: UpdateOptions,
	) -> ScryResult<Metadata> {
		let target = self.write_target(handle, options)?;
		let frontmatter = self.vault.frontmatter(&target)?.unwrap_or_default();
		let keys = properties.select(&frontmatter);

		if keys.is_empty() {
			tracing::trace!(document = %target, "nothing to clear");
		} else {
			tracing::debug!(document = %target, ?keys, "clearing frontmatter keys");
			self.vault.clear(&target, &keys)?;
		}

		self.aggregate(&target)
	}

	/// The document a write addressed to `handle` lands in. The prototype
	/// substitution applies first, then the values document of the result.
	pub fn write_target(
		&self,
		handle: &DocumentHandle,
		options: UpdateOptions,
	) -> ScryResult<DocumentHandle> {
		if !options.redirects() {
			return Ok(handle.clone());
		}

		let mut id = handle.id().clone();
		if options.prototype {
			id = id.with_stem(&self.write.prototype_stem);
		}
		if options.to_values_file {
			let stem = format!("{}{}", id.stem(), self.write.values_suffix);
			id = id.with_stem(&stem);
		}

		tracing::debug!(from = %handle, to = %id, "redirected write");
		SourceResolver::new(self.vault).lookup(&id)
	}
}
