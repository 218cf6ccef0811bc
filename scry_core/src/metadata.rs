use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::DocumentId;
use crate::cache::Cache;
use crate::deep;
use crate::path::AsPath;
use crate::sections::RawSection;
use crate::sections::Sections;

/// Key holding structural data in a merged metadata object.
pub const FILE_KEY: &str = "file";
/// Key holding the document's cache in a merged metadata object.
pub const CACHE_KEY: &str = "cache";

/// What the structural provider knows about a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralData {
	pub path: DocumentId,
	#[serde(default)]
	pub created_unix_ms: u64,
	#[serde(default)]
	pub modified_unix_ms: u64,
	#[serde(default)]
	pub size: u64,
	#[serde(default)]
	pub raw_sections: Vec<RawSection>,
	/// Provider specific fields (tags, aliases, ...) surfaced under `file`.
	#[serde(default, flatten)]
	pub extra: Map<String, Value>,
}

/// The `file` part of a document's metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct FileData {
	pub path: DocumentId,
	pub created_unix_ms: u64,
	pub modified_unix_ms: u64,
	pub size: u64,
	pub sections: Sections,
	pub extra: Map<String, Value>,
}

impl FileData {
	pub fn new(handle: &DocumentHandle, structure: StructuralData) -> Self {
		let sections = Sections::from_raw(handle, &structure.raw_sections);

		Self {
			path: handle.id().clone(),
			created_unix_ms: structure.created_unix_ms,
			modified_unix_ms: structure.modified_unix_ms,
			size: structure.size,
			sections,
			extra: structure.extra,
		}
	}

	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		map.insert("path".into(), Value::from(self.path.as_str()));
		map.insert("name".into(), Value::from(self.path.name()));
		map.insert("stem".into(), Value::from(self.path.stem()));
		map.insert("folder".into(), Value::from(self.path.folder()));
		map.insert("extension".into(), Value::from(self.path.extension()));
		map.insert("created_unix_ms".into(), Value::from(self.created_unix_ms));
		map.insert("modified_unix_ms".into(), Value::from(self.modified_unix_ms));
		map.insert("size".into(), Value::from(self.size));
		for (key, value) in &self.extra {
			map.entry(key.clone()).or_insert_with(|| value.clone());
		}
		map.insert("sections".into(), self.sections.to_value());

		Value::Object(map)
	}
}

/// One document's merged metadata: its frontmatter plus the reserved `file`
/// and `cache` fields.
#[derive(Debug, Clone)]
pub struct Metadata {
	handle: DocumentHandle,
	frontmatter: Map<String, Value>,
	file: FileData,
	cache: Cache,
}

impl Metadata {
	pub fn new(
		handle: DocumentHandle,
		frontmatter: Map<String, Value>,
		file: FileData,
		cache: Cache,
	) -> Self {
		Self {
			handle,
			frontmatter,
			file,
			cache,
		}
	}

	pub fn handle(&self) -> &DocumentHandle {
		&self.handle
	}

	pub fn id(&self) -> &DocumentId {
		self.handle.id()
	}

	pub fn frontmatter(&self) -> &Map<String, Value> {
		&self.frontmatter
	}

	pub fn into_frontmatter(self) -> Map<String, Value> {
		self.frontmatter
	}

	pub fn file(&self) -> &FileData {
		&self.file
	}

	pub fn sections(&self) -> &Sections {
		&self.file.sections
	}

	pub fn cache(&self) -> &Cache {
		&self.cache
	}

	/// The merged view. `file` and `cache` always hold the structural data and
	/// the cache, even when the frontmatter defines keys with those names.
	pub fn to_value(&self) -> Value {
		let mut merged = self.frontmatter.clone();
		merged.insert(FILE_KEY.into(), self.file.to_value());
		merged.insert(CACHE_KEY.into(), Value::Object(self.cache.snapshot()));

		Value::Object(merged)
	}

	/// Look up `path` in the merged view.
	pub fn get<P>(&self, path: &P) -> Option<Value>
	where
		P: AsPath + ?Sized,
	{
		let path = path.as_path();
		match path.first().map(|step| step.as_key()) {
			Some(key) if key == FILE_KEY => deep::get(&self.file.to_value(), &path[1..]).cloned(),
			Some(key) if key == CACHE_KEY => self.cache.get(&path[1..]),
			Some(_) => {
				let (first, rest) = path.split_first()?;
				let head = self.frontmatter.get(first.as_key().as_ref())?;
				deep::get(head, rest).cloned()
			}
			None => Some(self.to_value()),
		}
	}
}

impl Serialize for Metadata {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.to_value().serialize(serializer)
	}
}
