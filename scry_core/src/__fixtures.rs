use std::cell::Cell;
use std::path::Path;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::DocumentHandle;
use crate::MemoryDocument;
use crate::MemoryVault;
use crate::ScryResult;
use crate::Scrier;
use crate::providers::ContentLoader;

pub(crate) const TODAY: &str = "notes/today.md";
pub(crate) const OTHER: &str = "notes/other.md";
pub(crate) const BARE: &str = "notes/bare.md";
pub(crate) const TODAY_VALUES: &str = "notes/today.values.md";
pub(crate) const PROTOTYPE: &str = "notes/_prototype.md";
pub(crate) const PROTOTYPE_VALUES: &str = "notes/_prototype.values.md";

pub(crate) const TODAY_BODY: &str = "# Plans\n\nShip it.\n\n## Details\n\nSmall steps.\n\n# Log\n\nDone.\n\n# Plans\n\nAgain.\n";

pub(crate) fn object(value: Value) -> Map<String, Value> {
	match value {
		Value::Object(map) => map,
		other => panic!("expected an object, found {other}"),
	}
}

pub(crate) fn nested() -> Value {
	json!({
		"a": { "b": [10, { "c": null }] },
		"scores": { "1": "one", "01": "padded", "007": "agent" },
		"s": "text",
		"n": 0,
	})
}

/// `nulls` nulls followed by `last`.
pub(crate) fn padded_list(nulls: usize, last: i64) -> Value {
	let mut items = vec![Value::Null; nulls];
	items.push(json!(last));
	Value::Array(items)
}

/// A vault whose active document shadows the reserved `file` and `cache`
/// keys in its frontmatter.
pub(crate) fn notes_vault() -> MemoryVault {
	MemoryVault::new()
		.with_document(
			TODAY,
			MemoryDocument::new(
				object(json!({
					"title": "Today",
					"tags": ["daily", "work"],
					"file": "shadowed",
					"cache": { "shadowed": true },
				})),
				TODAY_BODY,
			),
		)
		.with_document(
			OTHER,
			MemoryDocument::new(
				object(json!({ "title": "Other", "x": 1, "y": 2, "z": 3 })),
				"# Intro\n\nHello.\n",
			),
		)
		.with_document(BARE, MemoryDocument::body_only("plain text"))
		.with_document(TODAY_VALUES, MemoryDocument::new(Map::new(), ""))
		.with_document(
			PROTOTYPE,
			MemoryDocument::new(object(json!({ "kind": "note" })), ""),
		)
		.with_document(PROTOTYPE_VALUES, MemoryDocument::new(Map::new(), ""))
		.with_active(TODAY)
}

pub(crate) fn notes_scrier() -> Scrier<MemoryVault> {
	Scrier::new(notes_vault())
}

/// Loader that counts how often it is asked for content.
#[derive(Debug, Default)]
pub(crate) struct CountingLoader {
	pub(crate) calls: Cell<usize>,
}

impl ContentLoader for CountingLoader {
	fn load_section(&self, handle: &DocumentHandle, heading: &str) -> ScryResult<String> {
		self.calls.set(self.calls.get() + 1);
		Ok(format!("{heading} of {handle}"))
	}
}

pub(crate) fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {parent:?}: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {path:?}: {e}"));
}

pub(crate) fn read_file(root: &Path, relative: &str) -> String {
	let path = root.join(relative);
	std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"))
}
