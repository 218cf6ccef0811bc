use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::ScryResult;
use crate::providers::ContentLoader;

/// A heading as reported by the structural provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSection {
	pub heading: String,
	/// Heading depth, `1` for `#`.
	pub level: u8,
	/// 1-indexed line of the heading.
	pub line: usize,
}

/// The section under one heading. Its text is not read until
/// [`Section::load`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
	document: DocumentHandle,
	pub heading: String,
	pub level: u8,
	pub line: usize,
	/// Lines of later headings with the same text.
	pub occurrences: Vec<usize>,
}

impl Section {
	pub fn document(&self) -> &DocumentHandle {
		&self.document
	}

	/// Load the section's text through `loader`.
	pub fn load<L>(&self, loader: &L) -> ScryResult<String>
	where
		L: ContentLoader + ?Sized,
	{
		loader.load_section(&self.document, &self.heading)
	}

	pub fn to_value(&self) -> Value {
		let mut map = Map::new();
		map.insert("heading".into(), Value::from(self.heading.as_str()));
		map.insert("level".into(), Value::from(self.level));
		map.insert("line".into(), Value::from(self.line));
		if !self.occurrences.is_empty() {
			map.insert("occurrences".into(), Value::from(self.occurrences.clone()));
		}

		Value::Object(map)
	}
}

/// A document's sections keyed by heading text, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections(IndexMap<String, Section>);

impl Sections {
	/// Group raw headings by their text. The first heading with a given text is
	/// the canonical section; later ones are recorded as occurrences.
	pub fn from_raw(document: &DocumentHandle, raw: &[RawSection]) -> Self {
		let mut sections: IndexMap<String, Section> = IndexMap::new();

		for section in raw {
			sections
				.entry(section.heading.clone())
				.and_modify(|existing| existing.occurrences.push(section.line))
				.or_insert_with(|| {
					Section {
						document: document.clone(),
						heading: section.heading.clone(),
						level: section.level,
						line: section.line,
						occurrences: Vec::new(),
					}
				});
		}

		Self(sections)
	}

	pub fn get(&self, heading: &str) -> Option<&Section> {
		self.0.get(heading)
	}

	pub fn headings(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Section> {
		self.0.values()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn to_value(&self) -> Value {
		Value::Object(
			self.0
				.iter()
				.map(|(heading, section)| (heading.clone(), section.to_value()))
				.collect(),
		)
	}
}
