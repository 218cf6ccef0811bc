use indexmap::IndexMap;
use indexmap::map::Entry;
use serde_json::Value;

use crate::ScryError;
use crate::ScryResult;
use crate::deep;
use crate::path::AsPath;

/// Index `items` by the value found at `key_path` in each item.
///
/// Fails with [`ScryError::MissingKey`] when an item has no value at the path
/// and with [`ScryError::DuplicateKey`] when two items share one.
pub fn index_by<'a, P>(items: &'a [Value], key_path: &P) -> ScryResult<IndexMap<String, &'a Value>>
where
	P: AsPath + ?Sized,
{
	let path = key_path.as_path();
	let mut indexed = IndexMap::with_capacity(items.len());

	for (position, item) in items.iter().enumerate() {
		let key = deep::get(item, &*path).ok_or_else(|| {
			ScryError::MissingKey {
				position,
				path: path.to_string(),
			}
		})?;

		match indexed.entry(key_string(key)) {
			Entry::Occupied(entry) => {
				return Err(ScryError::DuplicateKey {
					key: entry.key().clone(),
					path: path.to_string(),
				});
			}
			Entry::Vacant(entry) => {
				entry.insert(item);
			}
		}
	}

	Ok(indexed)
}

/// Group `items` by the value found at `key_path`. Items without a value there,
/// and `null` items, are grouped under the empty key.
pub fn group_by<'a, P>(items: &'a [Value], key_path: &P) -> IndexMap<String, Vec<&'a Value>>
where
	P: AsPath + ?Sized,
{
	let path = key_path.as_path();
	let mut grouped: IndexMap<String, Vec<&'a Value>> = IndexMap::new();

	for item in items {
		let key = if item.is_null() {
			String::new()
		} else {
			deep::get(item, &*path).map_or_else(String::new, key_string)
		};
		grouped.entry(key).or_default().push(item);
	}

	grouped
}

/// The map key a value is filed under: strings as is, anything else in its
/// JSON form.
pub fn key_string(value: &Value) -> String {
	match value {
		Value::String(text) => text.clone(),
		other => other.to_string(),
	}
}

/// Method form of [`index_by`] and [`group_by`] for slices of values.
pub trait Collect {
	fn index_by<P: AsPath + ?Sized>(&self, key_path: &P) -> ScryResult<IndexMap<String, &Value>>;
	fn group_by<P: AsPath + ?Sized>(&self, key_path: &P) -> IndexMap<String, Vec<&Value>>;
}

impl Collect for [Value] {
	fn index_by<P: AsPath + ?Sized>(&self, key_path: &P) -> ScryResult<IndexMap<String, &Value>> {
		index_by(self, key_path)
	}

	fn group_by<P: AsPath + ?Sized>(&self, key_path: &P) -> IndexMap<String, Vec<&Value>> {
		group_by(self, key_path)
	}
}
