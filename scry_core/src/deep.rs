//! Path based access to arbitrary nested `serde_json` values.
//!
//! Reads never fail: a step that meets a missing key, an out of range index,
//! `null`, or a scalar simply reports the path as missing. Writes create
//! whatever containers they need, overwriting scalars that sit in the way.

use std::fmt;

use serde_json::Map;
use serde_json::Value;

use crate::ScryError;
use crate::ScryResult;
use crate::path::AsPath;
use crate::path::Step;

/// The furthest [`set`] will write past the end of an array. Writing further
/// would pad the array with this many `null`s or more.
pub const MAX_ARRAY_PADDING: usize = 1 << 16;

/// A default for [`get_or`], either given up front or produced on demand.
pub enum Fallback<'f> {
	Literal(Value),
	/// Only invoked when the path is missing.
	Factory(Box<dyn FnOnce() -> Value + 'f>),
}

impl<'f> Fallback<'f> {
	pub fn factory(factory: impl FnOnce() -> Value + 'f) -> Self {
		Self::Factory(Box::new(factory))
	}

	pub(crate) fn from_into(fallback: impl Into<Self>) -> Value {
		let fallback: Self = fallback.into();
		fallback.resolve()
	}

	fn resolve(self) -> Value {
		match self {
			Self::Literal(value) => value,
			Self::Factory(factory) => factory(),
		}
	}
}

impl From<Value> for Fallback<'_> {
	fn from(value: Value) -> Self {
		Self::Literal(value)
	}
}

impl fmt::Debug for Fallback<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Factory(_) => f.write_str("Factory(..)"),
		}
	}
}

/// The value written by [`set`]: either stored as is, or computed from the
/// value currently at the path (`None` when nothing is there yet).
pub enum Update<'f> {
	Literal(Value),
	Factory(Box<dyn FnOnce(Option<&Value>) -> Value + 'f>),
}

impl<'f> Update<'f> {
	pub fn factory(factory: impl FnOnce(Option<&Value>) -> Value + 'f) -> Self {
		Self::Factory(Box::new(factory))
	}

	pub(crate) fn apply(self, previous: Option<&Value>) -> Value {
		match self {
			Self::Literal(value) => value,
			Self::Factory(factory) => factory(previous),
		}
	}
}

impl From<Value> for Update<'_> {
	fn from(value: Value) -> Self {
		Self::Literal(value)
	}
}

impl fmt::Debug for Update<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Factory(_) => f.write_str("Factory(..)"),
		}
	}
}

/// Callbacks for [`visit`], run depending on whether the path exists.
pub enum ThenDo<'f> {
	Found(Box<dyn FnOnce(&Value) + 'f>),
	Missing(Box<dyn FnOnce() + 'f>),
	Both {
		on_found: Box<dyn FnOnce(&Value) + 'f>,
		on_missing: Box<dyn FnOnce() + 'f>,
	},
}

impl<'f> ThenDo<'f> {
	pub fn found(on_found: impl FnOnce(&Value) + 'f) -> Self {
		Self::Found(Box::new(on_found))
	}

	pub fn missing(on_missing: impl FnOnce() + 'f) -> Self {
		Self::Missing(Box::new(on_missing))
	}

	pub fn both(on_found: impl FnOnce(&Value) + 'f, on_missing: impl FnOnce() + 'f) -> Self {
		Self::Both {
			on_found: Box::new(on_found),
			on_missing: Box::new(on_missing),
		}
	}
}

/// Walk one step into `container`.
fn step_into<'v>(container: &'v Value, step: &Step) -> Option<&'v Value> {
	match container {
		Value::Object(map) => map.get(step.as_key().as_ref()),
		Value::Array(items) => step.as_index().and_then(|index| items.get(index)),
		_ => None,
	}
}

fn step_into_mut<'v>(container: &'v mut Value, step: &Step) -> Option<&'v mut Value> {
	match container {
		Value::Object(map) => map.get_mut(step.as_key().as_ref()),
		Value::Array(items) => step.as_index().and_then(|index| items.get_mut(index)),
		_ => None,
	}
}

/// Return the value at `path`, or `None` when any step is missing.
pub fn get<'v, P>(root: &'v Value, path: &P) -> Option<&'v Value>
where
	P: AsPath + ?Sized,
{
	path.as_path()
		.iter()
		.try_fold(root, |container, step| step_into(container, step))
}

pub fn get_mut<'v, P>(root: &'v mut Value, path: &P) -> Option<&'v mut Value>
where
	P: AsPath + ?Sized,
{
	path.as_path()
		.iter()
		.try_fold(root, |container, step| step_into_mut(container, step))
}

/// Return a copy of the value at `path`, or the fallback when it is missing.
/// Factory fallbacks are only invoked on a miss.
pub fn get_or<'f, P>(root: &Value, path: &P, fallback: impl Into<Fallback<'f>>) -> Value
where
	P: AsPath + ?Sized,
{
	match get(root, path) {
		Some(value) => value.clone(),
		None => Fallback::from_into(fallback),
	}
}

/// Whether `path` resolves to a value. A `null` leaf counts as present; a
/// `null` part way along the path does not.
pub fn contains<P>(root: &Value, path: &P) -> bool
where
	P: AsPath + ?Sized,
{
	get(root, path).is_some()
}

/// Walk the path once and run the matching callback. Returns whether the
/// path was found.
pub fn visit<P>(root: &Value, path: &P, then_do: ThenDo<'_>) -> bool
where
	P: AsPath + ?Sized,
{
	match (get(root, path), then_do) {
		(Some(value), ThenDo::Found(on_found) | ThenDo::Both { on_found, .. }) => {
			on_found(value);
			true
		}
		(Some(_), ThenDo::Missing(_)) => true,
		(None, ThenDo::Missing(on_missing) | ThenDo::Both { on_missing, .. }) => {
			on_missing();
			false
		}
		(None, ThenDo::Found(_)) => false,
	}
}

/// Write `value` at `path`, creating containers along the way. An empty path
/// replaces `root` itself.
///
/// Missing or scalar intermediates become objects for key steps and arrays
/// for index steps. Arrays met by a non-numeric key are replaced with objects;
/// objects accept index steps under the index's decimal key. Writing past the
/// end of an array pads it with `null`, up to [`MAX_ARRAY_PADDING`] elements;
/// an index further out fails with [`ScryError::InvalidPath`] and leaves
/// `root` untouched.
pub fn set<'f, P>(root: &mut Value, path: &P, value: impl Into<Update<'f>>) -> ScryResult<()>
where
	P: AsPath + ?Sized,
{
	let path = path.as_path();
	check_padding(root, &path)?;
	let update: Update<'f> = value.into();

	let Some((last, parents)) = path.split_last() else {
		let previous = std::mem::take(root);
		*root = update.apply(Some(&previous));
		return Ok(());
	};

	let mut container = root;
	for step in parents {
		prepare_container(container, step);
		container = slot(container, step);
	}

	prepare_container(container, last);
	let existed = step_into(container, last).is_some();
	let target = slot(container, last);
	let previous = existed.then(|| std::mem::take(target));
	*target = update.apply(previous.as_ref());

	Ok(())
}

/// Write at `path` within an object map.
///
/// Writing an empty path with a non-object value leaves the map empty.
pub fn set_in_map<'f, P>(
	map: &mut Map<String, Value>,
	path: &P,
	value: impl Into<Update<'f>>,
) -> ScryResult<()>
where
	P: AsPath + ?Sized,
{
	let mut root = Value::Object(std::mem::take(map));
	let result = set(&mut root, path, value);
	*map = match root {
		Value::Object(updated) => updated,
		_ => Map::new(),
	};

	result
}

/// Walk `path` the way [`set`] will, without writing, and reject any index
/// that lands more than [`MAX_ARRAY_PADDING`] past the end of its array.
fn check_padding(root: &Value, path: &[Step]) -> ScryResult<()> {
	let mut container = Some(root);

	for (position, step) in path.iter().enumerate() {
		let array_len = match container {
			Some(Value::Object(_)) => None,
			Some(Value::Array(items)) => step.as_index().map(|_| items.len()),
			_ => matches!(step, Step::Index(_)).then_some(0),
		};

		if let (Some(len), Some(index)) = (array_len, step.as_index()) {
			if index.saturating_sub(len) >= MAX_ARRAY_PADDING {
				return Err(ScryError::InvalidPath {
					position,
					reason: format!(
						"index {index} is too far past the end of an array of length {len}"
					),
				});
			}
		}

		container = container.and_then(|value| step_into(value, step));
	}

	Ok(())
}

/// Remove and return the value at `path`. Array elements are removed in
/// place, shifting later elements down.
pub fn remove<P>(root: &mut Value, path: &P) -> Option<Value>
where
	P: AsPath + ?Sized,
{
	let path = path.as_path();
	let (last, parents) = path.split_last()?;
	let container = parents
		.iter()
		.try_fold(root, |container, step| step_into_mut(container, step))?;

	match container {
		Value::Object(map) => map.shift_remove(last.as_key().as_ref()),
		Value::Array(items) => {
			let index = last.as_index()?;
			(index < items.len()).then(|| items.remove(index))
		}
		_ => None,
	}
}

fn prepare_container(container: &mut Value, step: &Step) {
	let fits = match container {
		Value::Object(_) => true,
		Value::Array(_) => step.as_index().is_some(),
		_ => false,
	};

	if !fits {
		*container = match step {
			Step::Key(_) => Value::Object(Map::new()),
			Step::Index(_) => Value::Array(Vec::new()),
		};
	}
}

/// Return a mutable slot for `step`, inserting `null` if it is missing.
/// `container` must already have been prepared for `step`.
fn slot<'v>(container: &'v mut Value, step: &Step) -> &'v mut Value {
	match (container, step.as_index()) {
		(Value::Array(items), Some(index)) => {
			if let Some(len) = index.checked_add(1).filter(|len| *len > items.len()) {
				items.resize(len, Value::Null);
			}
			&mut items[index]
		}
		(container, _) => {
			if !container.is_object() {
				*container = Value::Object(Map::new());
			}
			let Value::Object(map) = container else {
				unreachable!("container was just made an object");
			};
			map.entry(step.as_key().into_owned())
				.or_insert(Value::Null)
		}
	}
}
