use std::borrow::Cow;
use std::fmt;
use std::fmt::Display;

use derive_more::Deref;
use serde_json::Value;

use crate::ScryError;
use crate::ScryResult;

/// Delimiter used when a string path spec is parsed without an explicit one.
pub const DEFAULT_DELIMITER: &str = ".";

/// One step of a property path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
	/// An object key, e.g. `title` in `title.main`.
	Key(String),
	/// An array index, e.g. `0` in `tags.0`.
	Index(usize),
}

impl Step {
	pub fn key(key: impl Into<String>) -> Self {
		Self::Key(key.into())
	}

	/// The object-key form of this step. Index steps address objects by their
	/// decimal string.
	pub fn as_key(&self) -> Cow<'_, str> {
		match self {
			Self::Key(key) => Cow::Borrowed(key.as_str()),
			Self::Index(index) => Cow::Owned(index.to_string()),
		}
	}

	/// The array-index form of this step, when it has one. Keys only count as
	/// indices when written in canonical decimal form, so `"01"` stays a key.
	pub fn as_index(&self) -> Option<usize> {
		match self {
			Self::Key(key) => canonical_index(key),
			Self::Index(index) => Some(*index),
		}
	}

	fn from_segment(segment: &str) -> Self {
		match canonical_index(segment) {
			Some(index) => Self::Index(index),
			None => Self::Key(segment.to_string()),
		}
	}
}

/// `text` as an index when it is exactly the decimal form of one: digits only,
/// no leading zero, and small enough for `usize`. For these `as_key` gives
/// back `text` unchanged.
fn canonical_index(text: &str) -> Option<usize> {
	let digits_only = !text.is_empty() && text.bytes().all(|byte| byte.is_ascii_digit());
	if !digits_only || (text.len() > 1 && text.starts_with('0')) {
		return None;
	}

	text.parse().ok()
}

impl Display for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key(key) => f.write_str(key),
			Self::Index(index) => write!(f, "{index}"),
		}
	}
}

impl From<&str> for Step {
	fn from(key: &str) -> Self {
		Self::Key(key.to_string())
	}
}

impl From<String> for Step {
	fn from(key: String) -> Self {
		Self::Key(key)
	}
}

impl From<usize> for Step {
	fn from(index: usize) -> Self {
		Self::Index(index)
	}
}

/// An ordered sequence of steps addressing a value inside nested data. The
/// empty path addresses the root container itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref)]
pub struct PropertyPath(Vec<Step>);

impl PropertyPath {
	/// The empty path.
	pub fn root() -> Self {
		Self(Vec::new())
	}

	/// Parse a `.` delimited path spec such as `tags.0.name`.
	pub fn parse(spec: &str) -> Self {
		Self::parse_with(spec, DEFAULT_DELIMITER)
	}

	/// Parse a path spec split on `delimiter`. Empty segments are skipped and
	/// purely numeric segments become index steps.
	pub fn parse_with(spec: &str, delimiter: &str) -> Self {
		if delimiter.is_empty() {
			return if spec.is_empty() {
				Self::root()
			} else {
				Self(vec![Step::from_segment(spec)])
			};
		}

		Self(
			spec.split(delimiter)
				.filter(|segment| !segment.is_empty())
				.map(Step::from_segment)
				.collect(),
		)
	}

	/// Use each element as a step verbatim.
	pub fn from_steps<I, S>(steps: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<Step>,
	{
		Self(steps.into_iter().map(Into::into).collect())
	}

	/// Build a path from a JSON path spec: a delimited string, or an array
	/// whose elements are strings or non-negative integers.
	pub fn from_value(spec: &Value, delimiter: &str) -> ScryResult<Self> {
		match spec {
			Value::String(spec) => Ok(Self::parse_with(spec, delimiter)),
			Value::Array(items) => {
				items
					.iter()
					.enumerate()
					.map(|(position, item)| {
						match item {
							Value::String(key) => Ok(Step::Key(key.clone())),
							Value::Number(number) => {
								number
									.as_u64()
									.and_then(|index| usize::try_from(index).ok())
									.map(Step::Index)
									.ok_or_else(|| {
										ScryError::InvalidPath {
											position,
											reason: format!("`{number}` is not a valid array index"),
										}
									})
							}
							other => {
								Err(ScryError::InvalidPath {
									position,
									reason: format!("expected a string or integer, found {}", kind_of(other)),
								})
							}
						}
					})
					.collect::<ScryResult<Vec<_>>>()
					.map(Self)
			}
			other => {
				Err(ScryError::InvalidPath {
					position: 0,
					reason: format!("expected a string or a list of steps, found {}", kind_of(other)),
				})
			}
		}
	}

	pub fn is_root(&self) -> bool {
		self.0.is_empty()
	}

	pub fn push(&mut self, step: impl Into<Step>) {
		self.0.push(step.into());
	}

	/// Split into the parent path and the final step.
	pub fn split_last(&self) -> Option<(&Step, &[Step])> {
		self.0.split_last()
	}

	pub fn steps(&self) -> &[Step] {
		&self.0
	}
}

impl Display for PropertyPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (position, step) in self.0.iter().enumerate() {
			if position > 0 {
				f.write_str(DEFAULT_DELIMITER)?;
			}
			write!(f, "{step}")?;
		}

		Ok(())
	}
}

impl From<Vec<Step>> for PropertyPath {
	fn from(steps: Vec<Step>) -> Self {
		Self(steps)
	}
}

impl From<&str> for PropertyPath {
	fn from(spec: &str) -> Self {
		Self::parse(spec)
	}
}

impl FromIterator<Step> for PropertyPath {
	fn from_iter<T: IntoIterator<Item = Step>>(iter: T) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Anything that can be read as a [`PropertyPath`] without taking ownership.
///
/// Strings are parsed on demand; existing paths and step slices are borrowed.
pub trait AsPath {
	fn as_path(&self) -> Cow<'_, PropertyPath> {
		self.as_path_with(DEFAULT_DELIMITER)
	}

	/// Like [`AsPath::as_path`], splitting string specs on `delimiter`.
	fn as_path_with(&self, delimiter: &str) -> Cow<'_, PropertyPath>;
}

impl AsPath for str {
	fn as_path_with(&self, delimiter: &str) -> Cow<'_, PropertyPath> {
		Cow::Owned(PropertyPath::parse_with(self, delimiter))
	}
}

impl AsPath for String {
	fn as_path_with(&self, delimiter: &str) -> Cow<'_, PropertyPath> {
		self.as_str().as_path_with(delimiter)
	}
}

impl AsPath for PropertyPath {
	fn as_path_with(&self, _delimiter: &str) -> Cow<'_, PropertyPath> {
		Cow::Borrowed(self)
	}
}

impl AsPath for [Step] {
	fn as_path_with(&self, _delimiter: &str) -> Cow<'_, PropertyPath> {
		Cow::Owned(PropertyPath(self.to_vec()))
	}
}

impl AsPath for Vec<Step> {
	fn as_path_with(&self, delimiter: &str) -> Cow<'_, PropertyPath> {
		self.as_slice().as_path_with(delimiter)
	}
}

impl<T: AsPath + ?Sized> AsPath for &T {
	fn as_path_with(&self, delimiter: &str) -> Cow<'_, PropertyPath> {
		(**self).as_path_with(delimiter)
	}
}

/// Human readable name of a JSON value's kind, used in diagnostics.
pub(crate) fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "a list",
		Value::Object(_) => "a mapping",
	}
}
