use serde_json::Map;
use serde_json::Value;

use crate::ScryResult;
use crate::deep;
use crate::deep::Fallback;
use crate::deep::Update;
use crate::path::AsPath;

/// Path based access as methods, for callers that opt in by importing the
/// trait.
///
/// ```
/// use scry_core::PathAccessible;
/// use serde_json::json;
///
/// let mut value = json!({ "tags": ["a"] });
/// value.set_path("tags.1", json!("b"))?;
/// assert!(value.has_path("tags.1"));
/// assert_eq!(value.get_path("tags.0"), Some(&json!("a")));
/// # Ok::<(), scry_core::ScryError>(())
/// ```
pub trait PathAccessible {
	fn has_path<P: AsPath + ?Sized>(&self, path: &P) -> bool {
		self.get_path(path).is_some()
	}

	fn get_path<P: AsPath + ?Sized>(&self, path: &P) -> Option<&Value>;

	fn get_path_or<'f, P>(&self, path: &P, fallback: impl Into<Fallback<'f>>) -> Value
	where
		P: AsPath + ?Sized,
	{
		match self.get_path(path) {
			Some(value) => value.clone(),
			None => Fallback::from_into(fallback),
		}
	}

	/// Fails where [`deep::set`] does, leaving `self` untouched.
	fn set_path<'f, P>(&mut self, path: &P, value: impl Into<Update<'f>>) -> ScryResult<()>
	where
		P: AsPath + ?Sized;
}

impl PathAccessible for Value {
	fn get_path<P: AsPath + ?Sized>(&self, path: &P) -> Option<&Value> {
		deep::get(self, path)
	}

	fn set_path<'f, P>(&mut self, path: &P, value: impl Into<Update<'f>>) -> ScryResult<()>
	where
		P: AsPath + ?Sized,
	{
		deep::set(self, path, value)
	}
}

/// The root path has no `&Value` to return for a bare map and reads as
/// missing.
impl PathAccessible for Map<String, Value> {
	fn get_path<P: AsPath + ?Sized>(&self, path: &P) -> Option<&Value> {
		let path = path.as_path();
		let (first, rest) = path.split_first()?;
		let head = self.get(first.as_key().as_ref())?;
		deep::get(head, rest)
	}

	fn set_path<'f, P>(&mut self, path: &P, value: impl Into<Update<'f>>) -> ScryResult<()>
	where
		P: AsPath + ?Sized,
	{
		deep::set_in_map(self, path, value)
	}
}
