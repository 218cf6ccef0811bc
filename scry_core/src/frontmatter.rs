//! Reading and rewriting the leading `---` YAML block of a markdown document.

use serde_json::Map;
use serde_json::Value;

use crate::ScryError;
use crate::ScryResult;
use crate::path::kind_of;

/// A document split into its frontmatter block and body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'c> {
	/// The YAML between the fences, or `None` when the document has no
	/// frontmatter block.
	pub yaml: Option<&'c str>,
	/// Everything after the closing fence, byte for byte.
	pub body: &'c str,
	/// Number of lines before the body starts.
	pub body_line_offset: usize,
}

/// Split `content` into frontmatter and body. The block must open on the
/// first line and close with a `---` or `...` line; otherwise the whole
/// content is body.
pub fn split(content: &str) -> Split<'_> {
	let no_frontmatter = Split {
		yaml: None,
		body: content,
		body_line_offset: 0,
	};

	let Some(rest) = content
		.strip_prefix("---\n")
		.or_else(|| content.strip_prefix("---\r\n"))
	else {
		return no_frontmatter;
	};

	let mut offset = 0;
	for line in rest.split_inclusive('\n') {
		let fence = line.trim_end_matches(['\r', '\n']);
		if fence == "---" || fence == "..." {
			let body = &rest[offset + line.len()..];
			let consumed = &content[..content.len() - body.len()];

			return Split {
				yaml: Some(&rest[..offset]),
				body,
				body_line_offset: consumed.matches('\n').count(),
			};
		}
		offset += line.len();
	}

	no_frontmatter
}

/// Parse a frontmatter block. An empty block is an empty mapping; anything
/// other than a mapping is rejected.
pub fn parse(yaml: &str, document: &str) -> ScryResult<Map<String, Value>> {
	if yaml.trim().is_empty() {
		return Ok(Map::new());
	}

	let value: Value = serde_yaml_ng::from_str(yaml).map_err(|e| {
		ScryError::Yaml {
			path: document.to_string(),
			reason: e.to_string(),
		}
	})?;

	match value {
		Value::Object(map) => Ok(map),
		Value::Null => Ok(Map::new()),
		other => {
			Err(ScryError::InvalidFrontmatter {
				document: document.to_string(),
				found: kind_of(&other).to_string(),
			})
		}
	}
}

/// Read the frontmatter of `content`, `None` when it has no block.
pub fn read(content: &str, document: &str) -> ScryResult<Option<Map<String, Value>>> {
	split(content)
		.yaml
		.map(|yaml| parse(yaml, document))
		.transpose()
}

/// Render `frontmatter` as a fenced block. An empty mapping renders nothing.
pub fn render(frontmatter: &Map<String, Value>, document: &str) -> ScryResult<String> {
	if frontmatter.is_empty() {
		return Ok(String::new());
	}

	let yaml = serde_yaml_ng::to_string(frontmatter).map_err(|e| {
		ScryError::Yaml {
			path: document.to_string(),
			reason: e.to_string(),
		}
	})?;

	Ok(format!("---\n{yaml}---\n"))
}

/// Replace the frontmatter of `content`, keeping the body unchanged.
pub fn replace(
	content: &str,
	frontmatter: &Map<String, Value>,
	document: &str,
) -> ScryResult<String> {
	let body = split(content).body;
	let mut updated = render(frontmatter, document)?;
	updated.push_str(body);

	Ok(updated)
}
