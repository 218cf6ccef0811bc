//! Headings and section text of a markdown body.

use markdown::ParseOptions;
use markdown::mdast::Node;
use markdown::to_mdast;

use crate::ScryError;
use crate::ScryResult;
use crate::sections::RawSection;

/// A heading with the byte range of its own line(s) in the body.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeadingNode {
	text: String,
	depth: u8,
	line: usize,
	start: usize,
	end: usize,
}

fn parse_headings(body: &str) -> ScryResult<Vec<HeadingNode>> {
	let options = ParseOptions::gfm();
	let mdast = to_mdast(body, &options).map_err(|e| ScryError::Markdown(e.to_string()))?;
	let mut headings = Vec::new();
	collect_headings(&mdast, &mut headings);

	Ok(headings)
}

fn collect_headings(node: &Node, headings: &mut Vec<HeadingNode>) {
	match node {
		Node::Heading(heading) => {
			let Some(position) = heading.position.as_ref() else {
				return;
			};
			let mut text = String::new();
			for child in &heading.children {
				collect_text(child, &mut text);
			}
			headings.push(HeadingNode {
				text: text.trim().to_string(),
				depth: heading.depth,
				line: position.start.line,
				start: position.start.offset,
				end: position.end.offset,
			});
		}
		_ => {
			if let Some(children) = node.children() {
				for child in children {
					collect_headings(child, headings);
				}
			}
		}
	}
}

fn collect_text(node: &Node, text: &mut String) {
	match node {
		Node::Text(inline) => text.push_str(&inline.value),
		Node::InlineCode(code) => text.push_str(&code.value),
		Node::InlineMath(math) => text.push_str(&math.value),
		_ => {
			if let Some(children) = node.children() {
				for child in children {
					collect_text(child, text);
				}
			}
		}
	}
}

/// Every heading in `body`, in document order. Line numbers are shifted by
/// `line_offset` so they refer to the whole document.
pub fn headings(body: &str, line_offset: usize) -> ScryResult<Vec<RawSection>> {
	Ok(parse_headings(body)?
		.into_iter()
		.map(|heading| {
			RawSection {
				heading: heading.text,
				level: heading.depth,
				line: heading.line + line_offset,
			}
		})
		.collect())
}

/// The text under the first heading named `heading`, up to the next heading
/// of the same or a higher level. Surrounding blank lines are dropped.
pub fn section_text(body: &str, heading: &str) -> ScryResult<Option<String>> {
	let headings = parse_headings(body)?;
	let Some(position) = headings.iter().position(|node| node.text == heading) else {
		return Ok(None);
	};

	let found = &headings[position];
	let end = headings[position + 1..]
		.iter()
		.find(|node| node.depth <= found.depth)
		.map_or(body.len(), |node| node.start);

	Ok(Some(body[found.end..end].trim_matches(['\n', '\r']).to_string()))
}
