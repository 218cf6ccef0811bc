use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ScryError {
	#[error(transparent)]
	#[diagnostic(code(scry::io_error))]
	Io(#[from] std::io::Error),

	#[error("invalid path step at position {position}: {reason}")]
	#[diagnostic(
		code(scry::invalid_path),
		help("path steps must be strings or non-negative integers, and a write may not index far past the end of an array")
	)]
	InvalidPath { position: usize, reason: String },

	#[error("no document is currently active")]
	#[diagnostic(
		code(scry::no_current_document),
		help("pass an explicit source, or set `current` in scry.toml")
	)]
	NoCurrentDocument,

	#[error("document not found: `{0}`")]
	#[diagnostic(code(scry::document_not_found))]
	DocumentNotFound(String),

	#[error("expected exactly one document but the source resolved to {count}")]
	#[diagnostic(
		code(scry::ambiguous_source),
		help("pass a single document identifier instead of a list")
	)]
	AmbiguousSource { count: usize },

	#[error("duplicate key `{key}` while indexing by `{path}`")]
	#[diagnostic(
		code(scry::duplicate_key),
		help("use group-by when the key is not unique across items")
	)]
	DuplicateKey { key: String, path: String },

	#[error("item {position} has no value at key path `{path}`")]
	#[diagnostic(code(scry::missing_key))]
	MissingKey { position: usize, path: String },

	#[error("frontmatter of `{document}` must be a mapping, found {found}")]
	#[diagnostic(code(scry::invalid_frontmatter))]
	InvalidFrontmatter { document: String, found: String },

	#[error("{collaborator} failed: {message}")]
	#[diagnostic(code(scry::provider))]
	Provider {
		collaborator: &'static str,
		message: String,
	},

	#[error("failed to parse frontmatter of `{path}`: {reason}")]
	#[diagnostic(
		code(scry::yaml),
		help("the block between the leading `---` fences must be valid YAML")
	)]
	Yaml { path: String, reason: String },

	#[error("failure to load markdown: {0}")]
	#[diagnostic(code(scry::markdown))]
	Markdown(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(scry::config_parse),
		help("check that scry.toml is valid TOML with optional [write] and [exclude] sections")
	)]
	ConfigParse(String),
}

impl ScryError {
	/// Wrap a collaborator's own failure message without reinterpreting it.
	pub fn provider(collaborator: &'static str, message: impl Into<String>) -> Self {
		Self::Provider {
			collaborator,
			message: message.into(),
		}
	}
}

pub type ScryResult<T> = Result<T, ScryError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
