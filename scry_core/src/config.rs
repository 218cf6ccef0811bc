use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ScryError;
use crate::ScryResult;
use crate::path::DEFAULT_DELIMITER;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["scry.toml", ".scry.toml", ".config/scry.toml"];

/// Default stem of a folder's prototype document.
pub const DEFAULT_PROTOTYPE_STEM: &str = "_prototype";

/// Default suffix appended to a document's stem to name its values document.
pub const DEFAULT_VALUES_SUFFIX: &str = ".values";

/// Configuration loaded from a `scry.toml` file.
///
/// ```toml
/// delimiter = "."
/// current = "notes/today.md"
///
/// [write]
/// values_suffix = ".values"
/// prototype_stem = "_prototype"
///
/// [exclude]
/// patterns = ["drafts/", "*.tmp.md"]
/// disable_gitignore = false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ScryConfig {
	/// Delimiter used to split string property paths.
	#[serde(default = "default_delimiter")]
	pub delimiter: String,
	/// Identifier of the document treated as active when no source is given.
	#[serde(default)]
	pub current: Option<String>,
	/// Where redirected writes land.
	#[serde(default)]
	pub write: WriteConfig,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

impl Default for ScryConfig {
	fn default() -> Self {
		Self {
			delimiter: default_delimiter(),
			current: None,
			write: WriteConfig::default(),
			exclude: ExcludeConfig::default(),
		}
	}
}

fn default_delimiter() -> String {
	DEFAULT_DELIMITER.to_string()
}

/// Naming of the documents that `prototype` and `to_values_file` writes are
/// redirected to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WriteConfig {
	#[serde(default = "default_values_suffix")]
	pub values_suffix: String,
	#[serde(default = "default_prototype_stem")]
	pub prototype_stem: String,
}

impl Default for WriteConfig {
	fn default() -> Self {
		Self {
			values_suffix: default_values_suffix(),
			prototype_stem: default_prototype_stem(),
		}
	}
}

fn default_values_suffix() -> String {
	DEFAULT_VALUES_SUFFIX.to_string()
}

fn default_prototype_stem() -> String {
	DEFAULT_PROTOTYPE_STEM.to_string()
}

/// Configuration for excluding files from discovery.
///
/// Patterns follow gitignore syntax and are applied on top of any `.gitignore`
/// rules (unless `disable_gitignore` is set).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns relative to the vault root.
	///
	/// Examples: `"drafts/"`, `"*.tmp.md"`, `"!keep.md"`.
	#[serde(default)]
	pub patterns: Vec<String>,
	/// When true, the root `.gitignore` is not consulted.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl ScryConfig {
	/// Returns the first config file path that exists in `root`, using
	/// [`CONFIG_FILE_CANDIDATES`] precedence.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> ScryResult<Option<ScryConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: ScryConfig =
			toml::from_str(&content).map_err(|e| ScryError::ConfigParse(e.to_string()))?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Like [`ScryConfig::load`], falling back to the defaults.
	pub fn load_or_default(root: &Path) -> ScryResult<ScryConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}
}
