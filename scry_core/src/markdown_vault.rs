use std::cell::RefCell;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use ignore::DirEntry;
use ignore::WalkBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde_json::Map;
use serde_json::Value;

use crate::DocumentHandle;
use crate::DocumentId;
use crate::ScryError;
use crate::ScryResult;
use crate::config::CONFIG_FILE_CANDIDATES;
use crate::config::ScryConfig;
use crate::frontmatter;
use crate::metadata::StructuralData;
use crate::outline;
use crate::providers::ContentLoader;
use crate::providers::CurrentDocumentProvider;
use crate::providers::DocumentLookup;
use crate::providers::FrontmatterProvider;
use crate::providers::MutationEditor;
use crate::providers::StructuralProvider;

/// A directory of markdown documents. Identifiers are `/` separated paths
/// relative to the root, e.g. `notes/today.md`.
#[derive(Debug)]
pub struct MarkdownVault {
	root: PathBuf,
	documents: Vec<DocumentId>,
	active: RefCell<Option<DocumentId>>,
}

impl MarkdownVault {
	/// Open `root`, reading its `scry.toml` if there is one.
	pub fn open(root: impl Into<PathBuf>) -> ScryResult<Self> {
		let root = root.into();
		let config = ScryConfig::load_or_default(&root)?;
		Self::open_with_config(root, &config)
	}

	pub fn open_with_config(root: impl Into<PathBuf>, config: &ScryConfig) -> ScryResult<Self> {
		let root = root.into();
		let files = collect_files(&root, &config.exclude.patterns, config.exclude.disable_gitignore)?;
		let documents = files
			.iter()
			.filter_map(|path| document_id(&root, path))
			.collect::<Vec<_>>();
		tracing::debug!(root = %root.display(), documents = documents.len(), "opened vault");

		let vault = Self {
			root,
			documents,
			active: RefCell::new(None),
		};
		if let Some(current) = &config.current {
			vault.set_active(Some(current.as_str()))?;
		}

		Ok(vault)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Every discovered document, sorted by identifier.
	pub fn documents(&self) -> &[DocumentId] {
		&self.documents
	}

	/// Make `id` the active document, or clear it with `None`.
	pub fn set_active(&self, id: Option<&str>) -> ScryResult<()> {
		let active = id
			.map(|id| {
				self.by_identifier(id)
					.map(|handle| handle.id().clone())
					.ok_or_else(|| ScryError::DocumentNotFound(id.to_string()))
			})
			.transpose()?;
		*self.active.borrow_mut() = active;

		Ok(())
	}

	/// The file backing `id`, when `id` stays inside the root.
	fn resolve(&self, id: &str) -> Option<PathBuf> {
		let relative = Path::new(id);
		if !relative
			.components()
			.all(|component| matches!(component, Component::Normal(_)))
		{
			return None;
		}

		let path = self.root.join(relative);
		(is_markdown_file(&path) && path.is_file()).then_some(path)
	}

	fn path_of(&self, handle: &DocumentHandle) -> ScryResult<PathBuf> {
		self.resolve(handle.id())
			.ok_or_else(|| ScryError::DocumentNotFound(handle.id().to_string()))
	}

	fn read(&self, handle: &DocumentHandle) -> ScryResult<String> {
		let path = self.path_of(handle)?;
		Ok(std::fs::read_to_string(path)?)
	}

	/// Rewrite the frontmatter of `handle` through `f`, keeping the body.
	fn rewrite(
		&self,
		handle: &DocumentHandle,
		f: impl FnOnce(&mut Map<String, Value>),
	) -> ScryResult<()> {
		let path = self.path_of(handle)?;
		let content = std::fs::read_to_string(&path)?;
		let mut frontmatter = frontmatter::read(&content, handle.id())?.unwrap_or_default();
		f(&mut frontmatter);
		let updated = frontmatter::replace(&content, &frontmatter, handle.id())?;
		write_atomic(&path, &updated)?;
		tracing::debug!(document = %handle, keys = frontmatter.len(), "wrote frontmatter");

		Ok(())
	}
}

impl CurrentDocumentProvider for MarkdownVault {
	fn active(&self) -> Option<DocumentHandle> {
		self.active.borrow().as_ref().map(DocumentHandle::new)
	}
}

impl DocumentLookup for MarkdownVault {
	fn by_identifier(&self, id: &str) -> Option<DocumentHandle> {
		self.resolve(id).map(|_| DocumentHandle::new(id))
	}
}

impl FrontmatterProvider for MarkdownVault {
	fn frontmatter(&self, handle: &DocumentHandle) -> ScryResult<Option<Map<String, Value>>> {
		let content = self.read(handle)?;
		frontmatter::read(&content, handle.id())
	}
}

impl StructuralProvider for MarkdownVault {
	fn structure(&self, handle: &DocumentHandle) -> ScryResult<StructuralData> {
		let path = self.path_of(handle)?;
		let metadata = std::fs::metadata(&path)?;
		let content = std::fs::read_to_string(&path)?;
		let split = frontmatter::split(&content);

		Ok(StructuralData {
			path: handle.id().clone(),
			created_unix_ms: metadata.created().map_or(0, unix_ms),
			modified_unix_ms: metadata.modified().map_or(0, unix_ms),
			size: metadata.len(),
			raw_sections: outline::headings(split.body, split.body_line_offset)?,
			extra: Map::new(),
		})
	}
}

impl ContentLoader for MarkdownVault {
	fn load_section(&self, handle: &DocumentHandle, heading: &str) -> ScryResult<String> {
		let content = self.read(handle)?;
		outline::section_text(frontmatter::split(&content).body, heading)?.ok_or_else(|| {
			ScryError::provider(
				"content loader",
				format!("`{}` has no section `{heading}`", handle.id()),
			)
		})
	}
}

impl MutationEditor for MarkdownVault {
	fn patch(&self, handle: &DocumentHandle, data: &Map<String, Value>) -> ScryResult<()> {
		self.rewrite(handle, |frontmatter| {
			for (key, value) in data {
				frontmatter.insert(key.clone(), value.clone());
			}
		})
	}

	fn set(&self, handle: &DocumentHandle, frontmatter: &Map<String, Value>) -> ScryResult<()> {
		self.rewrite(handle, |existing| existing.clone_from(frontmatter))
	}

	fn clear(&self, handle: &DocumentHandle, keys: &[String]) -> ScryResult<()> {
		self.rewrite(handle, |frontmatter| {
			for key in keys {
				frontmatter.shift_remove(key);
			}
		})
	}
}

fn unix_ms(time: SystemTime) -> u64 {
	time.duration_since(UNIX_EPOCH)
		.map_or(0, |duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Write `content` to a temp file next to `path`, then rename it into place.
fn write_atomic(path: &Path, content: &str) -> ScryResult<()> {
	let file_name = path
		.file_name()
		.and_then(|name| name.to_str())
		.unwrap_or("document");
	let temp_path = path.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	std::fs::write(&temp_path, content)?;
	if let Err(e) = std::fs::rename(&temp_path, path) {
		let _ = std::fs::remove_file(&temp_path);
		return Err(e.into());
	}

	Ok(())
}

/// `path` relative to `root` with `/` separators.
fn document_id(root: &Path, path: &Path) -> Option<DocumentId> {
	let relative = path.strip_prefix(root).ok()?;
	let segments = relative
		.components()
		.map(|component| component.as_os_str().to_str())
		.collect::<Option<Vec<_>>>()?;

	Some(DocumentId::new(segments.join("/")))
}

/// Build a `Gitignore` matcher from exclude patterns specified in
/// `scry.toml` `[exclude]`. These follow `.gitignore` syntax and are applied
/// on top of any `.gitignore` rules.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> ScryResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			ScryError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| ScryError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Collect every markdown file below `root`, sorted.
///
/// Hidden entries, `node_modules`, `target` and directories holding their own
/// `scry.toml` are skipped, as is anything matched by `.gitignore` files
/// (unless `disable_gitignore`) or by `exclude_patterns`. Symlinked
/// directories are followed; loops are reported and skipped.
fn collect_files(
	root: &Path,
	exclude_patterns: &[String],
	disable_gitignore: bool,
) -> ScryResult<Vec<PathBuf>> {
	let exclude = build_exclude_matcher(root, exclude_patterns)?;
	let walker = WalkBuilder::new(root)
		.standard_filters(false)
		.hidden(true)
		.git_ignore(!disable_gitignore)
		.require_git(false)
		.follow_links(true)
		.filter_entry(move |entry| keep_entry(entry, &exclude))
		.build();

	let mut files = Vec::new();
	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				tracing::warn!(error = %e, "skipping unreadable vault entry");
				continue;
			}
		};

		let is_file = entry.file_type().is_some_and(|file_type| file_type.is_file());
		if is_file && is_markdown_file(entry.path()) {
			files.push(entry.into_path());
		}
	}
	files.sort();
	tracing::debug!(root = %root.display(), documents = files.len(), "discovered documents");

	Ok(files)
}

/// Whether the walk should yield `entry` and, for directories, descend.
fn keep_entry(entry: &DirEntry, exclude: &Gitignore) -> bool {
	if entry.depth() == 0 {
		return true;
	}

	let is_dir = entry.file_type().is_some_and(|file_type| file_type.is_dir());
	let path = entry.path();
	if is_dir && matches!(entry.file_name().to_str(), Some("node_modules" | "target")) {
		return false;
	}
	if exclude.matched(path, is_dir).is_ignore() {
		tracing::trace!(path = %path.display(), "excluded by config");
		return false;
	}
	if is_dir && has_vault_config(path) {
		tracing::debug!(path = %path.display(), "skipping nested vault");
		return false;
	}

	true
}

fn has_vault_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

fn is_markdown_file(path: &Path) -> bool {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	matches!(ext, "md" | "markdown")
}
