use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use scry_core::Source;
use scry_core::UpdateOptions;

/// Source argument naming the active document.
pub const CURRENT_SOURCE: &str = "@";

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Read and write the metadata of markdown documents.",
	long_about = "scry gathers the metadata of markdown documents (frontmatter, file \
	              structure and a per session cache) into one JSON view, and writes \
	              frontmatter back.\n\nDocuments are named by their path relative to the \
	              vault root, e.g. `notes/today.md`. Use `@` for the active document, set \
	              with `--current` or `current` in `scry.toml`.\n\nQuick start:\n  scry get \
	              notes/today.md              Print a document's metadata\n  scry get @ \
	              --property tags           Print one property\n  scry patch @ '{\"done\": \
	              true}'        Merge into the frontmatter"
)]
pub struct ScryCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the vault root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Document to treat as the active one. Overrides `current` in
	/// `scry.toml`.
	#[arg(long, short, global = true)]
	pub current: Option<String>,

	/// Log what scry does to stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the merged metadata of one or more documents as JSON.
	///
	/// Without sources the active document is read. Naming more than one
	/// source, or passing `--many`, prints a map keyed by document
	/// identifier instead of a single value.
	Get {
		/// Documents to read. Use `@` for the active document.
		sources: Vec<String>,

		/// Print only the value at this property path, e.g. `file.name` or
		/// `tags.0`. Missing properties print `null`.
		#[arg(long)]
		property: Option<String>,

		/// Always print a map keyed by document identifier.
		#[arg(long, default_value_t = false)]
		many: bool,
	},
	/// Merge a JSON object into a document's frontmatter.
	///
	/// With `--property` the JSON value is written at that path instead,
	/// creating any missing containers along the way.
	Patch {
		/// Document to write. Use `@` for the active document.
		source: String,

		/// JSON object to merge, or with `--property` any JSON value.
		data: String,

		/// Write `data` at this property path.
		#[arg(long)]
		property: Option<String>,

		#[command(flatten)]
		redirect: RedirectArgs,
	},
	/// Replace a document's frontmatter with a JSON object.
	Set {
		/// Document to write. Use `@` for the active document.
		source: String,

		/// JSON object that becomes the frontmatter.
		data: String,

		#[command(flatten)]
		redirect: RedirectArgs,
	},
	/// Remove frontmatter keys from a document.
	///
	/// Without keys the whole frontmatter is cleared.
	Clear {
		/// Document to write. Use `@` for the active document.
		source: String,

		/// Top level keys to remove.
		keys: Vec<String>,

		#[command(flatten)]
		redirect: RedirectArgs,
	},
	/// List a document's sections as JSON.
	Sections {
		/// Document to read. Use `@` for the active document.
		source: String,
	},
	/// Print the text under one heading of a document.
	Section {
		/// Document to read. Use `@` for the active document.
		source: String,

		/// Heading text, without the leading `#` markers.
		heading: String,
	},
	/// Index the metadata of every document by the value at a property path.
	///
	/// Fails when a document has no value there or two documents share one.
	IndexBy {
		/// Property path whose value becomes the key.
		#[arg(id = "key_path", value_name = "PATH")]
		path: String,
	},
	/// Group the metadata of every document by the value at a property path.
	///
	/// Documents without a value there are grouped under `""`.
	GroupBy {
		/// Property path whose value becomes the key.
		#[arg(id = "key_path", value_name = "PATH")]
		path: String,
	},
}

/// Where a write lands instead of the named document.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RedirectArgs {
	/// Write to the document's companion values file, e.g.
	/// `today.values.md` for `today.md`.
	#[arg(long, default_value_t = false)]
	pub values_file: bool,

	/// Write to the `_prototype` document of the document's folder.
	#[arg(long, default_value_t = false)]
	pub prototype: bool,
}

impl From<RedirectArgs> for UpdateOptions {
	fn from(args: RedirectArgs) -> Self {
		Self {
			to_values_file: args.values_file,
			prototype: args.prototype,
		}
	}
}

/// The [`Source`] a command line argument names.
pub fn source_arg(arg: &str) -> Source {
	if arg == CURRENT_SOURCE {
		Source::Current
	} else {
		Source::from(arg)
	}
}

/// The [`Source`] for `get`: the active document without arguments, a list
/// when more than one is named or `many` is set.
pub fn sources_arg(args: &[String], many: bool) -> Source {
	match args {
		[] if many => Source::many([Source::Current]),
		[] => Source::Current,
		[single] if !many => source_arg(single),
		_ => Source::many(args.iter().map(|arg| source_arg(arg))),
	}
}
