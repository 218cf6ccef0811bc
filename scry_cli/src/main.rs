use std::path::PathBuf;
use std::process;

use clap::Parser;
use scry_cli::Commands;
use scry_cli::RedirectArgs;
use scry_cli::ScryCli;
use scry_cli::source_arg;
use scry_cli::sources_arg;
use scry_core::AnyEmptyResult;
use scry_core::AnyResult;
use scry_core::MarkdownVault;
use scry_core::Metadata;
use scry_core::ScryConfig;
use scry_core::Scried;
use scry_core::Scrier;
use scry_core::Source;
use scry_core::group_by;
use scry_core::index_by;
use serde_json::Map;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a `tracing` filter, e.g. `scry_core=trace`.
const LOG_ENV: &str = "SCRY_LOG";

fn main() {
	let args = ScryCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let Some(command) = &args.command else {
		eprintln!("No subcommand specified. Run `scry --help` for usage.");
		process::exit(1);
	};

	if let Err(e) = run(&args, command) {
		match e.downcast::<scry_core::ScryError>() {
			Ok(scry_err) => {
				let report: miette::Report = (*scry_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("error: {e}");
			}
		}
		process::exit(2);
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("scry_core=debug,scry_cli=debug")
	} else if std::env::var_os(LOG_ENV).is_some() {
		EnvFilter::from_env(LOG_ENV)
	} else {
		return;
	};

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.with_ansi(use_color)
		.try_init();
}

fn resolve_root(args: &ScryCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn open_scrier(args: &ScryCli) -> AnyResult<Scrier<MarkdownVault>> {
	let root = resolve_root(args);
	let mut config = ScryConfig::load_or_default(&root)?;
	if let Some(current) = &args.current {
		config.current = Some(current.clone());
	}

	let vault = MarkdownVault::open_with_config(root, &config)?;
	Ok(Scrier::with_config(vault, config))
}

fn run(args: &ScryCli, command: &Commands) -> AnyEmptyResult {
	let scrier = open_scrier(args)?;

	match command {
		Commands::Get {
			sources,
			property,
			many,
		} => {
			let source = sources_arg(sources, *many);
			match property {
				Some(property) => {
					let values = scrier.get_property(source, property.as_str())?;
					print_json(&values.map(|value| value.unwrap_or(Value::Null)))
				}
				None => print_json(&scrier.get(source)?),
			}
		}
		Commands::Patch {
			source,
			data,
			property,
			redirect,
		} => {
			let source = source_arg(source);
			let written = match property {
				Some(property) => {
					let value = parse_json(data)?;
					scrier.patch_property(source, property.as_str(), &value, (*redirect).into())?
				}
				None => scrier.patch(source, &parse_object(data)?, (*redirect).into())?,
			};
			print_written(written)
		}
		Commands::Set {
			source,
			data,
			redirect,
		} => {
			let written = scrier.set(source_arg(source), &parse_object(data)?, (*redirect).into())?;
			print_written(written)
		}
		Commands::Clear {
			source,
			keys,
			redirect,
		} => run_clear(&scrier, source, keys, *redirect),
		Commands::Sections { source } => {
			let sections = scrier.sections(source_arg(source))?;
			print_json(&sections.map(|sections| sections.to_value()))
		}
		Commands::Section { source, heading } => {
			for text in scrier.load_section(source_arg(source), heading)?.values() {
				println!("{text}");
			}
			Ok(())
		}
		Commands::IndexBy { path } => {
			let items = every_document(&scrier)?;
			let indexed = index_by(&items, &scrier.path(path.as_str()))?;
			let output = indexed
				.into_iter()
				.map(|(key, item)| (key, item.clone()))
				.collect::<Map<String, Value>>();
			print_json(&output)
		}
		Commands::GroupBy { path } => {
			let items = every_document(&scrier)?;
			let grouped = group_by(&items, &scrier.path(path.as_str()));
			let output = grouped
				.into_iter()
				.map(|(key, items)| (key, Value::Array(items.into_iter().cloned().collect())))
				.collect::<Map<String, Value>>();
			print_json(&output)
		}
	}
}

fn run_clear(
	scrier: &Scrier<MarkdownVault>,
	source: &str,
	keys: &[String],
	redirect: RedirectArgs,
) -> AnyEmptyResult {
	let source = source_arg(source);
	let written = if keys.is_empty() {
		scrier.clear(source, None::<Vec<String>>, redirect.into())?
	} else {
		scrier.clear(source, keys.to_vec(), redirect.into())?
	};

	print_written(written)
}

/// The merged metadata of every document in the vault.
fn every_document(scrier: &Scrier<MarkdownVault>) -> AnyResult<Vec<Value>> {
	let documents = scrier.vault().documents().to_vec();
	tracing::debug!(documents = documents.len(), "reading every document");
	let metadata = scrier.get(Source::many(documents))?;

	Ok(metadata.values().map(Metadata::to_value).collect())
}

/// Print the frontmatter each write left behind.
fn print_written(written: Scried<Metadata>) -> AnyEmptyResult {
	print_json(&written.map(Metadata::into_frontmatter))
}

fn print_json(value: &impl serde::Serialize) -> AnyEmptyResult {
	println!("{}", serde_json::to_string_pretty(value)?);
	Ok(())
}

fn parse_json(data: &str) -> AnyResult<Value> {
	serde_json::from_str(data).map_err(|e| format!("invalid JSON `{data}`: {e}").into())
}

fn parse_object(data: &str) -> AnyResult<Map<String, Value>> {
	match parse_json(data)? {
		Value::Object(map) => Ok(map),
		other => Err(format!("expected a JSON object, found `{other}`").into()),
	}
}
