mod common;

use clap::Parser;
use rstest::rstest;
use scry_cli::Commands;
use scry_cli::ScryCli;
use scry_cli::sources_arg;
use scry_core::AnyEmptyResult;
use scry_core::Source;
use serde_json::Value;
use serde_json::json;
use similar_asserts::assert_eq;

fn stdout_json(cmd: &mut assert_cmd::Command) -> Result<Value, serde_json::Error> {
	let output = cmd.assert().success().get_output().stdout.clone();
	serde_json::from_slice(&output)
}

#[test]
fn get_reads_the_merged_metadata_of_a_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let report = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("notes/other.md")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(report["title"], json!("Other"));
	assert_eq!(report["file"]["path"], json!("notes/other.md"));
	assert_eq!(report["file"]["stem"], json!("other"));
	assert_eq!(report["file"]["sections"]["Intro"]["line"], json!(5));
	assert_eq!(report["cache"], json!({}));

	Ok(())
}

#[test]
fn get_without_sources_reads_the_current_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let tags = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("--property")
			.arg("tags.1")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(tags, json!("work"));

	Ok(())
}

#[test]
fn get_prints_null_for_missing_properties() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let missing = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("@")
			.arg("--property")
			.arg("tags.9.name")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(missing, Value::Null);

	Ok(())
}

#[test]
fn current_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let title = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("--property")
			.arg("title")
			.arg("--current")
			.arg("notes/other.md")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(title, json!("Other"));

	Ok(())
}

#[test]
fn get_with_several_sources_keys_by_identifier() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let titles = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("notes/other.md")
			.arg("@")
			.arg("--property")
			.arg("title")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(
		titles,
		json!({ "notes/other.md": "Other", "notes/today.md": "Today" })
	);

	Ok(())
}

#[test]
fn get_many_keys_a_single_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let titles = stdout_json(
		common::scry_cmd()
			.arg("get")
			.arg("notes/other.md")
			.arg("--many")
			.arg("--property")
			.arg("title")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(titles, json!({ "notes/other.md": "Other" }));

	Ok(())
}

#[test]
fn get_fails_without_an_active_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "notes/today.md", common::TODAY);

	common::scry_cmd()
		.arg("get")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no document is currently active"));

	Ok(())
}

#[test]
fn get_fails_for_unknown_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	common::scry_cmd()
		.arg("get")
		.arg("notes/missing.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("notes/missing.md"));

	Ok(())
}

#[test]
fn unknown_current_document_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	common::scry_cmd()
		.arg("get")
		.arg("--current")
		.arg("../outside.md")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("document not found"));

	Ok(())
}

#[test]
fn sections_lists_headings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let sections = stdout_json(
		common::scry_cmd()
			.arg("sections")
			.arg("@")
			.arg("--path")
			.arg(tmp.path()),
	)?;

	assert_eq!(
		sections,
		json!({
			"Plans": { "heading": "Plans", "level": 1, "line": 7 },
			"Details": { "heading": "Details", "level": 2, "line": 11 },
			"Log": { "heading": "Log", "level": 1, "line": 15 },
		})
	);

	Ok(())
}

#[test]
fn section_prints_the_text_under_a_heading() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	common::scry_cmd()
		.arg("section")
		.arg("@")
		.arg("Plans")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("Ship it.\n\n## Details\n\nSmall steps.\n");

	Ok(())
}

#[test]
fn verbose_logs_to_stderr() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	common::scry_cmd()
		.arg("get")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("opened vault"));

	Ok(())
}

#[test]
fn get_arguments_parse() {
	let cli = ScryCli::parse_from(["scry", "get", "a.md", "b.md", "--many"]);
	match cli.command {
		Some(Commands::Get {
			sources,
			property,
			many,
		}) => {
			assert_eq!(sources, vec!["a.md".to_string(), "b.md".to_string()]);
			assert_eq!(property, None);
			assert!(many);
		}
		_ => panic!("expected Get command"),
	}
}

#[rstest]
#[case::nothing(&[], false, Source::Current)]
#[case::nothing_many(&[], true, Source::many([Source::Current]))]
#[case::current(&["@"], false, Source::Current)]
#[case::single(&["a.md"], false, Source::from("a.md"))]
#[case::single_many(&["a.md"], true, Source::many(["a.md"]))]
#[case::several(&["a.md", "@"], false, Source::many([Source::from("a.md"), Source::Current]))]
fn sources_arguments(#[case] args: &[&str], #[case] many: bool, #[case] expected: Source) {
	let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
	assert_eq!(sources_arg(&args, many), expected);
}
