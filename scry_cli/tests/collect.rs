mod common;

use scry_core::AnyEmptyResult;
use serde_json::Value;
use serde_json::json;
use similar_asserts::assert_eq;

fn keys(value: &Value) -> Vec<String> {
	value
		.as_object()
		.map(|map| map.keys().cloned().collect())
		.unwrap_or_default()
}

#[test]
fn index_by_keys_every_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	let output = common::scry_cmd()
		.arg("index-by")
		.arg("title")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let indexed: Value = serde_json::from_slice(&output)?;

	assert_eq!(keys(&indexed), vec!["Other".to_string(), "Today".to_string()]);
	assert_eq!(indexed["Today"]["file"]["path"], json!("notes/today.md"));

	Ok(())
}

#[test]
fn index_by_rejects_duplicate_keys() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());
	common::write_file(tmp.path(), "notes/again.md", "---\ntitle: Today\n---\n");

	common::scry_cmd()
		.arg("index-by")
		.arg("title")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("duplicate key `Today`"));

	Ok(())
}

#[test]
fn index_by_rejects_missing_keys() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());

	common::scry_cmd()
		.arg("index-by")
		.arg("kind")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no value at key path `kind`"));

	Ok(())
}

#[test]
fn group_by_files_documents_without_the_key_under_empty() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::notes_vault(tmp.path());
	common::write_file(tmp.path(), "journal/entry.md", "---\nkind: note\n---\n");

	let output = common::scry_cmd()
		.arg("group-by")
		.arg("kind")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let grouped: Value = serde_json::from_slice(&output)?;

	assert_eq!(keys(&grouped), vec!["note".to_string(), String::new()]);
	let paths = grouped["note"]
		.as_array()
		.map(|items| {
			items
				.iter()
				.map(|item| item["file"]["path"].clone())
				.collect::<Vec<_>>()
		})
		.unwrap_or_default();
	assert_eq!(paths, vec![json!("journal/entry.md"), json!("notes/other.md")]);

	Ok(())
}

#[test]
fn group_by_uses_the_configured_delimiter() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "scry.toml", "delimiter = \"/\"\n");
	common::write_file(tmp.path(), "a.md", "---\nmeta:\n  rank: 1\n---\n");
	common::write_file(tmp.path(), "b.md", "---\nmeta:\n  rank: 1\n---\n");

	let output = common::scry_cmd()
		.arg("group-by")
		.arg("meta/rank")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();
	let grouped: Value = serde_json::from_slice(&output)?;

	assert_eq!(keys(&grouped), vec!["1".to_string()]);

	Ok(())
}
