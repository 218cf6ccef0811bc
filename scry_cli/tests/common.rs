#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const TODAY: &str = "---\ntitle: Today\ntags:\n- daily\n- work\n---\n# Plans\n\nShip it.\n\n## Details\n\nSmall steps.\n\n# Log\n\nDone.\n";
pub const OTHER: &str = "---\ntitle: Other\nkind: note\n---\n# Intro\n\nHello.\n";

pub fn scry_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("scry"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("SCRY_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create {parent:?}: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {path:?}: {e}"));
}

pub fn read_file(root: &Path, relative: &str) -> String {
	let path = root.join(relative);
	std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path:?}: {e}"))
}

/// A vault with two notes, `notes/today.md` active through `scry.toml`.
pub fn notes_vault(root: &Path) {
	write_file(root, "scry.toml", "current = \"notes/today.md\"\n");
	write_file(root, "notes/today.md", TODAY);
	write_file(root, "notes/other.md", OTHER);
}
