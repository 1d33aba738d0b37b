//! Shared helpers for integration tests.

use std::process::{Command, Stdio};

/// True when `tool` can be launched from `PATH`.
///
/// Tests exercising the real external tools call this first and skip with a
/// note when the tool is not installed, so the suite passes everywhere.
pub fn tool_on_path(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Print a uniform skip note for a missing tool.
pub fn skip_note(tool: &str) {
    eprintln!("skipping: `{tool}` not found on PATH");
}
