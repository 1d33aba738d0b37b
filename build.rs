use std::process::Command;

// Shares parse_describe with the crate proper so the translation rules are
// unit-tested in one place.
include!("src/version.rs");

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let fallback = env!("CARGO_PKG_VERSION");
    let version = match git_describe() {
        Some(describe) => parse_describe(&describe, fallback),
        None => fallback.to_string(),
    };
    println!("cargo:rustc-env=CLIPLINE_VERSION={version}");
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--long", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let describe = String::from_utf8(output.stdout).ok()?;
    let describe = describe.trim();
    if describe.is_empty() {
        None
    } else {
        Some(describe.to_string())
    }
}
