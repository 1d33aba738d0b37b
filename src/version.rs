/// Translate `git describe --tags --long --dirty` output into a version
/// string.
///
/// A commit sitting exactly on a clean tag yields the tag itself
/// (`v2.0.0-0-g1a2b3c` becomes `v2.0.0`). Anything past a tag becomes a
/// development version carrying the commit count and short hash
/// (`v2.0.0-4-g1a2b3c` becomes `v2.0.0.dev4+1a2b3c`), with `dirty` appended
/// when the working tree had uncommitted changes. Input that does not look
/// like describe output yields `fallback` unchanged.
pub fn parse_describe(describe: &str, fallback: &str) -> String {
    let mut parts: Vec<&str> = describe.trim().split('-').collect();

    let dirty = parts.last() == Some(&"dirty");
    if dirty {
        parts.pop();
    }

    // Tags may themselves contain dashes, so peel count and hash off the
    // right-hand side and rejoin whatever remains.
    if parts.len() < 3 {
        return fallback.to_string();
    }
    let sha = parts.pop().unwrap_or_default();
    let count = parts.pop().unwrap_or_default();
    let tag = parts.join("-");

    let sha = sha.strip_prefix('g').unwrap_or(sha);
    if tag.is_empty() || sha.is_empty() || count.parse::<u64>().is_err() {
        return fallback.to_string();
    }

    if count == "0" && !dirty {
        tag
    } else {
        let mut version = format!("{tag}.dev{count}+{sha}");
        if dirty {
            version.push_str("dirty");
        }
        version
    }
}

#[cfg(test)]
mod tests {
    use super::parse_describe;
    use test_case::test_case;

    #[test_case("v2.0.0-0-g1a2b3c", "v2.0.0"; "exact tag")]
    #[test_case("v2.0.0-4-g1a2b3c", "v2.0.0.dev4+1a2b3c"; "past a tag")]
    #[test_case("v2.0.0-4-g1a2b3c-dirty", "v2.0.0.dev4+1a2b3cdirty"; "dirty tree")]
    #[test_case("v2.0.0-0-g1a2b3c-dirty", "v2.0.0.dev0+1a2b3cdirty"; "dirty on tag")]
    #[test_case("v2.0-rc1-3-gabc123", "v2.0-rc1.dev3+abc123"; "dashed tag")]
    fn translates_describe_output(describe: &str, expected: &str) {
        assert_eq!(parse_describe(describe, "9.9.9"), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("2.0.0"; "bare version")]
    #[test_case("v2.0.0-x-g1a2b3c"; "non numeric count")]
    fn falls_back_on_unparseable_input(describe: &str) {
        assert_eq!(parse_describe(describe, "9.9.9"), "9.9.9");
    }
}
