//! `.gitmodules` extraction.

use regex::Regex;
use std::sync::LazyLock;

use super::types::SubmoduleRecord;

/// Matches a `[submodule "<name>"]` block followed by its `path` and `url`
/// lines. The block name is matched but not surfaced; only `path` and `url`
/// are needed downstream.
static SUBMODULE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[submodule "([^"]+)"\]\s+path = ([^\n]+)\s+url = ([^\n]+)"#)
        .expect("submodule pattern is valid")
});

/// Extracts the ordered `{path, url}` records a `.gitmodules` file declares.
///
/// Blocks that do not match the expected shape (missing `path` or `url`,
/// reordered keys) are skipped rather than reported.
pub fn parse_gitmodules(content: &str) -> Vec<SubmoduleRecord> {
    SUBMODULE_PATTERN
        .captures_iter(content)
        .filter_map(|caps| {
            let path = caps.get(2)?.as_str().trim();
            let url = caps.get(3)?.as_str().trim();
            Some(SubmoduleRecord {
                path: path.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}
