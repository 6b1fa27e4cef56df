use repo_atlas::github::{SubmoduleRecord, parse_gitmodules};

#[test]
fn test_single_submodule_block() {
    let content = "[submodule \"lib\"]\n\tpath = vendor/lib\n\turl = https://github.com/acme/lib.git";
    let records = parse_gitmodules(content);

    assert_eq!(
        records,
        vec![SubmoduleRecord {
            path: "vendor/lib".to_string(),
            url: "https://github.com/acme/lib.git".to_string(),
        }]
    );
}

#[test]
fn test_multiple_blocks_keep_declaration_order() {
    let content = "\
[submodule \"first\"]
\tpath = deps/first
\turl = https://github.com/acme/first
[submodule \"second\"]
\tpath = deps/second
\turl = git@github.com:acme/second.git
";
    let records = parse_gitmodules(content);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].path, "deps/first");
    assert_eq!(records[1].path, "deps/second");
    assert_eq!(records[1].url, "git@github.com:acme/second.git");
}

#[test]
fn test_block_missing_url_is_skipped() {
    let content = "\
[submodule \"broken\"]
\tpath = deps/broken
[submodule \"ok\"]
\tpath = deps/ok
\turl = https://github.com/acme/ok
";
    let records = parse_gitmodules(content);

    // The broken block's `path` line is not followed by a `url` line, so
    // the scan skips past it.
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "deps/ok");
}

#[test]
fn test_reordered_keys_are_skipped() {
    let content = "[submodule \"odd\"]\n\turl = https://github.com/acme/odd\n\tpath = deps/odd\n";
    assert!(parse_gitmodules(content).is_empty());
}

#[test]
fn test_values_are_trimmed() {
    let content = "[submodule \"lib\"]\n  path =   vendor/lib  \n  url =  https://github.com/acme/lib \n";
    let records = parse_gitmodules(content);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "vendor/lib");
    assert_eq!(records[0].url, "https://github.com/acme/lib");
}

#[test]
fn test_empty_and_unrelated_content() {
    assert!(parse_gitmodules("").is_empty());
    assert!(parse_gitmodules("[core]\n\tbare = false\n").is_empty());
}
