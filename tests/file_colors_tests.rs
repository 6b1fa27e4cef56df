use repo_atlas::github::file_color;

const DEFAULT_COLOR: (u8, u8, u8) = (0x8B, 0x94, 0x9E);

#[test]
fn test_known_extensions_map_to_language_colors() {
    assert_eq!(file_color("main.rs"), (0xDE, 0xA5, 0x84));
    assert_eq!(file_color("app.tsx"), (0x31, 0x78, 0xC6));
    assert_eq!(file_color("setup.py"), (0x37, 0x76, 0xAB));
    assert_eq!(file_color("config.yaml"), file_color("config.yml"));
}

#[test]
fn test_extension_lookup_is_case_insensitive() {
    assert_eq!(file_color("MAIN.RS"), file_color("main.rs"));
    assert_eq!(file_color("Readme.MD"), file_color("readme.md"));
}

#[test]
fn test_unknown_or_missing_extension_uses_default() {
    assert_eq!(file_color("binary.xyz123"), DEFAULT_COLOR);
    assert_eq!(file_color("Makefile"), DEFAULT_COLOR);
    assert_eq!(file_color("trailing."), DEFAULT_COLOR);
}

#[test]
fn test_dotfiles_resolve_by_suffix() {
    // `.env` has its own color; other dotfiles fall through to the default
    assert_eq!(file_color(".env"), (0x50, 0x99, 0x41));
    assert_eq!(file_color(".gitignore"), DEFAULT_COLOR);
}

#[test]
fn test_only_last_suffix_counts() {
    assert_eq!(file_color("archive.tar.gz"), file_color("x.gz"));
    assert_eq!(file_color("Cargo.lock"), (0xF8, 0xC2, 0x00));
}
