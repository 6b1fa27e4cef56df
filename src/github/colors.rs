//! GitHub-like language colors for file extensions.

/// Fallback for unknown extensions
const DEFAULT_COLOR: (u8, u8, u8) = (0x8B, 0x94, 0x9E);

/// Display color for a file name, keyed by its extension.
pub fn file_color(name: &str) -> (u8, u8, u8) {
    let Some(extension) = extension(name) else {
        return DEFAULT_COLOR;
    };

    match extension.as_str() {
        // Programming languages
        "ts" | "tsx" => (0x31, 0x78, 0xC6),
        "js" | "jsx" => (0xF7, 0xDF, 0x1E),
        "py" => (0x37, 0x76, 0xAB),
        "java" => (0xB0, 0x72, 0x19),
        "cpp" => (0xF3, 0x4B, 0x7D),
        "c" => (0x55, 0x55, 0x55),
        "cs" => (0x17, 0x86, 0x00),
        "go" => (0x00, 0xAD, 0xD8),
        "rb" => (0xCC, 0x34, 0x2D),
        "php" => (0x4F, 0x5D, 0x95),
        "swift" => (0xF0, 0x51, 0x38),
        "kt" => (0xA9, 0x7B, 0xFF),
        "rs" => (0xDE, 0xA5, 0x84),

        // Web technologies
        "html" => (0xE3, 0x4C, 0x26),
        "css" => (0x56, 0x3D, 0x7C),
        "scss" => (0xC6, 0x53, 0x8C),
        "less" => (0x1D, 0x36, 0x5D),
        "vue" => (0x41, 0xB8, 0x83),
        "svelte" => (0xFF, 0x3E, 0x00),

        // Data & config
        "json" => (0x29, 0x29, 0x29),
        "xml" => (0x00, 0x60, 0xAC),
        "yaml" | "yml" => (0xCB, 0x17, 0x1E),
        "toml" => (0x9C, 0x42, 0x21),
        "ini" => (0xD1, 0xDD, 0xE9),
        "env" => (0x50, 0x99, 0x41),

        // Documentation
        "md" => (0x08, 0x3F, 0xA1),
        "mdx" => (0x1B, 0x2B, 0x34),
        "txt" => (0x6E, 0x76, 0x81),
        "doc" => (0x2B, 0x57, 0x9A),
        "pdf" => (0xB3, 0x0B, 0x00),

        // Shell & scripts
        "sh" | "bash" => (0x89, 0xE0, 0x51),
        "ps1" => (0x01, 0x24, 0x56),
        "bat" => (0xC1, 0xF1, 0x2E),

        // Images
        "png" => (0xA6, 0xCC, 0x33),
        "jpg" | "jpeg" | "svg" | "ico" => (0xFF, 0xB1, 0x3B),
        "gif" => (0xFF, 0x69, 0xB4),

        // Other
        "sql" => (0xE3, 0x8C, 0x00),
        "db" => (0x00, 0x3B, 0x57),
        "zip" | "tar" | "gz" => (0x6E, 0x76, 0x81),
        "lock" => (0xF8, 0xC2, 0x00),
        "log" => (0xB5, 0xB5, 0xB5),

        _ => DEFAULT_COLOR,
    }
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .filter(|(_, ext)| !ext.is_empty())
        .map(|(_, ext)| ext.to_ascii_lowercase())
}
