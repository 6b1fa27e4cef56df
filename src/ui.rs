use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::time::Duration;

use crate::github::{NodeType, RepoNode, file_color};

/// Track quiet mode state
static QUIET_MODE: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    let mut quiet_mode = QUIET_MODE.lock();
    *quiet_mode = enabled;
}

/// Check if quiet mode is enabled
pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    // Don't create a spinner in quiet mode
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan.bold} {msg}")
            .expect("Could not set spinner style"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

pub fn print_info(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.cyan().bold());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.yellow().bold());
    }
}

pub fn print_error(message: &str) {
    // Always print errors, even in quiet mode
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.green().bold());
    }
}

pub fn print_version(version: &str) {
    if !is_quiet_mode() {
        println!(
            "{} {} {}",
            "🗺 Repo-Atlas".magenta().bold(),
            "version".cyan(),
            version.green()
        );
    }
}

/// Print a simple message (respects quiet mode)
pub fn print_message(message: &str) {
    if !is_quiet_mode() {
        println!("{message}");
    }
}

/// Print an empty line (respects quiet mode)
pub fn print_newline() {
    if !is_quiet_mode() {
        println!();
    }
}

/// Renders a resolved structure as an indented tree, optionally cut off at
/// `max_depth` levels below the root.
pub fn print_tree(root: &RepoNode, max_depth: Option<usize>) {
    println!("{}", format_label(root));
    if let Some(children) = &root.children {
        let limit = max_depth.unwrap_or(usize::MAX);
        for (index, child) in children.iter().enumerate() {
            render_node(child, "", index + 1 == children.len(), 1, limit);
        }
    }
}

fn render_node(node: &RepoNode, prefix: &str, is_last: bool, depth: usize, limit: usize) {
    if depth > limit {
        return;
    }

    let connector = if is_last { "└── " } else { "├── " };
    println!("{prefix}{}{}", connector.dimmed(), format_label(node));

    let Some(children) = &node.children else {
        return;
    };

    let child_prefix = if is_last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}{}   ", "│".dimmed())
    };

    if depth == limit && !children.is_empty() {
        println!("{child_prefix}{}", "…".dimmed());
        return;
    }

    for (index, child) in children.iter().enumerate() {
        render_node(child, &child_prefix, index + 1 == children.len(), depth + 1, limit);
    }
}

fn format_label(node: &RepoNode) -> String {
    match node.node_type {
        NodeType::Dir => format!("{}/", node.name.cyan().bold()),
        NodeType::Submodule => format!("{} {}", node.name.magenta().bold(), "(submodule)".dimmed()),
        NodeType::File => {
            let (r, g, b) = file_color(&node.name);
            let name = node.name.truecolor(r, g, b);
            match node.size {
                Some(size) => format!("{name} {}", format_size(size).dimmed()),
                None => name.to_string(),
            }
        }
    }
}

/// Prints file/directory/submodule counts and the total blob size.
pub fn print_summary(root: &RepoNode) {
    let mut files: usize = 0;
    let mut dirs: usize = 0;
    let mut submodules: usize = 0;
    let mut total_size: u64 = 0;

    root.walk(&mut |node| match node.node_type {
        NodeType::File => {
            files += 1;
            total_size += node.size.unwrap_or(0);
        }
        NodeType::Dir => dirs += 1,
        NodeType::Submodule => submodules += 1,
    });

    // The root node itself is not an interesting directory
    dirs = dirs.saturating_sub(1);

    let mut parts = vec![
        format!("{files} files"),
        format!("{dirs} directories"),
    ];
    if submodules > 0 {
        parts.push(format!("{submodules} submodules"));
    }
    parts.push(format_size(total_size));

    print_newline();
    print_message(&parts.join(", ").dimmed().to_string());
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    const GIB: u64 = MIB * 1024;

    match bytes {
        0..KIB => format!("{bytes} B"),
        KIB..MIB => format!("{:.1} KiB", bytes as f64 / KIB as f64),
        MIB..GIB => format!("{:.1} MiB", bytes as f64 / MIB as f64),
        _ => format!("{:.1} GiB", bytes as f64 / GIB as f64),
    }
}
