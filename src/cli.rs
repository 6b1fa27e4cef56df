use crate::commands;
use crate::common::CommonParams;
use crate::log_debug;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{CommandFactory, Parser, Subcommand, crate_version};
use clap_complete::Shell;

const LOG_FILE: &str = "repo-atlas-debug.log";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Repo-Atlas: explore GitHub repository structures from the terminal",
    long_about = "Repo-Atlas fetches the file, directory, and submodule structure of any public GitHub repository and renders it as a tree, with cached, revalidating lookups.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, summaries, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and render a repository's structure
    #[command(
        about = "Fetch and render a repository's structure",
        long_about = "Fetch a public GitHub repository's file, directory, and submodule structure and render it as a tree. Accepts 'owner/repo' or a full https://github.com/owner/repo URL."
    )]
    View {
        /// Repository to explore ('owner/repo' or a GitHub URL)
        #[arg(help = "Repository to explore ('owner/repo' or a GitHub URL)")]
        repository: String,

        #[command(flatten)]
        common: CommonParams,
    },

    /// Inspect or clear the structure cache
    #[command(about = "Inspect or clear the structure cache")]
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Configure Repo-Atlas settings
    #[command(about = "Configure Repo-Atlas settings")]
    Config {
        /// Set the GitHub API base URL
        #[arg(long, help = "Set the GitHub API base URL")]
        api_url: Option<String>,

        /// Set the per-request timeout in seconds
        #[arg(long, help = "Set the per-request timeout in seconds")]
        timeout: Option<u64>,

        /// Set how many times transient failures are retried
        #[arg(long, help = "Set how many times transient failures are retried")]
        retries: Option<u32>,

        /// Set the cache retention window in seconds
        #[arg(long, help = "Set the cache retention window in seconds")]
        ttl: Option<u64>,

        /// Set the submodule nesting limit
        #[arg(long, help = "Set the submodule nesting limit")]
        max_depth: Option<usize>,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completions")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

/// Cache maintenance actions
#[derive(Subcommand)]
pub enum CacheAction {
    /// Show entry counts and ages
    #[command(about = "Show entry counts and ages")]
    Stats,
    /// Drop every cached entry
    #[command(about = "Drop every cached entry")]
    Clear,
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let _ = crate::logger::init();
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;

        if let Ok(config) = crate::config::Config::load() {
            crate::logger::set_verbose_logging(config.verbose_logging);
        }
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    match cli.command {
        Some(command) => handle_command(command).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

/// Handle the command passed to the CLI
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::View { repository, common } => {
            log_debug!(
                "Handling 'view' command with repository: {}, common: {:?}",
                repository,
                common
            );
            commands::handle_view_command(repository, common).await
        }
        Commands::Cache { action } => commands::handle_cache_command(&action),
        Commands::Config {
            api_url,
            timeout,
            retries,
            ttl,
            max_depth,
        } => commands::handle_config_command(api_url, timeout, retries, ttl, max_depth),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
