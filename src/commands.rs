use crate::cache::{self, CacheStore};
use crate::cli::CacheAction;
use crate::common::CommonParams;
use crate::config::Config;
use crate::github::{GitHubClient, RepoCoordinate, StructureFetcher, SubmoduleOutcome};
use crate::log_debug;
use crate::ui;
use anyhow::{Result, anyhow};
use colored::Colorize;
use std::sync::Arc;
use url::Url;

/// Handle the 'view' command: fetch a repository's structure and render it
pub async fn handle_view_command(repository: String, common: CommonParams) -> Result<()> {
    let mut config = Config::load()?;
    common.apply_to_config(&mut config);

    let coordinate = RepoCoordinate::parse(&repository)?;

    let cache = Arc::new(CacheStore::open(
        Config::cache_file_path()?,
        config.cache_ttl(),
    ));
    let sweeper = cache::start_sweeper(Arc::clone(&cache));

    let client = Arc::new(GitHubClient::new(&config)?);
    let fetcher = StructureFetcher::new(client, Arc::clone(&cache))
        .with_max_depth(config.max_submodule_depth)
        .with_submodules(config.resolve_submodules)
        .with_refresh(common.refresh);

    let spinner = ui::create_spinner(&format!("Fetching structure of {coordinate}..."));
    let report = fetcher.fetch(&coordinate).await;
    spinner.finish_and_clear();
    sweeper.abort();

    let report = report?;

    if common.json {
        println!("{}", serde_json::to_string_pretty(&report.root)?);
        return Ok(());
    }

    ui::print_tree(&report.root, common.depth);
    for outcome in &report.submodules {
        if let SubmoduleOutcome::Skipped { path, reason } = outcome {
            ui::print_warning(&format!("Skipped submodule {path}: {reason}"));
        }
    }
    ui::print_summary(&report.root);

    Ok(())
}

/// Handle the 'cache' command
pub fn handle_cache_command(action: &CacheAction) -> Result<()> {
    let config = Config::load()?;
    let cache = CacheStore::open(Config::cache_file_path()?, config.cache_ttl());

    match action {
        CacheAction::Stats => {
            let ages = cache.entry_ages();
            if ages.is_empty() {
                ui::print_message("Cache is empty");
                return Ok(());
            }

            ui::print_info(&format!(
                "{} cached entries (retention window {}s)",
                ages.len(),
                config.cache_ttl_secs
            ));
            for (key, age) in ages {
                ui::print_message(&format!(
                    "  {} {}",
                    key,
                    format!("({}s old)", age.as_secs()).dimmed()
                ));
            }
        }
        CacheAction::Clear => {
            let evicted = cache.len();
            cache.clear();
            ui::print_success(&format!("Cleared {evicted} cached entries"));
        }
    }

    Ok(())
}

/// Handle the 'config' command
pub fn handle_config_command(
    api_url: Option<String>,
    timeout: Option<u64>,
    retries: Option<u32>,
    ttl: Option<u64>,
    max_depth: Option<usize>,
) -> Result<()> {
    if let Some(api_url) = &api_url {
        Url::parse(api_url).map_err(|e| anyhow!("Invalid API base URL: {}", e))?;
    }

    let mut config = Config::load()?;
    let changes_made = config.update(api_url, timeout, retries, ttl, max_depth);

    if changes_made {
        config.save()?;
        ui::print_success("Configuration updated");
        log_debug!("Configuration changes saved");
    }

    ui::print_info("Current configuration:");
    ui::print_message(&format!("  API base URL:       {}", config.api_base_url));
    ui::print_message(&format!(
        "  Request timeout:    {}s",
        config.request_timeout_secs
    ));
    ui::print_message(&format!("  Max retries:        {}", config.max_retries));
    ui::print_message(&format!("  Cache TTL:          {}s", config.cache_ttl_secs));
    ui::print_message(&format!(
        "  Submodule depth:    {}",
        config.max_submodule_depth
    ));
    ui::print_message(&format!(
        "  Resolve submodules: {}",
        config.resolve_submodules
    ));

    Ok(())
}
