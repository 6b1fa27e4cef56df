//! Repo-Atlas - terminal explorer for public GitHub repositories
//!
//! This library turns GitHub's flat recursive tree listing into a nested
//! structure, resolves submodules into sub-trees, and caches repeated
//! lookups with conditional HTTP revalidation.

// Allow certain clippy warnings that are stylistic preferences
#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::items_after_statements)] // Locally-scoped use statements are fine

pub mod cache;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod github;
pub mod logger;
pub mod ui;

// Re-export important structs and functions for easier testing
pub use cache::{CacheStore, Validators};
pub use config::Config;
pub use github::{
    FetchReport, GitHubApi, GitHubClient, GitHubError, RepoCoordinate, RepoNode, StructureFetcher,
};
