// GitHub module providing the tree-build-and-cache pipeline

mod client;
mod colors;
mod error;
mod fetcher;
mod gitmodules;
mod submodules;
mod tree;
mod types;

// Re-export primary types for public use
pub use client::{GitHubApi, GitHubClient, MetadataResponse};
pub use error::GitHubError;
pub use fetcher::{DEFAULT_MAX_DEPTH, FetchReport, StructureFetcher};
pub use submodules::{ResolveGuard, SkipReason, SubmoduleOutcome};
pub use types::{
    NodeType, RepoCoordinate, RepoNode, Repository, SubmoduleRecord, TreeItem, TreeItemKind,
};

// Re-export utility functions
pub use colors::file_color;
pub use gitmodules::parse_gitmodules;
pub use submodules::{graft_submodule, parse_github_remote};
pub use tree::{build_tree, find_or_create_directory};
