//! Submodule graph resolution.
//!
//! Walks the `{path, url}` records a `.gitmodules` file declares and grafts
//! each GitHub-hosted submodule's structure into the host tree. Resolution
//! is best-effort: a submodule that cannot be fetched is recorded as a
//! skip, never as a failure of the host fetch.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use super::tree::find_or_create_directory;
use super::types::{NodeType, RepoCoordinate, RepoNode, SubmoduleRecord};

/// Matches a GitHub remote in either `https://github.com/owner/repo[.git]`
/// or `git@github.com:owner/repo[.git]` form.
static GITHUB_REMOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"github\.com[:/]([^/]+)/([^/.]+)(?:\.git)?$").expect("remote pattern is valid")
});

/// Extracts the repository coordinate from a submodule URL, if the URL
/// points at GitHub.
pub fn parse_github_remote(url: &str) -> Option<RepoCoordinate> {
    let caps = GITHUB_REMOTE_PATTERN.captures(url)?;
    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    Some(RepoCoordinate::new(owner, repo))
}

/// Why a declared submodule was left out of the host tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The URL does not point at a GitHub repository.
    ForeignHost,
    /// The coordinate already appeared in this traversal.
    CycleDetected,
    /// The nesting limit was reached.
    DepthExceeded,
    /// The recursive fetch failed; carries the underlying message.
    FetchFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForeignHost => write!(f, "URL is not hosted on GitHub"),
            Self::CycleDetected => write!(f, "repository already visited in this traversal"),
            Self::DepthExceeded => write!(f, "submodule nesting limit reached"),
            Self::FetchFailed(message) => write!(f, "fetch failed: {message}"),
        }
    }
}

/// Per-submodule result of a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmoduleOutcome {
    Resolved {
        path: String,
        coordinate: RepoCoordinate,
    },
    Skipped {
        path: String,
        reason: SkipReason,
    },
}

/// Bounds the re-entrant fetch: an accumulating set of visited coordinates
/// converts cycles into skips, and a depth cap converts runaway nesting
/// into skips.
#[derive(Debug)]
pub struct ResolveGuard {
    visited: HashSet<RepoCoordinate>,
    depth: usize,
    max_depth: usize,
}

impl ResolveGuard {
    pub fn new(max_depth: usize) -> Self {
        Self {
            visited: HashSet::new(),
            depth: 0,
            max_depth,
        }
    }

    /// A guard with the host repository pre-registered, so a submodule
    /// pointing back at its host is cut on the first level.
    pub fn for_root(coordinate: &RepoCoordinate, max_depth: usize) -> Self {
        let mut guard = Self::new(max_depth);
        guard.visited.insert(coordinate.clone());
        guard
    }

    /// Marks a coordinate as entered, or says why it must not be.
    ///
    /// Coordinates accumulate for the whole traversal; a repeat anywhere in
    /// the walk is cut, which also covers the repeated-sibling case.
    pub fn enter(&mut self, coordinate: &RepoCoordinate) -> Result<(), SkipReason> {
        if self.depth >= self.max_depth {
            return Err(SkipReason::DepthExceeded);
        }
        if !self.visited.insert(coordinate.clone()) {
            return Err(SkipReason::CycleDetected);
        }
        self.depth += 1;
        Ok(())
    }

    /// Unwinds one level of nesting. The visited set keeps its entries.
    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Grafts a resolved submodule structure into the host tree at its declared
/// path.
///
/// Intermediate directories are located or synthesized; the grafted root is
/// renamed to the last path segment (falling back to the repository name),
/// repointed at the declared path, and forced to `submodule` type.
pub fn graft_submodule(
    host_root: &mut RepoNode,
    record: &SubmoduleRecord,
    coordinate: &RepoCoordinate,
    mut subtree: RepoNode,
) {
    let (parent_path, leaf) = match record.path.rsplit_once('/') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", record.path.as_str()),
    };

    subtree.name = if leaf.is_empty() {
        coordinate.repo.clone()
    } else {
        leaf.to_string()
    };
    subtree.path = record.path.clone();
    subtree.node_type = NodeType::Submodule;

    let parent = if parent_path.is_empty() {
        host_root
    } else {
        find_or_create_directory(host_root, parent_path)
    };
    parent.children.get_or_insert_with(Vec::new).push(subtree);
}
