//! Data model for repository structures.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use super::error::GitHubError;

/// Accepts `https://github.com/<owner>/<repo>` with an optional `.git`
/// suffix and optional trailing path segments.
static REPO_URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://github\.com/([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?(?:[/?#].*)?$")
        .expect("repository URL pattern is valid")
});

/// Accepts a bare `owner/repo` coordinate.
static REPO_SLUG_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?$")
        .expect("repository slug pattern is valid")
});

/// Identifies a remote repository by its `(owner, repo)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoCoordinate {
    pub owner: String,
    pub repo: String,
}

impl RepoCoordinate {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Parses a repository coordinate from a GitHub URL or a bare
    /// `owner/repo` slug.
    pub fn parse(input: &str) -> Result<Self, GitHubError> {
        let input = input.trim();
        let captures = REPO_URL_PATTERN
            .captures(input)
            .or_else(|| REPO_SLUG_PATTERN.captures(input));

        match captures {
            Some(caps) => {
                let owner = caps
                    .get(1)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let repo = caps
                    .get(2)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                Ok(Self { owner, repo })
            }
            None => Err(GitHubError::InvalidRepository(input.to_string())),
        }
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoCoordinate {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Repository metadata returned by `GET /repos/{owner}/{repo}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    /// Name of the branch a recursive tree listing should target
    pub default_branch: String,
    /// Private repositories are rejected before any tree fetch
    #[serde(default)]
    pub private: bool,
}

/// Kind of a raw tree entry as reported by the API.
///
/// `Other` covers gitlink (`commit`) rows; they surface as empty
/// directories until the submodule resolver grafts the real subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeItemKind {
    Blob,
    Tree,
    #[serde(other)]
    Other,
}

/// Raw transport record from the recursive tree listing. Consumed by the
/// tree builder and discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeItem {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub mode: String,
    #[serde(rename = "type")]
    pub kind: TreeItemKind,
    #[serde(default)]
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A `{path, url}` record declared in a `.gitmodules` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleRecord {
    pub path: String,
    pub url: String,
}

/// Node category in a resolved structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    File,
    Dir,
    Submodule,
}

/// One node of a resolved repository structure.
///
/// `path` is repo-root-relative (empty for the root). `children` is present
/// exactly when the node is not a file; files may carry a `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<RepoNode>>,
}

impl RepoNode {
    /// An empty root directory node, named after the repository.
    pub fn root(name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: String::new(),
            node_type: NodeType::Dir,
            size: None,
            children: Some(Vec::new()),
        }
    }

    /// Depth-first traversal, visiting the node itself before its children.
    pub fn walk(&self, visit: &mut dyn FnMut(&RepoNode)) {
        visit(self);
        if let Some(children) = &self.children {
            for child in children {
                child.walk(visit);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_slug() {
        let coord = RepoCoordinate::parse("acme/widgets").expect("slug should parse");
        assert_eq!(coord.owner, "acme");
        assert_eq!(coord.repo, "widgets");
    }

    #[test]
    fn parses_full_url_with_trailing_path() {
        let coord = RepoCoordinate::parse("https://github.com/vercel/next.js/tree/canary")
            .expect("URL should parse");
        assert_eq!(coord.owner, "vercel");
        assert_eq!(coord.repo, "next.js");
    }

    #[test]
    fn strips_git_suffix() {
        let coord =
            RepoCoordinate::parse("https://github.com/acme/lib.git").expect("URL should parse");
        assert_eq!(coord.repo, "lib");
    }

    #[test]
    fn rejects_non_github_input() {
        assert!(RepoCoordinate::parse("https://gitlab.com/acme/lib").is_err());
        assert!(RepoCoordinate::parse("not a repository").is_err());
        assert!(RepoCoordinate::parse("").is_err());
    }

    #[test]
    fn displays_as_slug() {
        let coord = RepoCoordinate::new("acme", "widgets");
        assert_eq!(coord.to_string(), "acme/widgets");
    }
}
