//! Orchestrates the fetch → build → resolve → cache pipeline.

use futures::future::BoxFuture;
use std::sync::Arc;

use crate::cache::{CacheStore, Validators};
use crate::{log_debug, log_warn};

use super::client::{GitHubApi, MetadataResponse};
use super::error::GitHubError;
use super::gitmodules::parse_gitmodules;
use super::submodules::{
    ResolveGuard, SkipReason, SubmoduleOutcome, graft_submodule, parse_github_remote,
};
use super::tree::build_tree;
use super::types::{RepoCoordinate, RepoNode, Repository, SubmoduleRecord};

/// Default cap on submodule nesting.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// A resolved structure plus the per-submodule outcomes of the traversal.
#[derive(Debug)]
pub struct FetchReport {
    pub root: RepoNode,
    pub submodules: Vec<SubmoduleOutcome>,
}

/// Fetches fully resolved repository structures.
///
/// One fetch is one sequential traversal: metadata, tree listing, tree
/// build, then submodule resolution in declaration order, re-entering the
/// pipeline once per submodule. The cache and the API client are injected.
pub struct StructureFetcher {
    api: Arc<dyn GitHubApi>,
    cache: Arc<CacheStore>,
    max_depth: usize,
    resolve_submodules: bool,
    skip_cache_read: bool,
}

impl StructureFetcher {
    pub fn new(api: Arc<dyn GitHubApi>, cache: Arc<CacheStore>) -> Self {
        Self {
            api,
            cache,
            max_depth: DEFAULT_MAX_DEPTH,
            resolve_submodules: true,
            skip_cache_read: false,
        }
    }

    /// Caps how deep submodule recursion may nest.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables submodule resolution.
    pub fn with_submodules(mut self, enabled: bool) -> Self {
        self.resolve_submodules = enabled;
        self
    }

    /// Skips cache reads; entries are still written back.
    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.skip_cache_read = refresh;
        self
    }

    /// Fetches the fully resolved structure for a repository.
    pub async fn fetch(&self, coordinate: &RepoCoordinate) -> Result<FetchReport, GitHubError> {
        let mut guard = ResolveGuard::for_root(coordinate, self.max_depth);
        let mut outcomes = Vec::new();
        let root = self
            .fetch_structure(coordinate.clone(), &mut guard, &mut outcomes)
            .await?;
        Ok(FetchReport {
            root,
            submodules: outcomes,
        })
    }

    /// Re-entrant pipeline body. Boxed because submodule resolution calls
    /// back into it.
    fn fetch_structure<'a>(
        &'a self,
        coordinate: RepoCoordinate,
        guard: &'a mut ResolveGuard,
        outcomes: &'a mut Vec<SubmoduleOutcome>,
    ) -> BoxFuture<'a, Result<RepoNode, GitHubError>> {
        Box::pin(async move {
            let cache_key = format!("repo_structure:{coordinate}");

            let cached: Option<(RepoNode, Validators)> = if self.skip_cache_read {
                None
            } else {
                self.cache.get(&cache_key)
            };

            // A fresh entry without validators cannot be revalidated; serve
            // it directly. One with validators gets a conditional request.
            if let Some((root, validators)) = &cached
                && validators.is_empty()
            {
                log_debug!("Cache hit for {}", coordinate);
                return Ok(root.clone());
            }

            let conditional = cached.as_ref().map(|(_, validators)| validators);
            let (repository, validators) =
                match self.api.repository(&coordinate, conditional).await? {
                    MetadataResponse::NotModified => match cached {
                        Some((root, _)) => {
                            log_debug!("Cache revalidated for {}", coordinate);
                            return Ok(root);
                        }
                        // A 304 only answers a conditional request, which is
                        // only sent with a cached copy in hand.
                        None => self.unconditional_metadata(&coordinate).await?,
                    },
                    MetadataResponse::Fresh {
                        repository,
                        validators,
                    } => (repository, validators),
                };

            if repository.private {
                return Err(GitHubError::PrivateRepository);
            }

            let items = self
                .api
                .tree(&coordinate, &repository.default_branch)
                .await?;
            if items.iter().all(|item| item.path.is_empty()) {
                return Err(GitHubError::EmptyTree);
            }

            let mut root = RepoNode::root(&coordinate.repo);
            build_tree(&items, &mut root);

            if self.resolve_submodules {
                self.resolve_into(
                    &coordinate,
                    &repository.default_branch,
                    &mut root,
                    guard,
                    outcomes,
                )
                .await;
            }

            self.cache.set(&cache_key, &root, validators);
            Ok(root)
        })
    }

    async fn unconditional_metadata(
        &self,
        coordinate: &RepoCoordinate,
    ) -> Result<(Repository, Validators), GitHubError> {
        match self.api.repository(coordinate, None).await? {
            MetadataResponse::Fresh {
                repository,
                validators,
            } => Ok((repository, validators)),
            MetadataResponse::NotModified => Err(GitHubError::Unknown {
                status: 304,
                message: "not-modified response to an unconditional request".to_string(),
            }),
        }
    }

    /// Walks the declared submodules and grafts each one it can resolve.
    /// Failures become skip outcomes; they never fail the host fetch.
    async fn resolve_into(
        &self,
        coordinate: &RepoCoordinate,
        branch: &str,
        root: &mut RepoNode,
        guard: &mut ResolveGuard,
        outcomes: &mut Vec<SubmoduleOutcome>,
    ) {
        let Some(records) = self.submodule_records(coordinate, branch).await else {
            return;
        };

        for record in records {
            let Some(sub_coordinate) = parse_github_remote(&record.url) else {
                log_debug!("Submodule {} is not GitHub-hosted, skipping", record.path);
                outcomes.push(SubmoduleOutcome::Skipped {
                    path: record.path,
                    reason: SkipReason::ForeignHost,
                });
                continue;
            };

            if let Err(reason) = guard.enter(&sub_coordinate) {
                log_warn!(
                    "Skipping submodule {} at {}: {}",
                    sub_coordinate,
                    record.path,
                    reason
                );
                outcomes.push(SubmoduleOutcome::Skipped {
                    path: record.path,
                    reason,
                });
                continue;
            }

            let fetched = self
                .fetch_structure(sub_coordinate.clone(), &mut *guard, &mut *outcomes)
                .await;
            guard.leave();

            match fetched {
                Ok(subtree) => {
                    graft_submodule(root, &record, &sub_coordinate, subtree);
                    outcomes.push(SubmoduleOutcome::Resolved {
                        path: record.path,
                        coordinate: sub_coordinate,
                    });
                }
                Err(err) => {
                    log_warn!(
                        "Failed to fetch submodule {} at {}: {}",
                        sub_coordinate,
                        record.path,
                        err
                    );
                    outcomes.push(SubmoduleOutcome::Skipped {
                        path: record.path,
                        reason: SkipReason::FetchFailed(err.to_string()),
                    });
                }
            }
        }
    }

    /// Cached `.gitmodules` records for a branch. `None` means the file is
    /// missing or unreadable, which counts as "no submodules".
    async fn submodule_records(
        &self,
        coordinate: &RepoCoordinate,
        branch: &str,
    ) -> Option<Vec<SubmoduleRecord>> {
        let cache_key = format!("submodules:{coordinate}/{branch}");
        if !self.skip_cache_read
            && let Some((records, _)) = self.cache.get::<Vec<SubmoduleRecord>>(&cache_key)
        {
            return Some(records);
        }

        let content = match self
            .api
            .file_content(coordinate, ".gitmodules", branch)
            .await
        {
            Ok(content) => content,
            Err(err) => {
                log_debug!("No .gitmodules for {} at {}: {}", coordinate, branch, err);
                return None;
            }
        };

        let records = parse_gitmodules(&content);
        self.cache.set(&cache_key, &records, Validators::default());
        Some(records)
    }
}
