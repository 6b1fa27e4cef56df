use crate::config::Config;
use clap::Args;

#[derive(Args, Clone, Default, Debug)]
pub struct CommonParams {
    /// Emit the structure as JSON instead of a rendered tree
    #[arg(long, help = "Emit the structure as JSON instead of a rendered tree")]
    pub json: bool,

    /// Skip submodule resolution
    #[arg(long = "no-submodules", help = "Skip submodule resolution")]
    pub no_submodules: bool,

    /// Bypass cached data and fetch fresh
    #[arg(long, help = "Bypass cached data and fetch fresh")]
    pub refresh: bool,

    /// Limit how many levels of the tree are rendered
    #[arg(short, long, help = "Limit how many levels of the tree are rendered")]
    pub depth: Option<usize>,

    /// Override the per-request timeout in seconds
    #[arg(long, help = "Override the per-request timeout in seconds")]
    pub timeout: Option<u64>,

    /// Override the submodule nesting limit
    #[arg(long, help = "Override the submodule nesting limit")]
    pub max_depth: Option<usize>,
}

impl CommonParams {
    /// Applies the per-invocation overrides to a loaded configuration.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_submodule_depth = max_depth;
        }
        if self.no_submodules {
            config.resolve_submodules = false;
        }
    }
}
