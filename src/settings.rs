// src/settings.rs
// =============================================================================
// Run configuration, built from the command line (see cli.rs).
//
// A Settings value is created once in main.rs, validated, and then passed
// by reference to the walker and the file processor. Nothing reads
// configuration from globals.
// =============================================================================

use crate::error::SettingsError;
use url::Url;

/// The CDN whose assets are downloaded when no --origin is given
pub const DEFAULT_ORIGIN: &str = "https://cdn.discordapp.com";

/// Directory (under the project root) that receives downloaded assets
pub const DEFAULT_ASSET_DIR: &str = "public";

/// Path fragments that are never touched: VCS metadata, dependency
/// caches, bytecode caches
pub const DEFAULT_EXCLUDES: [&str; 3] = [".git", "node_modules", "__pycache__"];

/// Files ending in this get `/<asset dir>/` in front of their local paths
pub const MARKDOWN_EXTENSION: &str = ".md";

pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct Settings {
    /// URL prefix that marks a qualifying URL
    pub origin: String,
    /// Name of the asset directory under the project root
    pub asset_dir: String,
    /// A file is skipped if its path contains any of these
    pub excludes: Vec<String>,
    /// How many downloads run at once within one file
    pub concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            excludes: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Settings {
    /// Builds validated settings. An empty `excludes` means "use the defaults".
    pub fn new(
        origin: String,
        asset_dir: String,
        excludes: Vec<String>,
        concurrency: usize,
    ) -> Result<Self, SettingsError> {
        validate_origin(&origin)?;

        if asset_dir.is_empty()
            || asset_dir == "."
            || asset_dir == ".."
            || asset_dir.contains(['/', '\\'])
        {
            return Err(SettingsError::AssetDir(asset_dir));
        }

        if concurrency == 0 {
            return Err(SettingsError::Concurrency);
        }

        let excludes = if excludes.is_empty() {
            Settings::default().excludes
        } else {
            excludes
        };

        Ok(Self {
            origin,
            asset_dir,
            excludes,
            concurrency,
        })
    }
}

// The origin is matched as a plain string prefix, but it still has to be a
// real https URL: file names are derived by stripping "https://".
fn validate_origin(origin: &str) -> Result<(), SettingsError> {
    let invalid = |reason: &str| SettingsError::Origin {
        origin: origin.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;

    if parsed.scheme() != "https" || !origin.starts_with("https://") {
        return Err(invalid("only https:// origins are supported"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("origin has no host"));
    }

    Ok(())
}
