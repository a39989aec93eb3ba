//! Arguments and setup shared by all commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use nav_config::{CliSettings, Config};
use nav_repo::{ContentRepository, QueryUrlBuilder, RequestContext, SnapshotRepository, VariantId};
use nav_tree::{FileTreeCache, NavSettings, Navigator};

use crate::error::CliError;

/// Options accepted by every command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover navtree.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// YAML snapshot of the navigation content.
    #[arg(long, env = "NAV_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Server base URL used for relative link bases.
    #[arg(long)]
    base_url: Option<String>,

    /// Only link nodes down to this absolute level.
    #[arg(long)]
    max_depth: Option<u32>,

    /// Disable the persistent tree cache.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl CommonArgs {
    /// Load the configuration with command line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            snapshot: self.snapshot.clone(),
            base_url: self.base_url.clone(),
            cache_enabled: self.no_cache.then_some(false),
            max_depth: self.max_depth,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Navigation settings described by `config`.
pub(crate) fn nav_settings(config: &Config) -> NavSettings {
    NavSettings {
        navtree_type: config.content_types.navtree,
        navon_type: config.content_types.navon,
        info_variant: VariantId(config.variants.info),
        theme_param: config.request.theme_param.clone(),
        variable_selector_param: config.request.variable_selector_param.clone(),
        image_selector_param: config.request.image_selector_param.clone(),
        session_param: config.request.session_param.clone(),
        edit_related_command: config.request.edit_related_command.clone(),
        max_depth: config.tree.max_depth,
    }
}

/// Open the configured snapshot.
pub(crate) fn open_snapshot(config: &Config) -> Result<SnapshotRepository, CliError> {
    tracing::info!(path = %config.repository_resolved.snapshot.display(), "Loading snapshot");
    let repo = SnapshotRepository::from_path(&config.repository_resolved.snapshot)?
        .with_info_variant(VariantId(config.variants.info));
    tracing::info!(nodes = repo.len(), "Snapshot loaded");
    Ok(repo)
}

/// Build a navigator over the configured snapshot.
pub(crate) fn navigator(config: &Config) -> Result<Navigator, CliError> {
    let repo: Arc<dyn ContentRepository> = Arc::new(open_snapshot(config)?);
    let urls = Arc::new(QueryUrlBuilder::new(config.links.base_url.clone()));
    let navigator = Navigator::new(repo, urls, nav_settings(config));

    let cache = &config.cache_resolved;
    Ok(match (&cache.dir, cache.enabled) {
        (Some(dir), true) => navigator.with_cache(Box::new(FileTreeCache::new(dir.clone()))),
        _ => navigator,
    })
}

/// Parse a `name=value` request parameter.
pub(crate) fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing parameter name in `{raw}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Build a request from parsed parameters and an optional session id.
pub(crate) fn request_context(params: &[(String, String)], session: Option<&str>) -> RequestContext {
    let request = RequestContext::from_pairs(params.iter().cloned());
    match session {
        Some(session) => request.with_session_id(session),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("sys_context=1").unwrap(),
            ("sys_context".to_owned(), "1".to_owned())
        );
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_owned(), "a=b".to_owned())
        );
    }

    #[test]
    fn test_parse_param_rejects_missing_separator() {
        assert!(parse_param("sys_context").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn test_request_context_carries_session() {
        let params = vec![("sys_siteid".to_owned(), "5".to_owned())];

        let request = request_context(&params, Some("abc"));

        assert_eq!(request.param("sys_siteid"), Some("5"));
        assert_eq!(request.session_id(), Some("abc"));
    }

    #[test]
    fn test_nav_settings_follow_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nav.toml");
        std::fs::write(
            &path,
            "[content_types]\nnavtree = 400\nnavon = 401\n\n[request]\ntheme_param = \"t\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        let settings = nav_settings(&config);

        assert_eq!(settings.navtree_type, 400);
        assert_eq!(settings.navon_type, 401);
        assert_eq!(settings.theme_param, "t");
        assert_eq!(settings.session_param, "pssessionid");
    }
}
