use crate::api::GrappleApi;
use crate::config::{ConfigLayer, ConfigStore};
use crate::error::{GrappleError, Result};
use crate::paths::ProjectContext;
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the directory holding the user layer.
pub const CONFIG_DIR_ENV: &str = "GRAPPLE_CONFIG_DIR";
/// Overrides the directory holding the cache layer.
pub const DATA_DIR_ENV: &str = "GRAPPLE_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrappleDirs {
    pub config: PathBuf,
    pub data: PathBuf,
}

/// Platform directories, each overridable through the environment.
pub fn resolve_dirs() -> Result<GrappleDirs> {
    let from_env = |name: &str| {
        env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    };

    let (config, data) = match (from_env(CONFIG_DIR_ENV), from_env(DATA_DIR_ENV)) {
        (Some(config), Some(data)) => (config, data),
        (config, data) => {
            let dirs = ProjectDirs::from("", "", "grapple").ok_or_else(|| {
                GrappleError::Api("Could not determine config directory".to_string())
            })?;
            (
                config.unwrap_or_else(|| dirs.config_dir().to_path_buf()),
                data.unwrap_or_else(|| dirs.data_dir().to_path_buf()),
            )
        }
    };
    Ok(GrappleDirs { config, data })
}

/// Loads the configuration for `cwd` and wires up the API.
pub fn initialize(cwd: &Path, overrides: ConfigLayer) -> Result<GrappleApi<FileStore>> {
    let dirs = resolve_dirs()?;
    debug!(config = %dirs.config.display(), data = %dirs.data.display(), "resolved directories");

    let store = FileStore::in_dirs(&dirs.config, &dirs.data);
    let context = ProjectContext::new(absolute(cwd)?);
    Ok(GrappleApi::new(ConfigStore::load(store, context, overrides)))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(env::current_dir()?.join(path))
    }
}
