use super::{Layer, LayerStore};
use crate::error::{GrappleError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LAYER_FILENAME: &str = "grapple.json";

pub struct FileStore {
    user_path: PathBuf,
    cache_path: PathBuf,
}

impl FileStore {
    pub fn new(user_path: PathBuf, cache_path: PathBuf) -> Self {
        Self {
            user_path,
            cache_path,
        }
    }

    /// Store with `grapple.json` inside each of the two directories.
    pub fn in_dirs(config_dir: &Path, data_dir: &Path) -> Self {
        Self::new(
            config_dir.join(LAYER_FILENAME),
            data_dir.join(LAYER_FILENAME),
        )
    }

    pub fn path(&self, layer: Layer) -> &Path {
        match layer {
            Layer::User => &self.user_path,
            Layer::Cache => &self.cache_path,
        }
    }
}

impl LayerStore for FileStore {
    fn read(&self, layer: Layer) -> Result<Option<String>> {
        let path = self.path(layer);
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GrappleError::Io(e)),
        }
    }

    fn write_cache(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(GrappleError::Io)?;
            }
        }
        debug!(path = %self.cache_path.display(), "writing cache layer");
        fs::write(&self.cache_path, contents).map_err(GrappleError::Io)?;
        Ok(())
    }
}
