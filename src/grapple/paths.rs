//! # Paths and Project Keys
//!
//! Marks are stored under a **project key**: the normalized working directory,
//! or `<working directory>-<branch>` when `mark_branch` is enabled. Filenames
//! inside a project are stored relative to the project root whenever they live
//! under it, absolute otherwise.
//!
//! All normalization here is lexical. Paths are never canonicalized against the
//! filesystem, so a mark for a file that does not exist yet is still stable.
//! Separators are always `/`, on every platform, so the same cache file reads
//! identically everywhere.

use crate::model::GlobalSettings;
use directories::BaseDirs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Resolves project keys and normalizes filenames for one working directory.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    cwd: PathBuf,
    home: Option<PathBuf>,
}

impl ProjectContext {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: BaseDirs::new().map(|bd| bd.home_dir().to_path_buf()),
        }
    }

    /// Overrides the home directory used for `~` expansion.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The normalized working directory.
    pub fn project_key(&self) -> String {
        clean(&to_slashes(&self.cwd.to_string_lossy()))
    }

    /// `<project key>-<branch>` for the repository at the working directory,
    /// or the plain project key when there is no repository or git fails.
    pub fn branch_key(&self) -> String {
        let project = self.project_key();
        let branch = Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .current_dir(&self.cwd)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        match branch {
            Some(branch) => format!("{}-{}", project, branch),
            None => {
                debug!(cwd = %project, "no branch found, falling back to project key");
                project
            }
        }
    }

    /// The key marks are stored under for the given settings.
    pub fn mark_key(&self, settings: &GlobalSettings) -> String {
        if settings.mark_branch {
            self.branch_key()
        } else {
            self.project_key()
        }
    }

    /// Normalizes a filename for storage and lookup.
    ///
    /// Idempotent: `normalize_path(normalize_path(p)) == normalize_path(p)`.
    /// A result whose first segment is `~` would be read back as the home
    /// directory, so such files stay absolute under the project root.
    pub fn normalize_path(&self, path: &str) -> String {
        let cleaned = clean(&self.expand_home(&to_slashes(path)));
        let root = self.project_key();
        let relative = strip_root(&cleaned, &root).unwrap_or(cleaned);
        if relative == "~" || relative.starts_with("~/") {
            clean(&format!("{}/{}", root, relative))
        } else {
            relative
        }
    }

    /// Expands and cleans a project key read from a config file.
    pub fn expand_key(&self, key: &str) -> String {
        clean(&self.expand_home(&to_slashes(key)))
    }

    /// Resolves a stored filename to a path that can be opened.
    pub fn resolve_path(&self, filename: &str) -> PathBuf {
        let path = Path::new(filename);
        if is_absolute(filename) {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    fn expand_home(&self, path: &str) -> String {
        let Some(home) = &self.home else {
            return path.to_string();
        };
        let home = to_slashes(&home.to_string_lossy());
        if path == "~" {
            home
        } else if let Some(rest) = path.strip_prefix("~/") {
            format!("{}/{}", home.trim_end_matches('/'), rest)
        } else {
            path.to_string()
        }
    }
}

fn to_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

/// Splits off an absolute prefix: `/` or a drive such as `C:/`.
fn split_prefix(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    if path.starts_with('/') {
        ("/", &path[1..])
    } else if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && bytes[2] == b'/'
    {
        (&path[..3], &path[3..])
    } else {
        ("", path)
    }
}

fn is_absolute(path: &str) -> bool {
    !split_prefix(&to_slashes(path)).0.is_empty()
}

/// Lexically removes `.` segments, empty segments and resolvable `..` segments.
fn clean(path: &str) -> String {
    let (prefix, rest) = split_prefix(path);
    let mut parts: Vec<&str> = Vec::new();

    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `..` above an absolute root stays at the root
                _ if !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (prefix.is_empty(), joined.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => joined,
        (false, _) => format!("{}{}", prefix, joined),
    }
}

fn strip_root(path: &str, root: &str) -> Option<String> {
    if path == root {
        return Some(".".to_string());
    }
    let rest = if root.ends_with('/') {
        path.strip_prefix(root)
    } else {
        path.strip_prefix(root).and_then(|r| r.strip_prefix('/'))
    }?;
    if rest.is_empty() {
        Some(".".to_string())
    } else {
        Some(rest.to_string())
    }
}
