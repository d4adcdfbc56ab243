/**
 * Project Configuration
 * Discovers and loads `yuan-project.json`, merging it into CLI-derived
 * compiler options with "explicit flag wins" semantics.
 */
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors that can occur while discovering or loading a project config.
#[derive(Debug, Clone)]
pub enum ProjectConfigError {
    Io(String),
    Json(String),
}

impl std::fmt::Display for ProjectConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectConfigError::Io(msg) => write!(f, "cannot read project config: {}", msg),
            ProjectConfigError::Json(msg) => write!(f, "project config JSON parse failed: {}", msg),
        }
    }
}

impl std::error::Error for ProjectConfigError {}

/// `compile` section of `yuan-project.json`. Every field is optional so
/// presence (not a zero value) signals "this field was set by the config".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectCompileConfig {
    #[serde(rename = "stdlib")]
    pub stdlib_path: Option<String>,
    #[serde(rename = "moduleCache")]
    pub module_cache_dir: Option<String>,
    #[serde(rename = "optLevel")]
    pub opt_level: Option<String>,
    #[serde(rename = "includePaths", default)]
    pub include_paths: Vec<String>,
    #[serde(rename = "packagePaths", default)]
    pub package_paths: Vec<String>,
    #[serde(rename = "libraryPaths", default)]
    pub library_paths: Vec<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

/// Deserialized `yuan-project.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub compile: ProjectCompileConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { version: 1, compile: ProjectCompileConfig::default() }
    }
}

impl ProjectConfig {
    /// Walks upward from `start` (a file or directory) looking for
    /// `yuan-project.json`, returning the first match. `start` defaults to
    /// the current directory when empty.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let base = if start.as_os_str().is_empty() {
            std::env::current_dir().ok()?
        } else {
            start.to_path_buf()
        };
        let base = if base.is_file() {
            base.parent().map(Path::to_path_buf).unwrap_or(base)
        } else {
            base
        };
        let mut current = base.canonicalize().unwrap_or(base);
        loop {
            let candidate = current.join("yuan-project.json");
            if candidate.exists() {
                return Some(candidate);
            }
            match current.parent() {
                Some(parent) if parent != current => current = parent.to_path_buf(),
                _ => return None,
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProjectConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ProjectConfigError::Io(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ProjectConfigError::Json(e.to_string()))
    }

    /// Discovers and loads in one step. Returns `Ok(None)` (not an error)
    /// when no `yuan-project.json` is found anywhere above `start`.
    pub fn discover_and_load(start: &Path) -> Result<Option<Self>, ProjectConfigError> {
        match Self::discover(start) {
            Some(path) => Self::load_from_file(&path).map(Some),
            None => Ok(None),
        }
    }

    /// Parses `optLevel` (`"O0"`..`"O3"`) into the numeric level `yuanc`
    /// expects; unrecognized or absent values fall back to `0`.
    pub fn opt_level_numeric(&self) -> u8 {
        match self.compile.opt_level.as_deref() {
            Some("O1") => 1,
            Some("O2") => 2,
            Some("O3") => 3,
            _ => 0,
        }
    }
}

/// A resolved set of compiler options, built by merging [`ProjectConfig`]
/// into values already supplied on the command line. Mirrors the fields
/// `yuanc` accepts as flags.
#[derive(Debug, Clone, Default)]
pub struct CompilerInvocation {
    pub stdlib_path: Option<String>,
    pub module_cache_dir: Option<String>,
    pub opt_level: Option<u8>,
    pub include_paths: Vec<String>,
    pub package_paths: Vec<String>,
    pub library_paths: Vec<String>,
    pub libraries: Vec<String>,
}

/// Folds `config` into `invocation`. When `keep_invocation_overrides` is
/// true (the default CLI behavior), a field already set on the invocation
/// (an explicit flag) wins over the config file; list-valued fields are
/// only filled from config when still empty.
pub fn apply_project_config(
    config: &ProjectConfig,
    invocation: &mut CompilerInvocation,
    keep_invocation_overrides: bool,
) {
    if let Some(stdlib) = &config.compile.stdlib_path {
        if !keep_invocation_overrides || invocation.stdlib_path.is_none() {
            invocation.stdlib_path = Some(stdlib.clone());
        }
    }
    if let Some(cache) = &config.compile.module_cache_dir {
        if !keep_invocation_overrides || invocation.module_cache_dir.is_none() {
            invocation.module_cache_dir = Some(cache.clone());
        }
    }
    if config.compile.opt_level.is_some() {
        if !keep_invocation_overrides || invocation.opt_level.is_none() {
            invocation.opt_level = Some(config.opt_level_numeric());
        }
    }
    if !keep_invocation_overrides || invocation.include_paths.is_empty() {
        invocation.include_paths = config.compile.include_paths.clone();
    }
    if !keep_invocation_overrides || invocation.package_paths.is_empty() {
        invocation.package_paths = config.compile.package_paths.clone();
    }
    if !keep_invocation_overrides || invocation.library_paths.is_empty() {
        invocation.library_paths = config.compile.library_paths.clone();
    }
    if !keep_invocation_overrides || invocation.libraries.is_empty() {
        invocation.libraries = config.compile.libraries.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discover_walks_up_to_ancestor() {
        let tmp = tempdir().expect("tempdir");
        let root = tmp.path();
        fs::write(root.join("yuan-project.json"), "{}").unwrap();
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = ProjectConfig::discover(&nested).expect("found config");
        assert_eq!(found, root.join("yuan-project.json"));
    }

    #[test]
    fn discover_returns_none_without_config() {
        let tmp = tempdir().expect("tempdir");
        assert!(ProjectConfig::discover(tmp.path()).is_none());
    }

    #[test]
    fn load_parses_compile_section() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("yuan-project.json");
        fs::write(
            &path,
            r#"{
                "version": 1,
                "compile": {
                    "stdlib": "/opt/yuan/std",
                    "optLevel": "O2",
                    "includePaths": ["include"]
                }
            }"#,
        )
        .unwrap();

        let config = ProjectConfig::load_from_file(&path).expect("parsed");
        assert_eq!(config.compile.stdlib_path.as_deref(), Some("/opt/yuan/std"));
        assert_eq!(config.opt_level_numeric(), 2);
        assert_eq!(config.compile.include_paths, vec!["include".to_string()]);
    }

    #[test]
    fn explicit_flag_wins_over_config() {
        let mut config = ProjectConfig::default();
        config.compile.stdlib_path = Some("/from/config".into());
        config.compile.opt_level = Some("O3".into());

        let mut invocation = CompilerInvocation {
            stdlib_path: Some("/from/cli".into()),
            ..Default::default()
        };
        apply_project_config(&config, &mut invocation, true);

        assert_eq!(invocation.stdlib_path.as_deref(), Some("/from/cli"));
        assert_eq!(invocation.opt_level, Some(3));
    }

    #[test]
    fn config_fills_unset_fields() {
        let mut config = ProjectConfig::default();
        config.compile.libraries = vec!["m".to_string()];

        let mut invocation = CompilerInvocation::default();
        apply_project_config(&config, &mut invocation, true);

        assert_eq!(invocation.libraries, vec!["m".to_string()]);
    }
}
