//! Config file discovery.
//!
//! Each [`SearchPath`] resolves to one concrete directory. The directory list
//! is **priority-descending**: [`resolve_config_file`] walks it in order and
//! the first directory containing the requested file wins. This is the
//! opposite of a merge-all search; only one base file is ever selected, and
//! layering happens later through the hostmap and the explicit override.
//!
//! Absolute file names bypass the search entirely. Relative names containing
//! `..` are never resolved, so a hit always lies inside one of the searched
//! directories.

use std::path::{Component, Path, PathBuf};

use crate::error::HostfigError;
use crate::types::SearchPath;

/// A config file located on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Directory the file was found in (for absolute inputs, its parent).
    pub base_dir: PathBuf,
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform(app_name) => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Expand search paths into a flat directory list, dropping any that cannot
/// be resolved. Order is preserved.
pub fn expand_search_paths(search_paths: &[SearchPath]) -> Vec<PathBuf> {
    search_paths.iter().filter_map(resolve_search_path).collect()
}

/// Locate `name` in `search_dirs`.
///
/// - Empty `name` fails with [`HostfigError::ConfigFileRequired`] before any
///   filesystem access.
/// - An absolute `name` is returned unchanged; its parent is the base dir.
/// - Otherwise the first directory holding `name` wins. No hit fails with
///   [`HostfigError::FileNotFound`] listing every directory searched.
pub fn resolve_config_file(
    name: &str,
    search_dirs: &[PathBuf],
) -> Result<ResolvedFile, HostfigError> {
    if name.is_empty() {
        return Err(HostfigError::ConfigFileRequired);
    }

    let candidate = Path::new(name);
    if candidate.is_absolute() {
        let base_dir = candidate
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| candidate.to_path_buf());
        return Ok(ResolvedFile {
            path: candidate.to_path_buf(),
            base_dir,
        });
    }

    let escapes = candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    if !escapes {
        for dir in search_dirs {
            let path = dir.join(candidate);
            if path.is_file() {
                let base_dir = absolutize(dir)?;
                let path = base_dir.join(candidate);
                tracing::debug!(resolved = %path.display(), "found config file");
                return Ok(ResolvedFile { path, base_dir });
            }
        }
    }

    Err(HostfigError::FileNotFound {
        name: name.to_string(),
        searched: search_dirs.to_vec(),
    })
}

/// Join `file` onto `dir`, making `dir` absolute against the current
/// working directory first.
pub fn abs_path_in(file: &str, dir: impl AsRef<Path>) -> Result<PathBuf, HostfigError> {
    Ok(absolutize(dir.as_ref())?.join(file))
}

fn absolutize(dir: &Path) -> Result<PathBuf, HostfigError> {
    std::path::absolute(dir).map_err(|e| HostfigError::io(dir, e))
}

/// Read each layer file in order, pairing it with its path.
pub fn read_layers(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, HostfigError> {
    paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|content| (path.clone(), content))
                .map_err(|e| HostfigError::io(path, e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_explicit_path() {
        let p = PathBuf::from("/tmp/myapp");
        let resolved = resolve_search_path(&SearchPath::Path(p.clone()));
        assert_eq!(resolved, Some(p));
    }

    #[test]
    fn expand_preserves_order() {
        let dirs = expand_search_paths(&[
            SearchPath::Path("/b".into()),
            SearchPath::Path("/a".into()),
        ]);
        assert_eq!(dirs, vec![PathBuf::from("/b"), PathBuf::from("/a")]);
    }

    #[test]
    fn empty_name_is_rejected_without_io() {
        let result = resolve_config_file("", &[PathBuf::from("/does/not/exist")]);
        assert!(matches!(result, Err(HostfigError::ConfigFileRequired)));
    }

    #[test]
    fn absolute_path_passthrough() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("config.yaml");
        // The file does not need to exist.
        let resolved = resolve_config_file(file.to_str().unwrap(), &[PathBuf::from("ignore")])
            .unwrap();
        assert_eq!(resolved.path, file);
        assert_eq!(resolved.base_dir, dir.path());
    }

    #[test]
    fn first_directory_with_file_wins() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        fs::write(d2.path().join("app.yaml"), "a: 1\n").unwrap();

        let dirs = vec![d1.path().to_path_buf(), d2.path().to_path_buf()];
        let resolved = resolve_config_file("app.yaml", &dirs).unwrap();
        assert_eq!(resolved.base_dir, d2.path());
        assert_eq!(resolved.path, d2.path().join("app.yaml"));
    }

    #[test]
    fn earlier_directory_shadows_later() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        fs::write(d1.path().join("app.yaml"), "a: 1\n").unwrap();
        fs::write(d2.path().join("app.yaml"), "a: 2\n").unwrap();

        let dirs = vec![d1.path().to_path_buf(), d2.path().to_path_buf()];
        let resolved = resolve_config_file("app.yaml", &dirs).unwrap();
        assert_eq!(resolved.base_dir, d1.path());
    }

    #[test]
    fn nested_relative_name_resolves() {
        let d = TempDir::new().unwrap();
        fs::create_dir(d.path().join("override")).unwrap();
        fs::write(d.path().join("override").join("host.yaml"), "a: 1\n").unwrap();

        let resolved =
            resolve_config_file("override/host.yaml", &[d.path().to_path_buf()]).unwrap();
        assert_eq!(resolved.base_dir, d.path());
        assert!(resolved.path.ends_with("override/host.yaml"));
    }

    #[test]
    fn missing_file_lists_dirs() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        let dirs = vec![d1.path().to_path_buf(), d2.path().to_path_buf()];

        match resolve_config_file("nope.yaml", &dirs) {
            Err(HostfigError::FileNotFound { name, searched }) => {
                assert_eq!(name, "nope.yaml");
                assert_eq!(searched, dirs);
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn parent_components_never_escape() {
        let root = TempDir::new().unwrap();
        let inner = root.path().join("inner");
        fs::create_dir(&inner).unwrap();
        fs::write(root.path().join("outside.yaml"), "a: 1\n").unwrap();

        let result = resolve_config_file("../outside.yaml", &[inner]);
        assert!(matches!(result, Err(HostfigError::FileNotFound { .. })));
    }

    #[test]
    fn directory_with_same_name_is_skipped() {
        let d1 = TempDir::new().unwrap();
        let d2 = TempDir::new().unwrap();
        fs::create_dir(d1.path().join("app.yaml")).unwrap();
        fs::write(d2.path().join("app.yaml"), "a: 1\n").unwrap();

        let dirs = vec![d1.path().to_path_buf(), d2.path().to_path_buf()];
        let resolved = resolve_config_file("app.yaml", &dirs).unwrap();
        assert_eq!(resolved.base_dir, d2.path());
    }

    #[test]
    fn abs_path_in_relative_dir() {
        let abs = abs_path_in("foo.bar", ".").unwrap();
        assert!(abs.is_absolute());
        assert_eq!(abs.file_name().unwrap(), "foo.bar");
    }

    #[test]
    fn read_layers_keeps_order() {
        let d = TempDir::new().unwrap();
        let a = d.path().join("a.yaml");
        let b = d.path().join("b.yaml");
        fs::write(&a, "a: 1\n").unwrap();
        fs::write(&b, "b: 2\n").unwrap();

        let layers = read_layers(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(layers[0], (a, "a: 1\n".to_string()));
        assert_eq!(layers[1], (b, "b: 2\n".to_string()));
    }

    #[test]
    fn read_layers_missing_file_is_io_error() {
        let d = TempDir::new().unwrap();
        let result = read_layers(&[d.path().join("missing.yaml")]);
        assert!(matches!(result, Err(HostfigError::IoError { .. })));
    }
}
