// src/utils/paths.rs
//! Project path discovery and validation
//!
//! strut commands expect to run from the root of a web project, identified
//! by the presence of a `package.json` manifest.

use crate::utils::errors::{Result, StrutError};
use std::path::{Path, PathBuf};

/// Name of the project manifest that marks a project root
pub const PROJECT_MANIFEST: &str = "package.json";

/// Path to the project manifest under the given root
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(PROJECT_MANIFEST)
}

/// Validate that `root` looks like a project root
///
/// Mirrors the up-front check the CLI performs before dispatching any
/// action: commands only work when executed where the project manifest
/// lives.
pub fn ensure_project_root(root: &Path) -> Result<()> {
    if manifest_path(root).is_file() {
        Ok(())
    } else {
        Err(StrutError::Configuration(format!(
            "no {} found in {}. Run strut from the root of your project.",
            PROJECT_MANIFEST,
            root.display()
        )))
    }
}

/// Resolve a request path against the public directory, rejecting any
/// component that would escape it
pub fn resolve_public(public_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let mut resolved = public_dir.to_path_buf();
    for component in Path::new(relative).components() {
        match component {
            std::path::Component::Normal(part) => resolved.push(part),
            // Any parent/root/prefix component is a traversal attempt
            _ => return None,
        }
    }

    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_project_root_accepts_manifest() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PROJECT_MANIFEST), "{}").unwrap();
        assert!(ensure_project_root(dir.path()).is_ok());
    }

    #[test]
    fn test_ensure_project_root_rejects_bare_dir() {
        let dir = TempDir::new().unwrap();
        let err = ensure_project_root(dir.path()).unwrap_err();
        assert!(matches!(err, StrutError::Configuration(_)));
    }

    #[test]
    fn test_resolve_public_plain_file() {
        let resolved = resolve_public(Path::new("/srv/public"), "/main.css").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/public/main.css"));
    }

    #[test]
    fn test_resolve_public_nested_file() {
        let resolved = resolve_public(Path::new("/srv/public"), "/img/logo.svg").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/public/img/logo.svg"));
    }

    #[test]
    fn test_resolve_public_rejects_traversal() {
        assert!(resolve_public(Path::new("/srv/public"), "/../etc/passwd").is_none());
        assert!(resolve_public(Path::new("/srv/public"), "/img/../../secret").is_none());
    }

    #[test]
    fn test_resolve_public_rejects_root() {
        assert!(resolve_public(Path::new("/srv/public"), "/").is_none());
    }
}
