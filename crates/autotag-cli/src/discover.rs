//! Markdown file discovery.

use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Check that `root` is an existing directory.
pub fn validate_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(CliError::InvalidRoot(root.display().to_string()))
    }
}

/// Whether a file name has a `.md` extension (any case).
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Recursively collect Markdown files under `root`, sorted by path.
///
/// Unreadable entries are logged and skipped.
pub fn gather_markdown_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && is_markdown(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                tracing::warn!("Error accessing entry: {}", e);
            }
        }
    }

    files.sort();
    files
}

/// Collect the documents for a run, failing when there are none.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>> {
    validate_root(root)?;
    let files = gather_markdown_files(root);
    if files.is_empty() {
        return Err(CliError::NoDocuments(root.display().to_string()));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("note.md")));
        assert!(is_markdown(Path::new("NOTE.MD")));
        assert!(!is_markdown(Path::new("note.markdown")));
        assert!(!is_markdown(Path::new("md")));
    }

    #[test]
    fn test_gather_recurses_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::write(dir.path().join("a.MD"), "").unwrap();
        fs::write(dir.path().join("sub/deeper/c.md"), "").unwrap();
        fs::write(dir.path().join("sub/ignore.txt"), "").unwrap();

        let files = gather_markdown_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();

        assert_eq!(
            names,
            vec![
                PathBuf::from("a.MD"),
                PathBuf::from("b.md"),
                PathBuf::from("sub/deeper/c.md"),
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        assert!(matches!(
            discover(Path::new("/definitely/not/here")),
            Err(CliError::InvalidRoot(_))
        ));
    }

    #[test]
    fn test_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), "").unwrap();
        assert!(matches!(discover(dir.path()), Err(CliError::NoDocuments(_))));
    }
}
