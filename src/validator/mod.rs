pub mod api_matcher;
pub mod code_analyzer;
pub mod parity;
pub mod references;
pub mod scoring;
pub mod spec_matcher;
pub mod test_analyzer;

pub use api_matcher::ApiMatcher;
pub use code_analyzer::CodeAnalyzer;
pub use parity::ParityChecker;
pub use references::ReferenceValidator;
pub use scoring::{ConfidenceScorer, WeightedScorer};
pub use spec_matcher::SpecMatcher;
pub use test_analyzer::TestAnalyzer;

use crate::error::EngineResult;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Build output and hidden directories are never scanned
fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name == "target" || name.starts_with('.'))
            .unwrap_or(false)
}

/// Files under `root` with the given extension, in sorted order
pub(crate) fn walk_files<'a>(
    root: &Path,
    extension: &'a str,
) -> impl Iterator<Item = walkdir::Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
        .filter_map(move |entry| match entry {
            Ok(e) => {
                let wanted = e.file_type().is_file()
                    && e.path().extension() == Some(OsStr::new(extension));
                wanted.then(|| Ok(e.into_path()))
            }
            Err(err) => Some(Err(err)),
        })
}

/// `*.md` files directly inside `dir`, sorted
pub(crate) fn top_level_docs(dir: &Path) -> EngineResult<Vec<PathBuf>> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let pattern = Path::new(&escaped).join("*.md");

    let mut docs: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable document");
                None
            }
        })
        .collect();
    docs.sort();
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_walk_files_skips_target_and_hidden() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("target/debug")).unwrap();
        std::fs::create_dir_all(root.join(".git")).unwrap();
        std::fs::write(root.join("src/b.rs"), "").unwrap();
        std::fs::write(root.join("src/a.rs"), "").unwrap();
        std::fs::write(root.join("src/notes.md"), "").unwrap();
        std::fs::write(root.join("target/debug/build.rs"), "").unwrap();
        std::fs::write(root.join(".git/hook.rs"), "").unwrap();

        let files: Vec<_> = walk_files(root, "rs")
            .map(|f| f.unwrap().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(files, vec![PathBuf::from("src/a.rs"), PathBuf::from("src/b.rs")]);
    }

    #[test]
    fn test_top_level_docs_sorted_and_shallow() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir_all(root.join("nested")).unwrap();
        std::fs::write(root.join("b.md"), "").unwrap();
        std::fs::write(root.join("a.md"), "").unwrap();
        std::fs::write(root.join("nested/c.md"), "").unwrap();

        let docs = top_level_docs(root).unwrap();
        assert_eq!(docs, vec![root.join("a.md"), root.join("b.md")]);
    }
}
