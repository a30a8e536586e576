use crate::codec::SUPPORTED_EXTENSIONS;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Checks if a directory entry is hidden (starts with '.').
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

/// Lists the photos directly inside `dir` whose suffix is one of [`SUPPORTED_EXTENSIONS`],
/// matched case-insensitively and sorted by file name. Subfolders and hidden files are skipped.
pub fn list_candidate_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|entry_result| match entry_result {
            Ok(entry) if entry.file_type().is_file() && is_candidate(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect()
}

fn is_candidate(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_supported_files_sorted() {
        let dir = TempDir::new().unwrap();
        for name in [
            "b.JPG",
            "a.jpeg",
            "c.arw",
            "notes.txt",
            ".hidden.jpg",
            "d.png",
        ] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("e.jpg"), b"x").unwrap();

        let files = list_candidate_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.jpeg", "b.JPG", "c.arw"]);
    }

    #[test]
    fn test_missing_folder_is_an_error() {
        assert!(list_candidate_files(Path::new("/definitely/not/here")).is_err());
    }
}
