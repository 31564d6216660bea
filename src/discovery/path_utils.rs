use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::core::error::{MarkdashError, Result};

/// Whether `path` has one of `extensions` (compared case-insensitively).
///
/// An empty string in the set matches files without an extension.
fn has_allowed_extension(path: &Path, extensions: Option<&HashSet<String>>) -> bool {
    let Some(extensions) = extensions else {
        return true;
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => extensions.contains(""),
    }
}

/// Expand input paths to the mark files they contain.
///
/// Files are kept when their extension is allowed; directories are walked
/// only when `recursive` is set. The result is sorted and deduplicated.
pub fn expand_paths(
    input_paths: Vec<&Path>,
    recursive: bool,
    file_types: Option<&HashSet<String>>,
) -> Result<Vec<PathBuf>> {
    let mut result_paths = Vec::new();

    for path in input_paths {
        if path.is_file() {
            if has_allowed_extension(path, file_types) {
                result_paths.push(path.to_path_buf());
            }
        } else if path.is_dir() && recursive {
            let mut builder = ignore::WalkBuilder::new(path);
            // Include hidden and gitignored files
            builder.standard_filters(false);

            for entry in builder.build() {
                let entry = entry?;
                let entry_path = entry.path();

                if entry_path.is_file() && has_allowed_extension(entry_path, file_types) {
                    result_paths.push(entry_path.to_path_buf());
                }
            }
        } else if path.is_dir() && !recursive {
            return Err(MarkdashError::InvalidArgument(format!(
                "'{}' is a directory. Use --recursive to process directories.",
                path.display()
            )));
        }
    }

    result_paths.sort();
    result_paths.dedup();
    Ok(result_paths)
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::fs;
    use tempfile::TempDir;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn csv_only() -> HashSet<String> {
        HashSet::from(["csv".to_string()])
    }

    fn create_test_structure() -> std::result::Result<TempDir, Box<dyn std::error::Error>> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        fs::create_dir_all(base.join("2019/S1"))?;
        fs::create_dir_all(base.join("2020"))?;

        fs::write(base.join("COMP1000_2021.csv"), "Student ID,Final Mark\n")?;
        fs::write(base.join("UPPER.CSV"), "Student ID,Final Mark\n")?;
        fs::write(base.join("notes.txt"), "not a mark file")?;
        fs::write(base.join("marks.xlsx"), "binary")?;
        fs::write(base.join("2019/S1/COMP1000_2019.csv"), "Student ID,Final Mark\n")?;
        fs::write(base.join("2020/COMP1000_2020.csv"), "Student ID,Final Mark\n")?;

        Ok(temp_dir)
    }

    fn file_names(paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_expand_paths__single_file() -> TestResult {
        let temp_dir = create_test_structure()?;
        let path = temp_dir.path().join("COMP1000_2021.csv");

        let result = expand_paths(vec![&path], false, Some(&csv_only()))?;

        assert_eq!(result, vec![path]);
        Ok(())
    }

    #[test]
    fn test_expand_paths__file_with_other_extension_is_dropped() -> TestResult {
        let temp_dir = create_test_structure()?;
        let path = temp_dir.path().join("notes.txt");

        let result = expand_paths(vec![&path], false, Some(&csv_only()))?;

        assert!(result.is_empty());
        Ok(())
    }

    #[test]
    fn test_expand_paths__directory_without_recursive_fails() -> TestResult {
        let temp_dir = create_test_structure()?;

        let result = expand_paths(vec![temp_dir.path()], false, None);

        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("is a directory. Use --recursive")
        );
        Ok(())
    }

    #[test]
    fn test_expand_paths__recursive_with_csv_filter() -> TestResult {
        let temp_dir = create_test_structure()?;

        let result = expand_paths(vec![temp_dir.path()], true, Some(&csv_only()))?;
        let names = file_names(&result);

        assert_eq!(names.len(), 4);
        assert!(names.contains(&"COMP1000_2019.csv".to_string()));
        assert!(names.contains(&"COMP1000_2020.csv".to_string()));
        assert!(names.contains(&"COMP1000_2021.csv".to_string()));
        assert!(names.contains(&"UPPER.CSV".to_string()));
        assert!(!names.contains(&"marks.xlsx".to_string()));
        Ok(())
    }

    #[test]
    fn test_expand_paths__gitignored_files_are_kept() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();
        fs::create_dir_all(base.join(".git"))?;
        fs::create_dir_all(base.join("marks"))?;
        fs::write(base.join(".gitignore"), "*.csv\n")?;
        fs::write(base.join("marks/.ignore"), "2020.csv\n")?;
        fs::write(base.join("marks/2019.csv"), "Student ID,Final Mark\n")?;
        fs::write(base.join("marks/2020.csv"), "Student ID,Final Mark\n")?;

        let marks = base.join("marks");
        let result = expand_paths(vec![marks.as_path()], true, Some(&csv_only()))?;

        assert_eq!(file_names(&result), vec!["2019.csv", "2020.csv"]);
        Ok(())
    }

    #[test]
    fn test_expand_paths__hidden_files_are_kept() -> TestResult {
        let temp_dir = tempfile::tempdir()?;
        fs::create_dir_all(temp_dir.path().join(".archive"))?;
        fs::write(temp_dir.path().join(".archive/2018.csv"), "")?;

        let result = expand_paths(vec![temp_dir.path()], true, Some(&csv_only()))?;

        assert_eq!(file_names(&result), vec!["2018.csv"]);
        Ok(())
    }

    #[test]
    fn test_expand_paths__result_is_sorted_and_deduplicated() -> TestResult {
        let temp_dir = create_test_structure()?;
        let file = temp_dir.path().join("COMP1000_2021.csv");

        let result = expand_paths(
            vec![file.as_path(), temp_dir.path(), file.as_path()],
            true,
            Some(&csv_only()),
        )?;

        let mut sorted = result.clone();
        sorted.sort();
        assert_eq!(result, sorted);
        assert_eq!(result.iter().filter(|p| **p == file).count(), 1);
        Ok(())
    }

    #[test]
    fn test_expand_paths__nonexistent_file() -> TestResult {
        let result = expand_paths(
            vec![Path::new("/definitely/nonexistent/path/marks.csv")],
            false,
            None,
        )?;
        assert!(result.is_empty());
        Ok(())
    }

    #[test]
    fn test_expand_paths__empty_input() -> TestResult {
        let result = expand_paths(vec![], false, None)?;
        assert!(result.is_empty());
        Ok(())
    }
}
