use anyhow::{Context, Result};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Turn command-line path arguments into absolute picked path strings.
///
/// Without `recursive` every argument is one entry. With it, a directory
/// argument is replaced by the files beneath it, in a stable order. Relative
/// arguments are joined to the working directory without resolving symlinks,
/// so the history stays usable from anywhere.
pub fn collect_paths(args: &[PathBuf], recursive: bool) -> Result<Vec<String>> {
    let mut picked = Vec::new();

    for arg in args {
        let arg = &std::path::absolute(arg)
            .with_context(|| format!("Failed to resolve {}", arg.display()))?;
        if recursive && arg.is_dir() {
            let mut files = Vec::new();
            for entry in WalkDir::new(arg).follow_links(false).min_depth(1).sort_by_file_name() {
                let entry = entry.with_context(|| format!("Failed to walk {}", arg.display()))?;
                if !entry.file_type().is_dir() {
                    files.push(path_string(entry.into_path())?);
                }
            }
            tracing::debug!(dir = %arg.display(), files = files.len(), "expanded directory");
            picked.extend(files);
        } else {
            picked.push(path_string(arg.clone())?);
        }
    }

    Ok(picked)
}

fn path_string(path: PathBuf) -> Result<String> {
    path.into_os_string()
        .into_string()
        .map_err(|path| anyhow::anyhow!("Path is not valid UTF-8: {}", PathBuf::from(path).display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_arguments_made_absolute_in_order() {
        let paths = collect_paths(&[PathBuf::from("b.txt"), PathBuf::from("a.txt")], false).unwrap();
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            paths,
            vec![
                cwd.join("b.txt").to_str().unwrap(),
                cwd.join("a.txt").to_str().unwrap()
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_resolved() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("target.txt"), "").unwrap();
        let link = temp_dir.path().join("link.txt");
        std::os::unix::fs::symlink(temp_dir.path().join("target.txt"), &link).unwrap();

        let paths = collect_paths(&[link.clone()], false).unwrap();
        assert_eq!(paths, vec![link.to_str().unwrap()]);
    }

    #[test]
    fn test_recursive_expands_directories() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        fs::write(temp_dir.path().join("b.txt"), "").unwrap();
        fs::write(temp_dir.path().join("sub").join("a.txt"), "").unwrap();

        let paths = collect_paths(&[temp_dir.path().to_path_buf()], true).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("b.txt"));
        assert!(paths[1].ends_with("a.txt"));

        let paths = collect_paths(&[temp_dir.path().to_path_buf()], false).unwrap();
        assert_eq!(paths.len(), 1);
    }
}
