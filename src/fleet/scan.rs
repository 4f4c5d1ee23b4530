//! Repository discovery.

use std::path::{Path, PathBuf};

/// Discover git checkouts under `root`, sorted by path.
///
/// A directory containing a `.git` entry is a checkout; its children are
/// not scanned. Hidden directories are skipped. Depth is limited so a
/// misconfigured root doesn't walk the world.
pub fn discover_repos(root: &Path) -> Vec<PathBuf> {
    let mut repos = Vec::new();
    discover_recursive(root, 0, 3, &mut repos);
    repos.sort();
    repos
}

fn discover_recursive(dir: &Path, depth: usize, max_depth: usize, repos: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    if dir.join(".git").exists() {
        repos.push(dir.to_path_buf());
        return;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && name.starts_with('.')
            {
                continue;
            }
            discover_recursive(&path, depth + 1, max_depth, repos);
        }
    }
}
