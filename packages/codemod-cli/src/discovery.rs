//! File discovery
//!
//! Expands command-line paths into the source files to transform.

use anyhow::Context;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::warn;

const SOURCE_PATTERNS: [&str; 2] = ["**/*.js", "**/*.ts"];

/// Files named by `inputs`, absolute, sorted and without duplicates.
///
/// An input may be a file, a directory (searched for `.js` and `.ts` files)
/// or a glob pattern. Anything under `node_modules` is ignored.
pub fn discover_files(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for input in inputs {
        let path = Path::new(input);
        if path.is_file() {
            files.insert(absolute(path)?);
        } else if path.is_dir() {
            for pattern in SOURCE_PATTERNS {
                collect_glob(&path.join(pattern).to_string_lossy(), &mut files)?;
            }
        } else {
            collect_glob(input, &mut files)?;
        }
    }
    Ok(files.into_iter().collect())
}

fn collect_glob(pattern: &str, files: &mut BTreeSet<PathBuf>) -> anyhow::Result<()> {
    let paths = glob::glob(pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?;
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() && !is_excluded(&path) {
                    files.insert(absolute(&path)?);
                }
            }
            Err(e) => warn!(error = %e, "unreadable path skipped"),
        }
    }
    Ok(())
}

fn is_excluded(path: &Path) -> bool {
    path.components().any(|c| c.as_os_str() == "node_modules")
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    path.canonicalize()
        .with_context(|| format!("failed to resolve {}", path.display()))
}
