use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

pub const JAR_SUFFIXES: &[&str] = &[".jar"];
pub const JAVA_SUFFIXES: &[&str] = &[".java"];

/// Recursively lists regular files under `root` whose name ends with one of
/// `suffixes` (compared case-insensitively). Unreadable subdirectories are
/// reported on stderr and skipped; the walk itself never fails. The result
/// is sorted so downstream scheduling and output are deterministic.
pub fn scan_files(root: &Path, suffixes: &[&str]) -> Vec<PathBuf> {
    let (tx, rx) = mpsc::channel();

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build_parallel();

    walker.run(|| {
        let tx = tx.clone();
        let suffixes: Vec<String> = suffixes.iter().map(|s| s.to_ascii_lowercase()).collect();
        Box::new(move |entry| {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && has_suffix(entry.path(), &suffixes) {
                        let _ = tx.send(entry.into_path());
                    }
                }
                Err(err) => eprintln!("Error walking directory tree: {err}"),
            }
            ignore::WalkState::Continue
        })
    });

    drop(tx);
    let mut files: Vec<PathBuf> = rx.iter().collect();
    files.sort();
    files
}

fn has_suffix(path: &Path, suffixes: &[String]) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let lower = name.to_ascii_lowercase();
    suffixes.iter().any(|s| lower.ends_with(s.as_str()))
}
