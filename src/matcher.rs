use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::archive::{ArchiveError, ArchiveReader, read_text_file};

/// Entry-name suffixes treated as text in text-search mode. Entries with no
/// dot at all (manifests, license files) are also scanned.
pub const TEXT_EXTENSIONS: &[&str] = &[
    ".java",
    ".class",
    ".xml",
    ".properties",
    ".txt",
    ".md",
    ".yml",
    ".yaml",
    ".json",
    ".html",
    ".css",
    ".js",
    ".jsp",
    ".config",
    ".ini",
    ".conf",
    ".MF",
    ".sql",
];

/// Bytes of context kept on each side of a binary match.
const BINARY_CONTEXT: usize = 20;

/// Maximum printable runs shown by deep inspection.
const DEEP_LITERAL_LIMIT: usize = 20;

/// Minimum length of a printable run for deep inspection.
const DEEP_LITERAL_MIN_LEN: usize = 3;

/// The package-declaration grammar is fixed; user search text is always a
/// literal substring and never reaches a pattern engine.
static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"package\s+([a-zA-Z0-9_.]+);").expect("package regex"));

#[derive(Debug, Clone)]
pub enum MatchMode {
    /// Derive package names from `.class` entry paths and `.java` package
    /// declarations, deduplicated per archive.
    Packages,
    /// Line-oriented substring search over decoded text entries.
    Text {
        needle: String,
        case_sensitive: bool,
    },
    /// Literal byte-subsequence search over every entry, first occurrence
    /// per entry only.
    Binary { needle: String, deep: bool },
}

/// One match inside one source. `entry_name` is empty for plain-file sources
/// and package records; `line_number` is 1-based for text matches and 0 where
/// lines have no meaning (binary and package records).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub entry_name: String,
    pub line_number: u32,
    pub snippet: String,
}

/// Runs one archive through the given mode. Per-entry read failures are
/// skipped so one corrupt member never hides its siblings.
pub fn scan_archive(reader: &mut ArchiveReader, mode: &MatchMode) -> Vec<MatchRecord> {
    match mode {
        MatchMode::Packages => scan_packages(reader),
        MatchMode::Text {
            needle,
            case_sensitive,
        } => scan_text(reader, needle, *case_sensitive),
        MatchMode::Binary { needle, deep } => scan_binary(reader, needle, *deep),
    }
}

/// Text search over one plain file (the degenerate non-archive reader path).
pub fn scan_source_file(
    path: &Path,
    needle: &str,
    case_sensitive: bool,
) -> Result<Vec<MatchRecord>, ArchiveError> {
    let text = read_text_file(path)?;
    Ok(match_lines(&text, String::new(), needle, case_sensitive))
}

fn scan_packages(reader: &mut ArchiveReader) -> Vec<MatchRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for name in reader.entry_names() {
        if name.ends_with(".class") {
            // com/example/mypackage/MyClass.class -> com.example.mypackage.
            // A top-level class has no directory and yields no package.
            if let Some((dir, _)) = name.rsplit_once('/') {
                let package = dir.replace('/', ".");
                if seen.insert(package.clone()) {
                    records.push(package_record(package));
                }
            }
        } else if name.ends_with(".java") {
            let Ok(bytes) = reader.read_entry(&name) else {
                continue;
            };
            let text = String::from_utf8_lossy(&bytes);
            for cap in PACKAGE_RE.captures_iter(&text) {
                let package = cap[1].to_string();
                if seen.insert(package.clone()) {
                    records.push(package_record(package));
                }
            }
        }
    }

    records
}

fn package_record(package: String) -> MatchRecord {
    MatchRecord {
        entry_name: String::new(),
        line_number: 0,
        snippet: package,
    }
}

fn scan_text(reader: &mut ArchiveReader, needle: &str, case_sensitive: bool) -> Vec<MatchRecord> {
    let mut records = Vec::new();

    for name in reader.entry_names() {
        if !is_text_candidate(&name) {
            continue;
        }
        let Ok(bytes) = reader.read_entry(&name) else {
            continue;
        };
        let text = String::from_utf8_lossy(&bytes);
        records.extend(match_lines(&text, name, needle, case_sensitive));
    }

    records
}

fn is_text_candidate(name: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) || !name.contains('.')
}

fn match_lines(
    text: &str,
    entry_name: String,
    needle: &str,
    case_sensitive: bool,
) -> Vec<MatchRecord> {
    if needle.is_empty() {
        return Vec::new();
    }
    let lowered = (!case_sensitive).then(|| needle.to_lowercase());

    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let hit = match &lowered {
            Some(needle_lower) => line.to_lowercase().contains(needle_lower.as_str()),
            None => line.contains(needle),
        };
        if hit {
            records.push(MatchRecord {
                entry_name: entry_name.clone(),
                line_number: (idx + 1) as u32,
                snippet: line.trim().to_string(),
            });
        }
    }
    records
}

fn scan_binary(reader: &mut ArchiveReader, needle: &str, deep: bool) -> Vec<MatchRecord> {
    let needle_bytes = needle.as_bytes();
    if needle_bytes.is_empty() {
        return Vec::new();
    }

    let mut records = Vec::new();
    for name in reader.entry_names() {
        let Ok(content) = reader.read_entry(&name) else {
            continue;
        };
        let Some(pos) = find_subsequence(&content, needle_bytes) else {
            continue;
        };

        let context = {
            let start = pos.saturating_sub(BINARY_CONTEXT);
            let end = (pos + needle_bytes.len() + BINARY_CONTEXT).min(content.len());
            content[start..end].escape_ascii().to_string()
        };

        let detail = if deep && name.ends_with(".class") {
            let literals = printable_runs(&content);
            if literals.is_empty() {
                context
            } else {
                format!("String literals: {}", literals.join(" | "))
            }
        } else {
            context
        };

        records.push(MatchRecord {
            entry_name: name,
            line_number: 0,
            snippet: format!("Binary match at position {pos}: {detail}"),
        });
    }
    records
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Runs of bytes in 0x01..=0x7F of length >= 3, a cheap proxy for string
/// literals embedded in compiled classes.
fn printable_runs(content: &[u8]) -> Vec<String> {
    let mut runs = Vec::new();
    let mut start = None;

    for (i, &b) in content.iter().enumerate() {
        if (0x01..=0x7f).contains(&b) {
            start.get_or_insert(i);
        } else {
            flush_run(content, start.take(), i, &mut runs);
            if runs.len() >= DEEP_LITERAL_LIMIT {
                return runs;
            }
        }
    }
    flush_run(content, start, content.len(), &mut runs);
    runs.truncate(DEEP_LITERAL_LIMIT);
    runs
}

fn flush_run(content: &[u8], start: Option<usize>, end: usize, runs: &mut Vec<String>) {
    if let Some(start) = start
        && end - start >= DEEP_LITERAL_MIN_LEN
    {
        runs.push(content[start..end].escape_ascii().to_string());
    }
}
