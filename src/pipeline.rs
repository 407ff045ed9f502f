use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::archive::{ArchiveError, ArchiveReader};
use crate::matcher::{MatchMode, MatchRecord, scan_archive, scan_source_file};

/// All matches extracted from one source, in extraction order.
#[derive(Debug, Clone, Serialize)]
pub struct SourceMatches {
    pub source: PathBuf,
    pub records: Vec<MatchRecord>,
}

/// Sources with at least one match, sorted by path.
pub type ScanResult = Vec<SourceMatches>;

/// Fans one scan task per archive onto the rayon pool (bounded at host
/// parallelism). Each task owns its reader and record list; any archive-level
/// failure is caught in-task and reduces that archive to an empty result, so
/// one bad archive never fails the batch. The merge runs after all tasks
/// join.
pub fn scan_archives(jars: &[PathBuf], mode: &MatchMode) -> ScanResult {
    let partials: Vec<SourceMatches> = jars
        .par_iter()
        .filter_map(|jar| {
            let records = match scan_one_archive(jar, mode) {
                Ok(records) => records,
                Err(err) => {
                    eprintln!("Error processing {}: {err}", jar.display());
                    Vec::new()
                }
            };
            (!records.is_empty()).then(|| SourceMatches {
                source: jar.clone(),
                records,
            })
        })
        .collect();

    merge(partials)
}

/// Same fan-out for plain source files, text mode only.
pub fn scan_source_files(files: &[PathBuf], needle: &str, case_sensitive: bool) -> ScanResult {
    let partials: Vec<SourceMatches> = files
        .par_iter()
        .filter_map(|file| {
            let records = match scan_source_file(file, needle, case_sensitive) {
                Ok(records) => records,
                Err(err) => {
                    eprintln!("Error searching file {}: {err}", file.display());
                    Vec::new()
                }
            };
            (!records.is_empty()).then(|| SourceMatches {
                source: file.clone(),
                records,
            })
        })
        .collect();

    merge(partials)
}

fn scan_one_archive(jar: &Path, mode: &MatchMode) -> Result<Vec<MatchRecord>, ArchiveError> {
    let mut reader = ArchiveReader::open(jar)?;
    Ok(scan_archive(&mut reader, mode))
}

fn merge(mut partials: Vec<SourceMatches>) -> ScanResult {
    partials.sort_by(|a, b| a.source.cmp(&b.source));
    partials
}
