use serde::Serialize;
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::pipeline::SourceMatches;

/// Display caps, both clamped to at least one by the config layer.
#[derive(Debug, Clone, Copy)]
pub struct DisplayLimits {
    pub per_source: usize,
    pub total: usize,
}

/// What the sources being reported are, for header and summary wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    SourceFile,
}

impl SourceKind {
    fn header(self) -> &'static str {
        match self {
            SourceKind::Archive => "JAR",
            SourceKind::SourceFile => "FILE",
        }
    }

    fn plural(self) -> &'static str {
        match self {
            SourceKind::Archive => "JAR files",
            SourceKind::SourceFile => "files",
        }
    }
}

/// Renders a match report. Sources arrive sorted by path from the merge; a
/// source shows at most `per_source` matches (and never more than the
/// remaining total budget), and once the total budget is spent remaining
/// sources are only counted. The summary always reports the true totals.
pub fn render_matches(
    out: &mut impl Write,
    results: &[SourceMatches],
    kind: SourceKind,
    needle: &str,
    limits: DisplayLimits,
) -> io::Result<()> {
    if results.is_empty() {
        writeln!(
            out,
            "No occurrences of '{needle}' found in any {}.",
            kind.plural()
        )?;
        return Ok(());
    }

    let total_matches: usize = results.iter().map(|s| s.records.len()).sum();
    let total_sources = results.len();

    let mut displayed = 0usize;
    let mut shown_sources = 0usize;

    for sm in results {
        if displayed >= limits.total {
            break;
        }

        let n = sm.records.len();
        writeln!(
            out,
            "{}: {} ({n} matches)",
            kind.header(),
            sm.source.display()
        )?;

        let budget = limits.total - displayed;
        let show = n.min(limits.per_source).min(budget);
        for record in &sm.records[..show] {
            if record.entry_name.is_empty() {
                writeln!(out, "  - {}: {}", record.line_number, record.snippet)?;
            } else {
                writeln!(
                    out,
                    "  - {}:{}: {}",
                    record.entry_name, record.line_number, record.snippet
                )?;
            }
        }
        if n > show {
            writeln!(
                out,
                "  ... and {} more matches (use --limit to show more)",
                n - show
            )?;
        }
        writeln!(out)?;

        displayed += show;
        shown_sources += 1;
    }

    if shown_sources < total_sources {
        writeln!(
            out,
            "Output limit reached. {} more {} with matches not shown.",
            total_sources - shown_sources,
            kind.plural()
        )?;
        writeln!(
            out,
            "Use --total-limit to increase the maximum number of displayed matches."
        )?;
    }

    writeln!(
        out,
        "Summary: Found {total_matches} matches in {total_sources} {}.",
        kind.plural()
    )?;
    if displayed < total_matches {
        writeln!(out, "Displayed {displayed} out of {total_matches} total matches.")?;
    }

    Ok(())
}

/// Renders the package-scan report: every package per archive, sorted, with
/// a unique-package summary. Package listings are not display-limited.
pub fn render_packages(out: &mut impl Write, results: &[SourceMatches]) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out, "No JAR files with packages found.")?;
        return Ok(());
    }

    let mut unique = HashSet::new();
    for sm in results {
        writeln!(out, "JAR: {}", sm.source.display())?;
        let mut packages: Vec<&str> = sm.records.iter().map(|r| r.snippet.as_str()).collect();
        packages.sort_unstable();
        for package in &packages {
            writeln!(out, "  - {package}")?;
            unique.insert(package.to_string());
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Summary: Found {} unique package names in {} JAR files.",
        unique.len(),
        results.len()
    )?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct MatchReport<'a> {
    search_text: &'a str,
    total_matches: usize,
    total_sources: usize,
    sources: &'a [SourceMatches],
}

/// JSON match report: the full untruncated result set plus summary counts.
/// Display limits are a console concern and do not apply here.
pub fn render_matches_json(
    out: &mut impl Write,
    results: &[SourceMatches],
    needle: &str,
) -> anyhow::Result<()> {
    let report = MatchReport {
        search_text: needle,
        total_matches: results.iter().map(|s| s.records.len()).sum(),
        total_sources: results.len(),
        sources: results,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct PackageReport {
    total_packages: usize,
    total_jars: usize,
    jars: Vec<JarPackages>,
}

#[derive(Debug, Serialize)]
struct JarPackages {
    jar: PathBuf,
    packages: Vec<String>,
}

pub fn render_packages_json(out: &mut impl Write, results: &[SourceMatches]) -> anyhow::Result<()> {
    let mut unique = HashSet::new();
    let jars: Vec<JarPackages> = results
        .iter()
        .map(|sm| {
            let mut packages: Vec<String> =
                sm.records.iter().map(|r| r.snippet.clone()).collect();
            packages.sort_unstable();
            unique.extend(packages.iter().cloned());
            JarPackages {
                jar: sm.source.clone(),
                packages,
            }
        })
        .collect();

    let report = PackageReport {
        total_packages: unique.len(),
        total_jars: jars.len(),
        jars,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchRecord;

    fn record(entry: &str, line: u32, snippet: &str) -> MatchRecord {
        MatchRecord {
            entry_name: entry.to_string(),
            line_number: line,
            snippet: snippet.to_string(),
        }
    }

    fn source(path: &str, records: Vec<MatchRecord>) -> SourceMatches {
        SourceMatches {
            source: PathBuf::from(path),
            records,
        }
    }

    fn render_to_string(results: &[SourceMatches], limits: DisplayLimits) -> String {
        let mut out = Vec::new();
        render_matches(&mut out, results, SourceKind::Archive, "needle", limits).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn limits(per_source: usize, total: usize) -> DisplayLimits {
        DisplayLimits { per_source, total }
    }

    #[test]
    fn per_source_limit_truncates_with_notice() {
        let records = (1..=5)
            .map(|i| record("A.java", i, "TODO item"))
            .collect();
        let out = render_to_string(&[source("demo.jar", records)], limits(2, 1000));

        assert!(out.contains("JAR: demo.jar (5 matches)"));
        assert_eq!(out.matches("  - A.java:").count(), 2);
        assert!(out.contains("  ... and 3 more matches (use --limit to show more)"));
        assert!(out.contains("Summary: Found 5 matches in 1 JAR files."));
        assert!(out.contains("Displayed 2 out of 5 total matches."));
    }

    #[test]
    fn total_limit_is_never_exceeded() {
        let results: Vec<SourceMatches> = (0..4)
            .map(|i| {
                let records = (1..=3).map(|l| record("E.txt", l, "hit")).collect();
                source(&format!("jar{i}.jar"), records)
            })
            .collect();

        let out = render_to_string(&results, limits(3, 5));

        // 3 from the first jar, 2 from the second, then stop.
        assert_eq!(out.matches("  - E.txt:").count(), 5);
        assert!(out.contains("Output limit reached. 2 more JAR files with matches not shown."));
        assert!(out.contains("Use --total-limit to increase the maximum number of displayed matches."));
        // Found count is the true total even though display was cut off.
        assert!(out.contains("Summary: Found 12 matches in 4 JAR files."));
        assert!(out.contains("Displayed 5 out of 12 total matches."));
    }

    #[test]
    fn exact_fit_has_no_truncation_notices() {
        let results = vec![source("a.jar", vec![record("A.txt", 1, "hit")])];
        let out = render_to_string(&results, limits(10, 1000));

        assert!(out.contains("JAR: a.jar (1 matches)"));
        assert!(!out.contains("more matches"));
        assert!(!out.contains("Output limit reached"));
        assert!(!out.contains("Displayed"));
        assert!(out.contains("Summary: Found 1 matches in 1 JAR files."));
    }

    #[test]
    fn empty_results_report_no_occurrences() {
        let out = render_to_string(&[], limits(10, 1000));
        assert_eq!(out, "No occurrences of 'needle' found in any JAR files.\n");
    }

    #[test]
    fn plain_file_records_render_without_entry_prefix() {
        let results = vec![source("src/A.java", vec![record("", 7, "int x;")])];
        let mut out = Vec::new();
        render_matches(
            &mut out,
            &results,
            SourceKind::SourceFile,
            "x",
            limits(10, 1000),
        )
        .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("FILE: src/A.java (1 matches)"));
        assert!(out.contains("  - 7: int x;"));
        assert!(out.contains("Summary: Found 1 matches in 1 files."));
    }

    #[test]
    fn package_report_sorts_and_counts_unique_packages() {
        let results = vec![
            source(
                "a.jar",
                vec![record("", 0, "com.acme"), record("", 0, "com.acme.util")],
            ),
            source("b.jar", vec![record("", 0, "com.acme")]),
        ];
        let mut out = Vec::new();
        render_packages(&mut out, &results).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("JAR: a.jar\n  - com.acme\n  - com.acme.util"));
        assert!(out.contains("JAR: b.jar\n  - com.acme"));
        assert!(out.contains("Summary: Found 2 unique package names in 2 JAR files."));
    }

    #[test]
    fn package_report_handles_empty_results() {
        let mut out = Vec::new();
        render_packages(&mut out, &[]).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No JAR files with packages found.\n"
        );
    }

    #[test]
    fn json_report_is_untruncated() {
        let records = (1..=5).map(|i| record("A.java", i, "hit")).collect();
        let results = vec![source("demo.jar", records)];
        let mut out = Vec::new();
        render_matches_json(&mut out, &results, "hit").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["total_matches"], 5);
        assert_eq!(value["total_sources"], 1);
        assert_eq!(value["sources"][0]["records"].as_array().unwrap().len(), 5);
    }
}
