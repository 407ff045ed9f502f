use anyhow::Result;
use clap::Parser;
use jarscan::cli::{Cli, Commands, OutputFormat};
use jarscan::config::{display_limits, resolve_jar_path, resolve_root};
use jarscan::matcher::MatchMode;
use jarscan::pipeline::{ScanResult, scan_archives, scan_source_files};
use jarscan::report::{
    SourceKind, render_matches, render_matches_json, render_packages, render_packages_json,
};
use jarscan::scan::{JAR_SUFFIXES, JAVA_SUFFIXES, scan_files};
use std::io;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = parse_cli();
    let root = resolve_root(&cli)?;

    match cli.command.clone() {
        Commands::Search {
            search_text,
            limit,
            total_limit,
            case_sensitive,
            binary,
            deep,
            jar,
            format,
        } => {
            let mode = if binary {
                MatchMode::Binary {
                    needle: search_text.clone(),
                    deep,
                }
            } else {
                MatchMode::Text {
                    needle: search_text.clone(),
                    case_sensitive,
                }
            };

            let results = match jar {
                Some(jar) => {
                    let jar_path = resolve_jar_path(&root, &jar);
                    if !jar_path.exists() {
                        anyhow::bail!("JAR file '{}' not found", jar_path.display());
                    }
                    eprintln!(
                        "Scanning for '{search_text}' in JAR file: {}",
                        jar_path.display()
                    );
                    scan_archives(&[jar_path], &mode)
                }
                None => {
                    eprintln!(
                        "Scanning for '{search_text}' in JAR files within: {}",
                        root.display()
                    );
                    let jars = enumerate(&root, JAR_SUFFIXES, "JAR files");
                    scan_archives(&jars, &mode)
                }
            };

            emit_matches(
                &results,
                SourceKind::Archive,
                &search_text,
                format,
                limit,
                total_limit,
            )?;
        }
        Commands::Packages { format } => {
            eprintln!("Scanning for JAR files in: {}", root.display());
            let jars = enumerate(&root, JAR_SUFFIXES, "JAR files");
            let results = scan_archives(&jars, &MatchMode::Packages);

            let mut out = io::stdout().lock();
            match format {
                OutputFormat::Text => render_packages(&mut out, &results)?,
                OutputFormat::Json => render_packages_json(&mut out, &results)?,
            }
        }
        Commands::Sources {
            search_text,
            limit,
            total_limit,
            case_sensitive,
            format,
        } => {
            eprintln!("Searching for .java files in {}...", root.display());
            let files = enumerate(&root, JAVA_SUFFIXES, ".java files");
            eprintln!("Searching for '{search_text}' in {} files...", files.len());
            let results = scan_source_files(&files, &search_text, case_sensitive);

            emit_matches(
                &results,
                SourceKind::SourceFile,
                &search_text,
                format,
                limit,
                total_limit,
            )?;
        }
    }

    Ok(())
}

fn enumerate(root: &std::path::Path, suffixes: &[&str], what: &str) -> Vec<PathBuf> {
    let files = scan_files(root, suffixes);
    eprintln!("Found {} {what} to process.", files.len());
    files
}

fn emit_matches(
    results: &ScanResult,
    kind: SourceKind,
    needle: &str,
    format: OutputFormat,
    limit: usize,
    total_limit: usize,
) -> Result<()> {
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Text => {
            let limits = display_limits(limit, total_limit);
            render_matches(&mut out, results, kind, needle, limits)?;
        }
        OutputFormat::Json => render_matches_json(&mut out, results, needle)?,
    }
    Ok(())
}

fn parse_cli() -> Cli {
    let args: Vec<String> = std::env::args().collect();
    Cli::parse_from(rewrite_args_for_implicit_search(args))
}

/// `jarscan "TODO"` is rewritten to `jarscan search "TODO"`: the first
/// non-flag token that is not a known subcommand gets the `search` verb
/// inserted in front of it.
fn rewrite_args_for_implicit_search(mut args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 {
        return args;
    }

    let subcommands = ["search", "packages", "sources", "help"];

    let mut idx = 1usize;
    while idx < args.len() {
        let a = args[idx].as_str();
        if a == "--" {
            idx += 1;
            break;
        }

        if a == "--dir" || a == "-d" {
            idx += 2;
            continue;
        }

        if a.starts_with("--dir=") {
            idx += 1;
            continue;
        }

        if a.starts_with('-') {
            idx += 1;
            continue;
        }

        break;
    }

    if idx < args.len() {
        let token = args[idx].as_str();
        if !subcommands.contains(&token) {
            args.insert(idx, "search".to_string());
        }
    }

    args
}
