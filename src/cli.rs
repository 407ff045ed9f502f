use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "jarscan")]
#[command(about = "Search JAR archives and Java source trees for text and package names")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory to scan (default: current directory)
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Search for text inside JAR archive entries
    Search {
        search_text: String,

        /// Maximum matches displayed per JAR
        #[arg(short = 'l', long, value_name = "N", default_value_t = 10)]
        limit: usize,

        /// Maximum matches displayed in total
        #[arg(long, value_name = "N", default_value_t = 1000)]
        total_limit: usize,

        #[arg(short = 'c', long)]
        case_sensitive: bool,

        /// Search raw bytes of every entry instead of decoded text
        #[arg(short = 'b', long)]
        binary: bool,

        /// Extract printable string literals from matching .class entries
        #[arg(long, requires = "binary")]
        deep: bool,

        /// Scan exactly this JAR instead of walking the root directory
        #[arg(short = 'j', long, value_name = "JAR")]
        jar: Option<PathBuf>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List Java package names found in JAR archives
    Packages {
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Search for text in .java files under the root directory
    Sources {
        search_text: String,

        /// Maximum matches displayed per file
        #[arg(short = 'l', long, value_name = "N", default_value_t = 10)]
        limit: usize,

        /// Maximum matches displayed in total
        #[arg(long, value_name = "N", default_value_t = 1000)]
        total_limit: usize,

        #[arg(short = 'c', long)]
        case_sensitive: bool,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
