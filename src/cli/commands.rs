use std::env;
use std::path::PathBuf;

use clap::Parser;

use cxx_tags::config::{ConfigFile, IndexConfig};
use cxx_tags::error::Result;
use cxx_tags::indexer::{self, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "cxx-tags")]
#[command(about = "Generate an Emacs TAGS file for C and C++ sources")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Index the current directory into ./TAGS
    cxx-tags

    # Index two trees with extra header search paths
    cxx-tags -I include -I third_party/zlib src lib

    # Treat headers as C++ and write elsewhere
    cxx-tags -x c++-header -o build/TAGS include
"#)]
pub struct Cli {
    /// Files or directories to index
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Add a directory to the header search path
    #[arg(short = 'I', value_name = "DIR")]
    pub include: Vec<PathBuf>,

    /// Parse every file as this language (c, c-header, c++, c++-header)
    #[arg(short = 'x', value_name = "LANG")]
    pub language: Option<String>,

    /// Output file [default: TAGS]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not search the system include directories
    #[arg(long)]
    pub nostdinc: bool,

    /// Read settings from this file instead of ./.cxx-tags.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merges the config file (if any) with the command-line options.
    pub fn resolve(self) -> Result<IndexConfig> {
        let file = match &self.config {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::discover(&env::current_dir()?)?,
        };
        let mut config = file.map(IndexConfig::from_file).unwrap_or_default();

        config.roots = self.paths;
        // Command-line directories are searched before configured ones.
        let mut include_dirs = self.include;
        include_dirs.append(&mut config.include_dirs);
        config.include_dirs = include_dirs;

        if self.language.is_some() {
            config.language = self.language;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.nostdinc {
            config.system_includes = false;
        }
        config.quiet = self.quiet;
        Ok(config)
    }
}

pub fn run_index(cli: Cli) -> Result<()> {
    let config = cli.resolve()?;
    let summary = indexer::run(&config)?;
    if !config.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Done");

    if summary.missing_includes.is_empty() {
        return;
    }
    println!();
    println!("The following include files could not be found:");
    for file in &summary.missing_includes {
        println!("    {}", file);
    }
    if summary.missing_overflow > 0 {
        println!("    ... and {} more", summary.missing_overflow);
    }
    println!("Use -I <dir> to add header search directories for more complete results.");
}
