//! Pascal-like Semantic Compiler Check CLI
//!
//! Command-line driver for the semantic analysis core: takes an already
//! parsed AST (as JSON) and its source file, runs the analyzer, prints the
//! symbol-table dump to stdout and diagnostics to stderr.

use clap::Parser as ClapParser;
use pascal_sema::{AnalyzerConfig, analyze_file};
use std::path::PathBuf;
use std::process;

#[derive(ClapParser)]
#[command(name = "pscc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Semantic analysis core for a small Pascal-like language", long_about = None)]
struct Cli {
    /// Source file being analyzed (used only to render diagnostics)
    source: PathBuf,

    /// Parsed AST as JSON (defaults to `<source>.ast.json`)
    #[arg(long)]
    ast: Option<PathBuf>,

    /// Analyzer configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Suppress symbol-table dumps regardless of config
    #[arg(long)]
    no_dump: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("pscc=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ast_path = cli.ast.clone().unwrap_or_else(|| {
        let mut p = cli.source.clone().into_os_string();
        p.push(".ast.json");
        PathBuf::from(p)
    });

    let mut config = match &cli.config {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => match AnalyzerConfig::from_toml(&text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error reading config {}: {e}", path.display());
                process::exit(1);
            }
        },
        None => AnalyzerConfig::default(),
    };
    if cli.no_dump {
        config.dump_symbol_tables = false;
    }

    match analyze_file(&ast_path, &cli.source, config) {
        Ok((result, source_lines)) => {
            print!("{}", result.symbol_table_dump);
            eprint!("{}", result.diagnostics.render(&source_lines));
            if !result.diagnostics.is_empty() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
