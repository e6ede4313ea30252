//! Semantic analysis core for a small Pascal-like procedural language.
//!
//! This crate consumes an already-parsed AST (see [`ast`]) and produces a
//! pretty-printed dump of every scope's symbol table plus a stream of
//! name-resolution, type, and usage diagnostics. The lexer/parser that
//! builds the AST, the primitive-type printer it's built from, and the
//! command-line driver's file I/O are external collaborators - this crate
//! only fixes the contract they have to meet (see [`ast`] and
//! [`diagnostics::SourceLines`]).
//!
//! ```rust,ignore
//! use pascal_sema::{Analyzer, AnalyzerConfig};
//!
//! let program: pascal_sema::ast::Program = serde_json::from_str(&ast_json)?;
//! let result = Analyzer::new(AnalyzerConfig::default()).analyze(&program);
//! print!("{}", result.symbol_table_dump);
//! eprint!("{}", result.diagnostics.render(&source_lines));
//! ```

pub mod analyzer;
pub mod ast;
pub mod attribute;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod dump;
pub mod loopvars;
pub mod scope;
pub mod symbol;
pub mod types;

pub use analyzer::{AnalysisResult, Analyzer};
pub use config::AnalyzerConfig;
pub use diagnostics::{Diagnostic, DiagnosticCollector, SourceLines};

use std::fs;
use std::path::Path;

/// Read an AST JSON document and the matching source file, analyze it, and
/// return the result plus the indexed source lines the caller needs to
/// render diagnostics. This is the one entry point the CLI driver and
/// embedders outside this crate are expected to call; everything else is
/// available for finer-grained control (e.g. an LSP server analyzing an
/// in-memory buffer without touching the filesystem).
pub fn analyze_file(
    ast_path: &Path,
    source_path: &Path,
    config: AnalyzerConfig,
) -> Result<(AnalysisResult, Vec<String>), String> {
    let ast_json = fs::read_to_string(ast_path)
        .map_err(|e| format!("Failed to read AST file {}: {e}", ast_path.display()))?;
    let program: ast::Program = serde_json::from_str(&ast_json)
        .map_err(|e| format!("Failed to parse AST JSON {}: {e}", ast_path.display()))?;

    let source = fs::read_to_string(source_path)
        .map_err(|e| format!("Failed to read source file {}: {e}", source_path.display()))?;
    let lines: Vec<String> = source.lines().map(str::to_string).collect();

    let result = Analyzer::new(config).analyze(&program);
    Ok((result, lines))
}
