// Position tracking module
pub mod position;

// Error types
pub mod error;

// Token classifier module
pub mod token;

// Output span buffer module
pub mod buffer;

// Replacement rules and import prefix matching
pub mod rules;

// Package clause rewriting
pub mod package;

// Import declaration rewriting
pub mod imports;

// Per-file rewrite engine
pub mod rewrite;

// File operations module
pub mod file;

// Run configuration
pub mod config;

// Tree walking module
pub mod walk;

// JSON output module
pub mod json;

// Re-exports
pub use position::{Position, Span, byte_to_position};
pub use error::{RepackError, RewriteError, Result};
pub use token::{Scanner, Token, TokenKind};
pub use buffer::{Replacement, SpanBuffer};
pub use rules::{FileRules, ImportRewrites, PackagePolicy, PrefixRule, ReplacementRules};
pub use rewrite::{Rewritten, rewrite_file, rewrite_source};
pub use file::{SourceFile, read_source, write_in_place};
pub use config::{RenameOpts, collect_import_rules, parse_import_rule};
pub use walk::{ExcludeSet, Visit, rename};
pub use json::{FileReport, RenameReport, RenameResponse, generate_run_id};
