//! Version-aware Cypher rewriter and safety gate.
//!
//! Turns LLM-generated, possibly outdated Cypher into a query that is valid
//! for the target Neo4j version tier and free of mutating or administrative
//! operations.
//!
//! ## Architecture
//!
//! ```text
//! CypherRewriter (orchestration)
//!   ├─> version   tier classification
//!   ├─> scope     WITH sanitize / repair (lexical)
//!   ├─> rules     size, APOC, nested RETURN guards, toString
//!   └─> safety    denylist scan, every tier
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use cypher_guard::{CypherRewriter, CypherVersion};
//!
//! let rewriter = CypherRewriter::new(CypherVersion::V5);
//! let outcome = rewriter.rewrite("MATCH (a) RETURN size((a)-->())").unwrap();
//! assert_eq!(outcome.query, "MATCH (a) RETURN COUNT { (a)-->() }");
//! ```

pub mod changes;
pub mod config;
pub mod error;
mod lexer;
pub mod rewriter;
pub mod rules;
pub mod safety;
pub mod scope;
pub mod variables;
pub mod version;

pub use changes::{ChangeLog, RewriteOutcome};
pub use config::RewriterConfig;
pub use error::{ConfigError, ConfigResult, RewriteError, RewriteResult};
pub use rewriter::{rewrite, CypherRewriter, RewriteOptions};
pub use rules::{Rule, RuleSet};
pub use safety::SafetyValidator;
pub use variables::extract_variables;
pub use version::{classify, detect_version, CypherVersion, VersionSource};
