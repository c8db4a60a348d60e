//! # JMESPath - Abstract Syntax Tree
//!
//! This module defines the tokens and syntax tree for JMESPath expressions.
//! A compiled expression is a tree of immutable [`Node`]s; evaluation walks
//! the tree without mutating it, so one tree can be shared across threads.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[nodes]** - Syntax tree nodes (access, projections, operators, literals)
//! - **[operators]** - Comparison operators
//!
//! ## Core Concepts
//!
//! ### Projections
//!
//! A projection applies a right-hand expression to every element of a
//! collection and drops `null` results:
//!
//! ```text
//! people[*].name        // array projection
//! ages.*                // object (value) projection
//! people[?age > `30`]   // filter projection
//! nested[]              // flatten, then project
//! ```
//!
//! Everything chained after a projection with `.`, `[` or `[?` becomes part
//! of its right-hand side. A pipe stops the projection:
//!
//! ```text
//! people[*].name | [0]  // first name
//! people[*].name[0]     // index into each name (strings) => []
//! ```
//!
//! ### Lexical Scope
//!
//! ```text
//! let $threshold = limits.max in items[?price > $threshold]
//! ```
pub mod nodes;
pub mod operators;
pub mod tokens;

pub use nodes::{Binding, KeyValue, Node, Slice};
pub use operators::Comparator;
pub use tokens::{Token, TokenKind};
