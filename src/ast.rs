//! # DataLisp - Syntax Tree
//!
//! This module defines the tokens and syntax tree of DataLisp, a small
//! S-expression notation for nested named groups, arrays, scalar literals and
//! inline expressions evaluated at load time.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[statements]** - Groups, arrays and their keyed or anonymous entries
//! - **[expressions]** - Entry values, including inline `$(...)` expressions
//! - **[tree]** - The parsed unit handed to the builder
//!
//! ## Quick Start
//!
//! ```text
//! (scene
//!   :name "demo"           ; named entry
//!   :size [640, 480]       ; array
//!   (camera :fov 60)       ; anonymous nested group
//!   :fast $(if true 1 0))  ; inline expression
//! ```
//!
//! ## Grammar
//!
//! ```text
//! unit        := { '(' statement ')' }
//! statement   := IDENTIFIER [','] data_list
//! expression  := IDENTIFIER data_list
//! data_list   := { data [','] }
//! data        := [ ':' (IDENTIFIER|INTEGER) ] value
//! value       := '(' statement ')'
//!              | '[' data_list ']'
//!              | '$(' expression ')'
//!              | INTEGER | FLOAT | STRING | true | false
//! ```
//!
//! Arrays are statements with an empty name, so arrays and named groups build
//! into the same runtime type.
pub mod expressions;
pub mod statements;
pub mod tokens;
pub mod tree;

pub use expressions::{ExpressionNode, ValueNode};
pub use statements::{DataNode, StatementNode};
pub use tokens::{Token, TokenKind};
pub use tree::SyntaxTree;
