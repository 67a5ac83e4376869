pub mod ast;
pub mod cli;
pub mod container;
pub mod driver;
pub mod evaluator;
pub mod group;
pub mod lexer;
pub mod logger;
pub mod output;
pub mod parser;
pub mod stdlib;
pub mod value;

pub use ast::{SyntaxTree, Token, TokenKind};
pub use container::Container;
pub use driver::{DataLisp, DriverError};
pub use evaluator::{Expression, ExpressionRegistry, Vm};
pub use group::Group;
pub use lexer::{Lexer, Position};
pub use logger::{Level, LogRecord, MemoryLogger, SourceLogger, TracingLogger};
pub use output::generate;
pub use parser::Parser;
pub use value::{Data, DataType, Value};
