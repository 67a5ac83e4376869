use thiserror::Error;

use crate::{
    ast::SyntaxTree,
    container::Container,
    evaluator::{Expression, ExpressionRegistry, Vm},
    lexer::Lexer,
    logger::SourceLogger,
    output,
    parser::Parser,
    value::Data,
};

/// Misuse of the [`DataLisp`] driver.
///
/// Problems in the source text itself are never reported here; they go to the
/// driver's [`SourceLogger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("source was already parsed, use a new driver for more input")]
    AlreadyParsed,

    #[error("nothing to build, parse a source first")]
    NotParsed,
}

/// Parses one source unit and builds it into containers.
///
/// # Examples
///
/// ```
/// use datalisp::{Container, DataLisp, MemoryLogger};
///
/// let logger = MemoryLogger::new();
/// let mut dl = DataLisp::new(&logger);
/// dl.parse("(window :width 640 :visible $(not false))").unwrap();
///
/// let mut container = Container::new();
/// dl.build(&mut container).unwrap();
///
/// let window = &container.top_groups()[0];
/// assert_eq!(window.get_from_key("width").as_int(), Some(640));
/// assert_eq!(window.get_from_key("visible").as_bool(), Some(true));
/// assert_eq!(logger.error_count(), 0);
/// ```
pub struct DataLisp<'a> {
    logger: &'a dyn SourceLogger,
    registry: ExpressionRegistry,
    tree: Option<SyntaxTree>,
}

impl<'a> DataLisp<'a> {
    /// A driver with the standard library registered.
    pub fn new(logger: &'a dyn SourceLogger) -> Self {
        DataLisp {
            logger,
            registry: ExpressionRegistry::with_stdlib(),
            tree: None,
        }
    }

    /// A driver with no expressions registered.
    pub fn without_stdlib(logger: &'a dyn SourceLogger) -> Self {
        DataLisp {
            logger,
            registry: ExpressionRegistry::new(),
            tree: None,
        }
    }

    pub fn logger(&self) -> &'a dyn SourceLogger {
        self.logger
    }

    /// Parses `source`. Syntax errors are logged and leave a partial tree.
    ///
    /// Fails only when this driver already holds a tree.
    pub fn parse(&mut self, source: &str) -> Result<(), DriverError> {
        if self.tree.is_some() {
            return Err(DriverError::AlreadyParsed);
        }

        let lexer = Lexer::new(source, self.logger);
        let mut parser = Parser::new(lexer);
        self.tree = Some(parser.parse());
        Ok(())
    }

    /// Builds the parsed tree into `container`, appending its top-level groups.
    ///
    /// Can be called repeatedly; every call evaluates the expressions again.
    pub fn build(&self, container: &mut Container) -> Result<(), DriverError> {
        let tree = self.tree.as_ref().ok_or(DriverError::NotParsed)?;
        let mut vm = Vm::new(container, self.logger, &self.registry);
        vm.build(tree);
        Ok(())
    }

    /// Registers `handler` under `name`, replacing any previous expression.
    pub fn add_expression<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&[Data], &mut Vm<'_>) -> Data + 'static,
    {
        self.registry.add(name, handler);
    }

    pub fn expression(&self, name: &str) -> Option<&Expression> {
        self.registry.get(name)
    }

    pub fn has_expression(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn registry(&self) -> &ExpressionRegistry {
        &self.registry
    }

    pub fn tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    /// Source text for `container`. See [`output::generate`].
    pub fn generate(container: &Container) -> String {
        output::generate(container)
    }

    /// Trace of the parsed tree, empty before [`parse`](Self::parse).
    pub fn dump(&self) -> String {
        self.tree.as_ref().map(output::dump).unwrap_or_default()
    }
}
