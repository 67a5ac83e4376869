use crate::ast::StatementNode;

/// Parsed source unit: the top-level statements in source order.
///
/// Immutable once the parser returns it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    pub statements: Vec<StatementNode>,
}

impl SyntaxTree {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
