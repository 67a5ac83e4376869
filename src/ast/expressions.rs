use crate::ast::{DataNode, StatementNode};

/// Value side of a [`DataNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValueNode {
    /// Nested group or array
    ///
    /// # Example
    /// ```text
    /// (child :c true)
    /// [1, 2, 3]
    /// ```
    Statement(StatementNode),

    /// Literal integer
    Integer(i64),

    /// Literal float
    Float(f64),

    /// Literal string
    String(String),

    /// `true` or `false`
    Boolean(bool),

    /// Inline expression evaluated at build time
    ///
    /// # Example
    /// ```text
    /// $(if true 1 2)
    /// ```
    Expression(ExpressionNode),
}

/// A call of a host-registered expression, written `$(name args...)`.
///
/// Arguments are built left to right before the expression runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionNode {
    /// Lookup key into the expression registry.
    pub name: String,
    pub args: Vec<DataNode>,
}

impl ExpressionNode {
    pub fn new(name: impl Into<String>) -> Self {
        ExpressionNode {
            name: name.into(),
            args: Vec::new(),
        }
    }
}
