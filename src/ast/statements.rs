use crate::ast::ValueNode;

/// A group written as `(name data...)`, or an array written as `[data...]`.
///
/// An empty `name` marks the anonymous array form, so both spellings share one
/// node type and build into the same runtime [`Group`](crate::group::Group).
///
/// # Example
/// ```text
/// (camera :fov 60 [1, 2, 3])
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatementNode {
    pub name: String,
    pub data: Vec<DataNode>,
}

impl StatementNode {
    pub fn new(name: impl Into<String>) -> Self {
        StatementNode {
            name: name.into(),
            data: Vec::new(),
        }
    }

    /// True for the `[...]` form.
    pub fn is_array(&self) -> bool {
        self.name.is_empty()
    }
}

/// One entry of a statement or expression argument list.
///
/// # Examples
/// ```text
/// :width 640      // key "width"
/// :0 "first"      // numeric keys are allowed
/// 42              // anonymous, key is empty
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    /// Empty for anonymous entries.
    pub key: String,
    pub value: ValueNode,
}

impl DataNode {
    pub fn new(key: impl Into<String>, value: ValueNode) -> Self {
        DataNode {
            key: key.into(),
            value,
        }
    }

    pub fn anonymous(value: ValueNode) -> Self {
        Self::new(String::new(), value)
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }
}
