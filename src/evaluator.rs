use std::collections::HashMap;
use std::fmt;

use crate::{
    ast::{DataNode, StatementNode, SyntaxTree, ValueNode},
    container::Container,
    group::Group,
    logger::{Level, SourceLogger},
    stdlib,
    value::{Data, DataType, Value},
};

/// A host-registered expression.
///
/// Receives the already built arguments in source order and returns one
/// [`Data`], which may be invalid.
pub type Expression = Box<dyn Fn(&[Data], &mut Vm<'_>) -> Data>;

/// Name to [`Expression`] mapping consulted for every `$(name ...)` node.
///
/// Registering a name twice replaces the earlier handler.
#[derive(Default)]
pub struct ExpressionRegistry {
    handlers: HashMap<String, Expression>,
}

impl ExpressionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard library.
    pub fn with_stdlib() -> Self {
        let mut registry = Self::new();
        stdlib::register(&mut registry);
        registry
    }

    pub fn add<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&[Data], &mut Vm<'_>) -> Data + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    pub fn get(&self, name: &str) -> Option<&Expression> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for ExpressionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Evaluation context of one build pass.
///
/// Walks the syntax tree into the bound [`Container`], calling registered
/// expressions on the way, and offers the cast and broadcast services those
/// expressions are written against. Holds no state between passes.
pub struct Vm<'a> {
    container: &'a mut Container,
    logger: &'a dyn SourceLogger,
    registry: &'a ExpressionRegistry,
}

impl<'a> Vm<'a> {
    pub fn new(
        container: &'a mut Container,
        logger: &'a dyn SourceLogger,
        registry: &'a ExpressionRegistry,
    ) -> Self {
        Vm {
            container,
            logger,
            registry,
        }
    }

    pub fn logger(&self) -> &'a dyn SourceLogger {
        self.logger
    }

    pub fn container(&self) -> &Container {
        self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        self.container
    }

    pub fn registry(&self) -> &'a ExpressionRegistry {
        self.registry
    }

    /// Converts `data` to `ty`, keeping its key.
    ///
    /// Only Bool, Integer and Float convert into each other. An implicit
    /// Integer to Float conversion is reported as a warning. Anything else is
    /// logged as an error and yields invalid data.
    pub fn cast_to(&self, data: &Data, ty: DataType, explicit: bool) -> Data {
        if data.data_type() == ty {
            return data.clone();
        }

        let converted = match (ty, data.value()) {
            (DataType::Bool, Value::Integer(n)) => Some(Value::Bool(*n != 0)),
            (DataType::Bool, Value::Float(n)) => Some(Value::Bool(*n != 0.0)),
            (DataType::Integer, Value::Bool(b)) => Some(Value::Integer(i64::from(*b))),
            (DataType::Integer, Value::Float(n)) => Some(Value::Integer(*n as i64)),
            (DataType::Float, Value::Bool(b)) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
            (DataType::Float, Value::Integer(n)) => {
                if !explicit {
                    self.logger
                        .log(Level::Warning, "Implicit conversion from 'Integer' to 'Float'");
                }
                Some(Value::Float(*n as f64))
            }
            _ => None,
        };

        match converted {
            Some(value) => Data::new(data.key(), value),
            None => {
                self.logger.log(
                    Level::Error,
                    &format!("Can not convert '{}' to '{}'", data.data_type(), ty),
                );
                Data::none()
            }
        }
    }

    /// Applies `f` to each argument.
    ///
    /// No arguments yield invalid data and a single argument yields `f`'s
    /// result directly. With more arguments the results are collected into a
    /// new array.
    pub fn do_element_wise<F>(&mut self, f: F, args: &[Data]) -> Data
    where
        F: Fn(&Data, &mut Self) -> Data,
    {
        match args {
            [] => Data::none(),
            [single] => f(single, self),
            _ => {
                let group = Group::array();
                for arg in args {
                    group.add(f(arg, self));
                }
                Data::group(group)
            }
        }
    }

    /// Calls the expression registered as `name`.
    pub fn call(&mut self, name: &str, args: &[Data]) -> Data {
        let registry = self.registry;
        match registry.get(name) {
            Some(handler) => handler(args, self),
            None => {
                self.logger
                    .log(Level::Error, &format!("Couldn't find expression '{name}'"));
                Data::none()
            }
        }
    }

    /// Builds every top-level statement of `tree` into the container.
    pub fn build(&mut self, tree: &SyntaxTree) {
        for statement in &tree.statements {
            let group = self.build_group(statement);
            self.container.add_top_group(group);
        }
        tracing::debug!(top_groups = self.container.len(), "built container");
    }

    /// Builds a group from `node`. Entries that build into invalid data are dropped.
    pub fn build_group(&mut self, node: &StatementNode) -> Group {
        let group = Group::new(node.name.as_str());
        for data in &node.data {
            group.add(self.build_data(data));
        }
        group
    }

    pub fn build_data(&mut self, node: &DataNode) -> Data {
        match &node.value {
            ValueNode::Statement(statement) => {
                Data::new(node.key.as_str(), Value::Group(self.build_group(statement)))
            }
            ValueNode::Integer(n) => Data::new(node.key.as_str(), Value::Integer(*n)),
            ValueNode::Float(n) => Data::new(node.key.as_str(), Value::Float(*n)),
            ValueNode::String(s) => Data::new(node.key.as_str(), Value::String(s.clone())),
            ValueNode::Boolean(b) => Data::new(node.key.as_str(), Value::Bool(*b)),
            ValueNode::Expression(expression) => {
                let mut args = Vec::with_capacity(expression.args.len());
                for arg in &expression.args {
                    args.push(self.build_data(arg));
                }
                self.call(&expression.name, &args).with_key(node.key.as_str())
            }
        }
    }
}
