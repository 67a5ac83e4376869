//! Text output for containers, data and syntax trees.
//!
//! - [`generate()`] serializes a container back into source text that parses
//!   into an equivalent container.
//! - [`render()`] formats a single value for humans, as used by `$(print ...)`.
//! - [`dump()`] traces a syntax tree before it is built. The trace is
//!   diagnostic only and does not parse back.
//!
//! # Examples
//!
//! ```
//! use datalisp::{Container, Data, Group, Value};
//! use datalisp::output::{generate, render};
//!
//! let group = Group::new("window");
//! group.add(Data::new("title", Value::String("main".into())));
//! group.add(Data::integer(640));
//!
//! let mut container = Container::new();
//! container.add_top_group(group.clone());
//!
//! assert_eq!(generate(&container), "(window 640 :title \"main\")\n");
//! assert_eq!(render(&Data::group(group)), "(window 640, :title main)");
//! ```

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{DataNode, StatementNode, SyntaxTree, ValueNode},
    container::Container,
    group::Group,
    value::{Data, Value},
};

static KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*|[+-]?[0-9]+)$").expect("key pattern compiles")
});

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("id pattern compiles"));

/// True when `key` can be written after a `:` (an identifier or an integer).
pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key) && key != "true" && key != "false"
}

/// True when `id` can name a group.
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id) && id != "true" && id != "false"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    /// Parseable text: quoted strings, float literals, space separated.
    Source,
    /// Human text: raw strings, comma separated.
    Display,
}

/// Formats data and groups in one of two styles.
pub struct Printer {
    style: Style,
}

impl Printer {
    /// A printer emitting parseable source text.
    pub fn source() -> Self {
        Printer {
            style: Style::Source,
        }
    }

    /// A printer emitting human-readable text.
    pub fn display() -> Self {
        Printer {
            style: Style::Display,
        }
    }

    pub fn print(&self, data: &Data) -> String {
        let mut out = String::new();
        self.print_data(data, &mut out);
        out
    }

    pub fn print_group(&self, group: &Group, out: &mut String) {
        let (open, close) = if group.is_array() {
            ("[", "]")
        } else {
            ("(", ")")
        };
        let separator = match self.style {
            Style::Source => " ",
            Style::Display => ", ",
        };

        out.push_str(open);
        let id = group.id();
        out.push_str(&id);

        let entries = group.entries();
        for (i, entry) in entries.iter().enumerate() {
            if i == 0 {
                if !id.is_empty() {
                    out.push(' ');
                }
            } else {
                out.push_str(separator);
            }
            self.print_data(entry, out);
        }
        out.push_str(close);
    }

    fn print_data(&self, data: &Data, out: &mut String) {
        if !data.is_anonymous() {
            out.push(':');
            out.push_str(data.key());
            out.push(' ');
        }
        self.print_value(data.value(), out);
    }

    fn print_value(&self, value: &Value, out: &mut String) {
        match value {
            Value::Group(g) => self.print_group(g, out),
            Value::Integer(n) => {
                let _ = write!(out, "{n}");
            }
            Value::Float(n) => match self.style {
                Style::Source => out.push_str(&float_literal(*n)),
                Style::Display => {
                    let _ = write!(out, "{n:?}");
                }
            },
            Value::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            Value::String(s) => match self.style {
                Style::Source => {
                    out.push('"');
                    out.push_str(&escape_string(s));
                    out.push('"');
                }
                Style::Display => out.push_str(s),
            },
            Value::None => {}
        }
    }
}

/// A float literal that lexes back as a float.
fn float_literal(n: f64) -> String {
    if n.is_finite() {
        // Debug keeps the fraction (`1.0`), Display would print `1`.
        format!("{n:?}")
    } else if n.is_nan() {
        // NaN has no literal form.
        "0.0".to_string()
    } else if n > 0.0 {
        "1e999".to_string()
    } else {
        "-1e999".to_string()
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Serializes every top-level group of `container`, one per line.
///
/// Anonymous entries are written before named ones. A top-level group with an
/// empty id cannot be expressed in source and is written as `()`.
pub fn generate(container: &Container) -> String {
    let printer = Printer::source();
    let mut out = String::new();
    for group in container.top_groups() {
        if group.is_array() {
            // Top-level statements always use parentheses.
            out.push_str("()");
        } else {
            printer.print_group(group, &mut out);
        }
        out.push('\n');
    }
    out
}

/// Human-readable text of `data`: strings unquoted, entries comma separated.
pub fn render(data: &Data) -> String {
    Printer::display().print(data)
}

/// Indented trace of a syntax tree.
pub fn dump(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    for statement in &tree.statements {
        dump_statement(statement, 0, &mut out);
    }
    out
}

fn indent(level: usize) -> String {
    "  ".repeat(level)
}

fn dump_statement(node: &StatementNode, level: usize, out: &mut String) {
    if node.is_array() {
        let _ = writeln!(out, "{}Array {{", indent(level));
    } else {
        let _ = writeln!(out, "{}Statement {} {{", indent(level), node.name);
    }
    for data in &node.data {
        dump_data(data, level + 1, out);
    }
    let _ = writeln!(out, "{}}}", indent(level));
}

fn dump_data(node: &DataNode, level: usize, out: &mut String) {
    if node.is_anonymous() {
        let _ = writeln!(out, "{}Data", indent(level));
    } else {
        let _ = writeln!(out, "{}Data :{}", indent(level), node.key);
    }

    let inner = indent(level + 1);
    match &node.value {
        ValueNode::Statement(statement) => dump_statement(statement, level + 1, out),
        ValueNode::Expression(expression) => {
            let _ = writeln!(out, "{inner}Expression {} {{", expression.name);
            for arg in &expression.args {
                dump_data(arg, level + 2, out);
            }
            let _ = writeln!(out, "{inner}}}");
        }
        ValueNode::Integer(n) => {
            let _ = writeln!(out, "{inner}Integer {n}");
        }
        ValueNode::Float(n) => {
            let _ = writeln!(out, "{inner}Float {n:?}");
        }
        ValueNode::String(s) => {
            let _ = writeln!(out, "{inner}String \"{}\"", escape_string(s));
        }
        ValueNode::Boolean(b) => {
            let _ = writeln!(out, "{inner}Bool {b}");
        }
    }
}
