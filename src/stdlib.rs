//! Built-in expressions.
//!
//! | Name | Behavior |
//! |------|----------|
//! | `if` | `$(if cond then [else])`, `cond` must be a Bool |
//! | `not` | element-wise boolean negation |
//! | `and`, `or` | short-circuiting over implicit Bool casts |
//! | `union` | merges groups and loose values into one array |
//! | `named`, `anonymous` | keep one kind of entry from the union of the arguments |
//! | `bool`, `int`, `float` | element-wise explicit casts |
//! | `print` | logs the rendered arguments at Info level |
//!
//! Every expression reports misuse through the VM's logger and returns
//! invalid data, so the entry disappears from the enclosing group.

use crate::{
    evaluator::{ExpressionRegistry, Vm},
    group::Group,
    logger::Level,
    output,
    value::{Data, DataType},
};

/// Registers every built-in expression into `registry`.
pub fn register(registry: &mut ExpressionRegistry) {
    registry.add("if", expr_if);
    registry.add("not", expr_not);
    registry.add("and", expr_and);
    registry.add("or", expr_or);
    registry.add("union", expr_union);
    registry.add("named", expr_named);
    registry.add("anonymous", expr_anonymous);
    registry.add("print", expr_print);
    registry.add("bool", expr_bool);
    registry.add("int", expr_int);
    registry.add("float", expr_float);
}

pub fn expr_if(args: &[Data], vm: &mut Vm<'_>) -> Data {
    if !(2..=3).contains(&args.len()) {
        vm.logger()
            .log(Level::Error, "Invalid number of arguments given to 'if'");
        return Data::none();
    }

    let Some(condition) = args[0].as_bool() else {
        vm.logger().log(
            Level::Error,
            &format!("Condition of 'if' must be 'Bool', got '{}'", args[0].data_type()),
        );
        return Data::none();
    };

    if condition {
        args[1].clone()
    } else {
        args.get(2).cloned().unwrap_or_default()
    }
}

pub fn expr_not(args: &[Data], vm: &mut Vm<'_>) -> Data {
    vm.do_element_wise(
        |data, vm| {
            let mut result = vm.cast_to(data, DataType::Bool, false);
            if let Some(b) = result.as_bool() {
                result.set_bool(!b);
            }
            result
        },
        args,
    )
}

pub fn expr_and(args: &[Data], vm: &mut Vm<'_>) -> Data {
    match args {
        [] => Data::none(),
        [single] => vm.cast_to(single, DataType::Bool, false),
        _ => {
            for arg in args {
                if vm.cast_to(arg, DataType::Bool, false).as_bool() != Some(true) {
                    return Data::boolean(false);
                }
            }
            Data::boolean(true)
        }
    }
}

pub fn expr_or(args: &[Data], vm: &mut Vm<'_>) -> Data {
    match args {
        [] => Data::none(),
        [single] => vm.cast_to(single, DataType::Bool, false),
        _ => {
            for arg in args {
                if vm.cast_to(arg, DataType::Bool, false).as_bool() == Some(true) {
                    return Data::boolean(true);
                }
            }
            Data::boolean(false)
        }
    }
}

/// A single argument is returned as is. Otherwise group arguments contribute
/// their named then anonymous entries and other values are added directly.
pub fn expr_union(args: &[Data], _vm: &mut Vm<'_>) -> Data {
    match args {
        [] => Data::none(),
        [single] => single.clone(),
        _ => {
            let group = Group::array();
            for arg in args {
                match arg.as_group() {
                    Some(g) => {
                        for entry in g.named_entries() {
                            group.add(entry);
                        }
                        for entry in g.anonymous_entries() {
                            group.add(entry);
                        }
                    }
                    None => group.add(arg.clone()),
                }
            }
            Data::group(group)
        }
    }
}

pub fn expr_named(args: &[Data], vm: &mut Vm<'_>) -> Data {
    filter_union(args, vm, Group::named_entries)
}

pub fn expr_anonymous(args: &[Data], vm: &mut Vm<'_>) -> Data {
    filter_union(args, vm, Group::anonymous_entries)
}

fn filter_union(args: &[Data], vm: &mut Vm<'_>, select: fn(&Group) -> Vec<Data>) -> Data {
    let merged = expr_union(args, vm);
    let Some(source) = merged.as_group() else {
        return Data::none();
    };

    let entries = select(source);
    if entries.is_empty() {
        return Data::none();
    }

    let group = Group::array();
    for entry in entries {
        group.add(entry);
    }
    Data::group(group)
}

pub fn expr_print(args: &[Data], vm: &mut Vm<'_>) -> Data {
    let text: String = args.iter().map(output::render).collect();
    vm.logger().log(Level::Info, &text);
    Data::none()
}

pub fn expr_bool(args: &[Data], vm: &mut Vm<'_>) -> Data {
    vm.do_element_wise(|data, vm| vm.cast_to(data, DataType::Bool, true), args)
}

pub fn expr_int(args: &[Data], vm: &mut Vm<'_>) -> Data {
    vm.do_element_wise(|data, vm| vm.cast_to(data, DataType::Integer, true), args)
}

pub fn expr_float(args: &[Data], vm: &mut Vm<'_>) -> Data {
    vm.do_element_wise(|data, vm| vm.cast_to(data, DataType::Float, true), args)
}
