use datalisp::logger::{Level, LogRecord, MemoryLogger};
use datalisp::{Container, Data, DataLisp, DataType, Group, Value, Vm};
use pretty_assertions::assert_eq;

fn build(source: &str) -> (Container, MemoryLogger) {
    let logger = MemoryLogger::new();
    let mut container = Container::new();
    {
        let mut dl = DataLisp::new(&logger);
        dl.parse(source).unwrap();
        dl.build(&mut container).unwrap();
    }
    (container, logger)
}

fn build_ok(source: &str) -> Container {
    let (container, logger) = build(source);
    assert_eq!(logger.records(), Vec::<LogRecord>::new(), "Unexpected diagnostics for: {}", source);
    container
}

/// Value of `:v` in the single top-level group.
fn value_of(source: &str) -> (Data, MemoryLogger) {
    let (container, logger) = build(source);
    let data = container.top_groups()[0].get_from_key("v");
    (data, logger)
}

#[test]
fn test_end_to_end_example() {
    let container = build_ok("(test :a 1 :b [2,3] (child :c true))");
    assert_eq!(container.len(), 1);

    let test = &container.top_groups()[0];
    assert_eq!(test.id(), "test");
    assert_eq!(test.named_count(), 2);
    assert_eq!(test.get_from_key("a"), Data::new("a", Value::Integer(1)));

    let b = test.get_from_key("b");
    let b = b.as_group().unwrap();
    assert!(b.is_array());
    assert_eq!(b.anonymous_entries(), vec![Data::integer(2), Data::integer(3)]);

    let child = test.at(0);
    let child = child.as_group().unwrap();
    assert_eq!(child.id(), "child");
    assert_eq!(child.get_from_key("c").as_bool(), Some(true));
}

#[test]
fn test_keyed_nested_group() {
    let container = build_ok("(test :a 1 :c (child :c true))");
    let test = &container.top_groups()[0];
    assert_eq!(test.named_count(), 2);
    let c = test.get_from_key("c");
    assert_eq!(c.as_group().map(Group::id), Some("child".to_string()));
}

// ============================================================================
// Standard library through source
// ============================================================================

#[test]
fn test_if_through_source() {
    let (v, _) = value_of("(g :v $(if true \"yes\" \"no\"))");
    assert_eq!(v.as_str(), Some("yes"));

    let (v, _) = value_of("(g :v $(if false \"yes\" \"no\"))");
    assert_eq!(v.as_str(), Some("no"));

    let (v, logger) = value_of("(g :v $(if false 1))");
    assert!(!v.is_valid());
    assert_eq!(logger.error_count(), 0);
}

#[test]
fn test_if_arity_errors() {
    for source in [
        "(g :v $(if))",
        "(g :v $(if true))",
        "(g :v $(if true 1 2 3))",
    ] {
        let (v, logger) = value_of(source);
        assert!(!v.is_valid(), "Failed for: {}", source);
        assert_eq!(logger.error_count(), 1, "Failed for: {}", source);
    }
}

#[test]
fn test_if_requires_bool() {
    let (v, logger) = value_of("(g :v $(if 1 2 3))");
    assert!(!v.is_valid());
    assert_eq!(
        logger.messages(Level::Error),
        vec!["Condition of 'if' must be 'Bool', got 'Integer'"]
    );
}

#[test]
fn test_and_or_through_source() {
    let (v, _) = value_of("(g :v $(and true 1 false))");
    assert_eq!(v.as_bool(), Some(false));

    let (v, logger) = value_of("(g :v $(or false 0 \"x\"))");
    assert_eq!(v.as_bool(), Some(false));
    assert_eq!(logger.messages(Level::Error), vec!["Can not convert 'String' to 'Bool'"]);
}

#[test]
fn test_broadcast_through_source() {
    let (v, _) = value_of("(g :v $(int 1.5 2.5))");
    let group = v.as_group().unwrap();
    assert_eq!(group.anonymous_entries(), vec![Data::integer(1), Data::integer(2)]);

    let (v, _) = value_of("(g :v $(int 1.5))");
    assert_eq!(v, Data::new("v", Value::Integer(1)));

    let (v, _) = value_of("(g :v $(float true))");
    assert_eq!(v.as_float(), Some(1.0));
}

#[test]
fn test_nested_expressions_through_source() {
    let (v, logger) = value_of("(g :v $(if $(not $(or false false)) [1 2] 0))");
    assert_eq!(logger.error_count(), 0);
    assert_eq!(v.as_group().map(Group::anonymous_count), Some(2));
}

#[test]
fn test_named_and_anonymous_through_source() {
    let (v, _) = value_of("(g :v $(named (x 1 :a 2 :b 3)))");
    let group = v.as_group().unwrap();
    assert_eq!(group.named_count(), 2);
    assert_eq!(group.anonymous_count(), 0);

    let (v, _) = value_of("(g :v $(anonymous (x 1 :a 2) [3]))");
    let group = v.as_group().unwrap();
    assert_eq!(group.anonymous_entries(), vec![Data::integer(1), Data::integer(3)]);
}

#[test]
fn test_union_through_source() {
    let (v, _) = value_of("(g :v $(union [1 2] (x :k true) 3))");
    let group = v.as_group().unwrap();
    assert_eq!(
        group.anonymous_entries(),
        vec![Data::integer(1), Data::integer(2), Data::integer(3)]
    );
    assert_eq!(group.get_from_key("k").as_bool(), Some(true));
}

#[test]
fn test_print_through_source() {
    let (container, logger) = build("(g $(print \"a=\" 1 \", b=\" [true 2.5]) 7)");
    assert_eq!(logger.messages(Level::Info), vec!["a=1, b=[true, 2.5]"]);
    // The print entry itself is dropped.
    assert_eq!(container.top_groups()[0].anonymous_entries(), vec![Data::integer(7)]);
}

#[test]
fn test_unknown_expression_is_dropped() {
    let (container, logger) = build("(g 1 $(nope 2) :k $(nope) 3)");
    let g = &container.top_groups()[0];
    assert_eq!(g.anonymous_entries(), vec![Data::integer(1), Data::integer(3)]);
    assert!(!g.has_key("k"));
    assert_eq!(logger.error_count(), 2);
}

#[test]
fn test_implicit_int_to_float_warns() {
    let logger = MemoryLogger::new();
    let mut dl = DataLisp::new(&logger);
    dl.add_expression("half", |args: &[Data], vm: &mut Vm<'_>| {
        vm.do_element_wise(
            |d, vm| {
                let f = vm.cast_to(d, DataType::Float, false);
                match f.as_float() {
                    Some(n) => Data::float(n / 2.0),
                    None => Data::none(),
                }
            },
            args,
        )
    });
    dl.parse("(g :v $(half 3))").unwrap();
    let mut container = Container::new();
    dl.build(&mut container).unwrap();

    assert_eq!(container.top_groups()[0].get_from_key("v").as_float(), Some(1.5));
    assert_eq!(
        logger.messages(Level::Warning),
        vec!["Implicit conversion from 'Integer' to 'Float'"]
    );
}

#[test]
fn test_host_expression_sees_positions_and_keys() {
    let logger = MemoryLogger::new();
    let mut dl = DataLisp::new(&logger);
    dl.add_expression("describe", |args: &[Data], _vm: &mut Vm<'_>| {
        let keys: Vec<&str> = args.iter().map(Data::key).collect();
        Data::string(keys.join(","))
    });
    dl.parse("(g :v $(describe 1 :a 2 $(missing) :b 3))").unwrap();
    let mut container = Container::new();
    dl.build(&mut container).unwrap();

    // The invalid result of `missing` keeps its slot.
    assert_eq!(container.top_groups()[0].get_from_key("v").as_str(), Some(",a,,b"));
}

// ============================================================================
// Best-effort output
// ============================================================================

#[test]
fn test_partial_output_after_errors() {
    let (container, logger) = build("(a 1 # 2) (b \"open\n) (c 3)");
    assert!(logger.error_count() >= 2);
    let ids: Vec<String> = container.top_groups().iter().map(Group::id).collect();
    assert!(ids.contains(&"a".to_string()));
    assert!(ids.contains(&"c".to_string()));
}

#[test]
fn test_deep_nesting_builds_and_generates() {
    let depth = 5_000;
    let source = format!("(g :deep {}{} :after 2)", "[".repeat(depth), "]".repeat(depth));
    let (container, logger) = build(&source);
    assert_eq!(logger.error_count(), 1);

    let g = &container.top_groups()[0];
    assert_eq!(g.get_from_key("after").as_int(), Some(2));
    assert!(g.get_from_key("deep").as_group().is_some_and(Group::is_array));
    assert!(DataLisp::generate(&container).starts_with("(g :deep [[["));
}

#[test]
fn test_dump_output() {
    let logger = MemoryLogger::new();
    let mut dl = DataLisp::new(&logger);
    dl.parse("(a :k [1])").unwrap();
    let expected = "\
Statement a {
  Data :k
    Array {
      Data
        Integer 1
    }
}
";
    assert_eq!(dl.dump(), expected);
}
