//! JSON <-> DataLisp container conversion

use serde_json::{Map, Number, Value as JsonValue};

use crate::{
    logger::{Level, SourceLogger},
    output::{is_valid_id, is_valid_key},
    Container, Data, Group, Value,
};

/// Object key holding a group's id.
pub const ID_KEY: &str = "__id__";

/// Id given to imported objects without an [`ID_KEY`].
pub const UNKNOWN_ID: &str = "__unknown__";

/// Convert a container to a JSON object keyed by top-level group id.
///
/// Groups become objects holding their named entries, their anonymous entries
/// under `"0"`, `"1"`, ... and their id under [`ID_KEY`]. Arrays without named
/// entries become JSON arrays. When keys collide the last entry wins.
pub fn container_to_json(container: &Container) -> JsonValue {
    let mut root = Map::new();
    for group in container.top_groups() {
        root.insert(group.id(), group_to_json(group));
    }
    JsonValue::Object(root)
}

fn group_to_json(group: &Group) -> JsonValue {
    if group.is_array() && group.named_count() == 0 {
        return JsonValue::Array(group.anonymous_entries().iter().map(data_to_json).collect());
    }

    let mut object = Map::new();
    for entry in group.named_entries() {
        object.insert(entry.key().to_string(), data_to_json(&entry));
    }
    for (index, entry) in group.anonymous_entries().iter().enumerate() {
        object.insert(index.to_string(), data_to_json(entry));
    }
    object.insert(ID_KEY.to_string(), JsonValue::String(group.id()));
    JsonValue::Object(object)
}

fn data_to_json(data: &Data) -> JsonValue {
    match data.value() {
        Value::Group(g) => group_to_json(g),
        Value::Integer(n) => JsonValue::Number((*n).into()),
        Value::Float(n) => Number::from_f64(*n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::None => JsonValue::Null,
    }
}

/// Convert a JSON object to a container, one top-level group per key.
///
/// Nested objects take their id from [`ID_KEY`] or fall back to
/// [`UNKNOWN_ID`]; arrays become arrays. Nulls are dropped with a warning.
/// Keys that can not be written in DataLisp are logged as errors and skipped.
pub fn json_to_container(json: &JsonValue, logger: &dyn SourceLogger) -> Container {
    let mut container = Container::new();

    let JsonValue::Object(root) = json else {
        logger.log(Level::Error, "Top-level JSON value must be an object");
        return container;
    };

    for (id, value) in root {
        if !is_valid_id(id) {
            logger.log(Level::Error, &format!("Invalid group id '{id}'"));
            continue;
        }

        let group = match value {
            JsonValue::Object(object) => object_to_group(object, logger),
            JsonValue::Array(items) => array_to_group(items, logger),
            other => {
                logger.log(
                    Level::Error,
                    &format!("Top-level entry '{id}' must be an object, got {}", json_kind(other)),
                );
                continue;
            }
        };
        group.set_id(id.as_str());
        container.add_top_group(group);
    }

    tracing::debug!(top_groups = container.len(), "imported JSON");
    container
}

fn object_to_group(object: &Map<String, JsonValue>, logger: &dyn SourceLogger) -> Group {
    let id = match object.get(ID_KEY) {
        None => UNKNOWN_ID.to_string(),
        Some(JsonValue::String(id)) if id.is_empty() || is_valid_id(id) => id.clone(),
        Some(other) => {
            logger.log(
                Level::Error,
                &format!("Invalid value for '{ID_KEY}': {other}"),
            );
            UNKNOWN_ID.to_string()
        }
    };

    let group = Group::new(id);
    for (key, value) in object {
        if key == ID_KEY {
            continue;
        }
        if !is_valid_key(key) {
            logger.log(Level::Error, &format!("Invalid key '{key}'"));
            continue;
        }
        if let Some(data) = json_to_data(value, logger) {
            group.add(data.with_key(key.as_str()));
        }
    }
    group
}

fn array_to_group(items: &[JsonValue], logger: &dyn SourceLogger) -> Group {
    let group = Group::array();
    for item in items {
        if let Some(data) = json_to_data(item, logger) {
            group.add(data);
        }
    }
    group
}

fn json_to_data(value: &JsonValue, logger: &dyn SourceLogger) -> Option<Data> {
    let value = match value {
        JsonValue::Null => {
            logger.log(Level::Warning, "Ignoring null value");
            return None;
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => Value::Float(n.as_f64()?),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::Group(array_to_group(items, logger)),
        JsonValue::Object(object) => Value::Group(object_to_group(object, logger)),
    };
    Some(Data::anonymous(value))
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
