use crate::group::Group;
use crate::value::Data;

/// Top-level groups produced by a build pass.
///
/// The container only holds runtime data; the syntax tree stays with the
/// [`DataLisp`](crate::DataLisp) driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
    top_groups: Vec<Group>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top_groups(&self) -> &[Group] {
        &self.top_groups
    }

    pub fn add_top_group(&mut self, group: Group) {
        self.top_groups.push(group);
    }

    pub fn len(&self) -> usize {
        self.top_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.top_groups.clear();
    }

    /// Every group with `id`, searching nested groups depth-first in entry order.
    pub fn all_groups_with_id(&self, id: &str) -> Vec<Group> {
        let mut found = vec![];
        for group in &self.top_groups {
            collect_groups(group, id, &mut found);
        }
        found
    }

    /// Every named data with `key`, at any depth.
    pub fn all_data_with_key(&self, key: &str) -> Vec<Data> {
        let mut found = vec![];
        for group in &self.top_groups {
            collect_data(group, key, &mut found);
        }
        found
    }
}

fn collect_groups(group: &Group, id: &str, found: &mut Vec<Group>) {
    if group.id() == id {
        found.push(group.clone());
    }
    for entry in group.entries() {
        if let Some(child) = entry.as_group() {
            collect_groups(child, id, found);
        }
    }
}

fn collect_data(group: &Group, key: &str, found: &mut Vec<Data>) {
    for entry in group.entries() {
        if entry.key() == key {
            found.push(entry.clone());
        }
        if let Some(child) = entry.as_group() {
            collect_data(child, key, found);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn sample() -> Container {
        let leaf = Group::new("leaf");
        leaf.add(Data::new("k", Value::Integer(2)));

        let root = Group::new("root");
        root.add(Data::new("k", Value::Integer(1)));
        root.add(Data::group(leaf));

        let other = Group::new("leaf");

        let mut container = Container::new();
        container.add_top_group(root);
        container.add_top_group(other);
        container
    }

    #[test]
    fn test_all_groups_with_id_is_recursive() {
        let container = sample();
        assert_eq!(container.all_groups_with_id("leaf").len(), 2);
        assert_eq!(container.all_groups_with_id("root").len(), 1);
        assert!(container.all_groups_with_id("none").is_empty());
    }

    #[test]
    fn test_all_data_with_key_is_recursive() {
        let container = sample();
        let values: Vec<i64> = container
            .all_data_with_key("k")
            .iter()
            .filter_map(Data::as_int)
            .collect();
        // Anonymous entries are visited before named ones.
        assert_eq!(values, vec![2, 1]);
    }
}
