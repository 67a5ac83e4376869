use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::value::{Data, DataType};

#[derive(Clone, Default)]
struct GroupData {
    id: String,
    anonymous: Vec<Data>,
    named: Vec<Data>,
}

/// Handle to a group of anonymous and named entries.
///
/// Cloning a `Group` does not copy its entries: the clone aliases the same
/// storage and every mutation is visible through all handles. Call
/// [`make_unique`](Group::make_unique) to detach a handle onto a private copy.
/// Groups are single-threaded; handles are neither `Send` nor `Sync`.
///
/// A group with an empty id is an array.
///
/// # Examples
///
/// ```
/// use datalisp::{Data, Group};
///
/// let g1 = Group::new("config");
/// let g2 = g1.clone();
/// g2.add(Data::integer(1));
/// assert_eq!(g1.anonymous_count(), 1);
///
/// let mut g1 = g1;
/// g1.make_unique();
/// g2.add(Data::integer(2));
/// assert_eq!(g1.anonymous_count(), 1);
/// assert_eq!(g2.anonymous_count(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Group {
    shared: Rc<RefCell<GroupData>>,
}

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Group {
            shared: Rc::new(RefCell::new(GroupData {
                id: id.into(),
                ..GroupData::default()
            })),
        }
    }

    /// A new, empty array (a group with an empty id).
    pub fn array() -> Self {
        Self::default()
    }

    pub fn id(&self) -> String {
        self.shared.borrow().id.clone()
    }

    pub fn set_id(&self, id: impl Into<String>) {
        self.shared.borrow_mut().id = id.into();
    }

    pub fn is_array(&self) -> bool {
        self.shared.borrow().id.is_empty()
    }

    /// Number of handles sharing this group's storage.
    pub fn reference_count(&self) -> usize {
        Rc::strong_count(&self.shared)
    }

    /// True when both handles alias the same storage.
    pub fn ptr_eq(&self, other: &Group) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Detaches this handle onto a private copy if the storage is shared.
    ///
    /// The copy is shallow: nested groups stay shared with the original.
    pub fn make_unique(&mut self) {
        if Rc::strong_count(&self.shared) == 1 {
            return;
        }
        let copy = self.shared.borrow().clone();
        self.shared = Rc::new(RefCell::new(copy));
    }

    /// Appends `data` to the anonymous or named entries depending on its key.
    ///
    /// Invalid data is ignored.
    pub fn add(&self, data: Data) {
        if !data.is_valid() {
            return;
        }

        let mut inner = self.shared.borrow_mut();
        if data.is_anonymous() {
            inner.anonymous.push(data);
        } else {
            inner.named.push(data);
        }
    }

    /// Anonymous entry at `index`, or invalid data when out of range.
    pub fn at(&self, index: usize) -> Data {
        self.shared
            .borrow()
            .anonymous
            .get(index)
            .cloned()
            .unwrap_or_default()
    }

    pub fn anonymous_count(&self) -> usize {
        self.shared.borrow().anonymous.len()
    }

    pub fn named_count(&self) -> usize {
        self.shared.borrow().named.len()
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.shared.borrow();
        inner.anonymous.is_empty() && inner.named.is_empty()
    }

    /// First named entry with `key`, or invalid data.
    pub fn get_from_key(&self, key: &str) -> Data {
        self.shared
            .borrow()
            .named
            .iter()
            .find(|d| d.key() == key)
            .cloned()
            .unwrap_or_default()
    }

    /// Every named entry with `key`, in insertion order.
    pub fn get_all_from_key(&self, key: &str) -> Vec<Data> {
        self.shared
            .borrow()
            .named
            .iter()
            .filter(|d| d.key() == key)
            .cloned()
            .collect()
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.shared.borrow().named.iter().any(|d| d.key() == key)
    }

    pub fn named_entries(&self) -> Vec<Data> {
        self.shared.borrow().named.clone()
    }

    pub fn anonymous_entries(&self) -> Vec<Data> {
        self.shared.borrow().anonymous.clone()
    }

    /// Anonymous entries followed by named entries.
    pub fn entries(&self) -> Vec<Data> {
        let inner = self.shared.borrow();
        inner.anonymous.iter().chain(inner.named.iter()).cloned().collect()
    }

    /// True when the group has entries and all of them are numbers.
    pub fn is_all_number(&self) -> bool {
        let inner = self.shared.borrow();
        all_match(inner.anonymous.iter().chain(inner.named.iter()), Data::is_number)
    }

    pub fn is_all_anonymous_number(&self) -> bool {
        all_match(self.shared.borrow().anonymous.iter(), Data::is_number)
    }

    pub fn is_all_named_number(&self) -> bool {
        all_match(self.shared.borrow().named.iter(), Data::is_number)
    }

    /// True when the group has entries and all of them are of `ty`.
    pub fn is_all_of_type(&self, ty: DataType) -> bool {
        let inner = self.shared.borrow();
        all_match(inner.anonymous.iter().chain(inner.named.iter()), |d| {
            d.data_type() == ty
        })
    }

    pub fn is_all_anonymous_of_type(&self, ty: DataType) -> bool {
        all_match(self.shared.borrow().anonymous.iter(), |d| d.data_type() == ty)
    }

    pub fn is_all_named_of_type(&self, ty: DataType) -> bool {
        all_match(self.shared.borrow().named.iter(), |d| d.data_type() == ty)
    }
}

/// Like `Iterator::all`, but false for an empty sequence.
fn all_match<'d>(entries: impl Iterator<Item = &'d Data>, pred: impl Fn(&Data) -> bool) -> bool {
    let mut any = false;
    for data in entries {
        if !pred(data) {
            return false;
        }
        any = true;
    }
    any
}

/// Structural equality: same id and equal entries in the same order.
impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let a = self.shared.borrow();
        let b = other.shared.borrow();
        a.id == b.id && a.anonymous == b.anonymous && a.named == b.named
    }
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.borrow();
        f.debug_struct("Group")
            .field("id", &inner.id)
            .field("anonymous", &inner.anonymous)
            .field("named", &inner.named)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_split_by_key() {
        let g = Group::new("g");
        g.add(Data::integer(1));
        g.add(Data::new("a", Value::Integer(2)));
        g.add(Data::none());
        g.add(Data::integer(3));

        assert_eq!(g.anonymous_count(), 2);
        assert_eq!(g.named_count(), 1);
        assert_eq!(g.at(1).as_int(), Some(3));
        assert!(!g.at(2).is_valid());
        assert_eq!(g.get_from_key("a").as_int(), Some(2));
        assert!(!g.get_from_key("b").is_valid());
    }

    #[test]
    fn test_entries_order() {
        let g = Group::array();
        g.add(Data::new("k", Value::Bool(true)));
        g.add(Data::integer(1));
        let keys: Vec<String> = g.entries().iter().map(|d| d.key().to_string()).collect();
        assert_eq!(keys, vec!["".to_string(), "k".to_string()]);
    }

    #[test]
    fn test_empty_group_is_not_all_number() {
        let g = Group::new("empty");
        assert!(!g.is_all_number());
        assert!(!g.is_all_of_type(DataType::Bool));
        assert!(!g.is_all_anonymous_number());
        assert!(!g.is_all_named_of_type(DataType::Integer));
    }

    #[test]
    fn test_all_number() {
        let g = Group::array();
        g.add(Data::integer(1));
        g.add(Data::float(2.5));
        assert!(g.is_all_number());
        assert!(g.is_all_anonymous_number());
        assert!(!g.is_all_named_number());
        assert!(!g.is_all_of_type(DataType::Integer));

        g.add(Data::new("s", Value::String("x".into())));
        assert!(!g.is_all_number());
    }

    #[test]
    fn test_reference_count_and_make_unique() {
        let mut a = Group::new("a");
        assert_eq!(a.reference_count(), 1);
        let b = a.clone();
        assert_eq!(a.reference_count(), 2);
        assert!(a.ptr_eq(&b));

        a.make_unique();
        assert_eq!(a.reference_count(), 1);
        assert_eq!(b.reference_count(), 1);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_make_unique_is_shallow() {
        let inner = Group::new("inner");
        let mut outer = Group::new("outer");
        outer.add(Data::group(inner.clone()));
        let alias = outer.clone();

        outer.make_unique();
        inner.add(Data::integer(7));

        let seen = outer.at(0);
        assert_eq!(seen.as_group().map(Group::anonymous_count), Some(1));
        assert_eq!(alias.anonymous_count(), 1);
    }
}
