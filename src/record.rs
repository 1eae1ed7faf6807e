use std::rc::Rc;

use crate::key::Key;
use crate::reflect::{Ctor, Primitive, Reflect, Value};

/// A concrete dynamic object.
///
/// `Record` is the crate's own [`Reflect`] implementation: an
/// insertion-ordered collection of keyed slots holding primitives or
/// shared sub-records. It exists for embeddings without their own object
/// graph and for tests; hosts with richer models implement [`Reflect`]
/// directly.
///
/// Sub-records are held behind `Rc`, so aliased graphs (the same object
/// reachable through several keys) can be expressed:
///
/// ```
/// use std::rc::Rc;
/// use imprint::Record;
///
/// let mut shared = Record::new();
/// shared.set("x", 1);
///
/// let shared = Rc::new(shared);
/// let mut root = Record::new();
/// root.set("p", shared.clone());
/// root.set("q", shared);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Record {
    ctor: Option<Ctor>,
    slots: Vec<(Key, Slot)>,
}

/// A slot in a record.
#[derive(Debug, Clone)]
pub enum Slot {
    /// A primitive value.
    Prim(Primitive),
    /// A shared sub-record.
    Obj(Rc<Record>),
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty record carrying a constructor identity.
    pub fn with_ctor(ctor: Ctor) -> Self {
        Self { ctor: Some(ctor), slots: Vec::new() }
    }

    /// Set a slot, appending the key to the enumeration order on first
    /// insertion and keeping its position on overwrite.
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Slot>) {
        let key = key.into();
        let value = value.into();
        match self.slots.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.slots.push((key, value)),
        }
    }

    /// Remove a slot.
    pub fn remove(&mut self, key: &Key) -> Option<Slot> {
        let index = self.slots.iter().position(|(k, _)| k == key)?;
        Some(self.slots.remove(index).1)
    }
}

impl Reflect for Record {
    fn get(&self, key: &Key) -> Option<Value<'_>> {
        self.slots.iter().find(|(k, _)| k == key).map(|(_, slot)| match slot {
            Slot::Prim(prim) => Value::Prim(prim.clone()),
            Slot::Obj(record) => Value::Obj(&**record),
        })
    }

    fn has(&self, key: &Key) -> bool {
        self.slots.iter().any(|(k, _)| k == key)
    }

    fn keys(&self) -> Vec<Key> {
        self.slots.iter().map(|(k, _)| k.clone()).collect()
    }

    fn ctor(&self) -> Option<Ctor> {
        self.ctor.clone()
    }
}

impl From<Record> for Slot {
    fn from(record: Record) -> Self {
        Self::Obj(Rc::new(record))
    }
}

impl From<Rc<Record>> for Slot {
    fn from(record: Rc<Record>) -> Self {
        Self::Obj(record)
    }
}

impl From<Primitive> for Slot {
    fn from(prim: Primitive) -> Self {
        Self::Prim(prim)
    }
}

macro_rules! prim_slot {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Slot {
            fn from(value: $ty) -> Self {
                Self::Prim(value.into())
            }
        })*
    };
}

prim_slot! { bool, i32, i64, f64, &str, String }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order_is_insertion_order() {
        let mut record = Record::new();
        record.set("b", 1);
        record.set("a", 2);
        record.set("c", 3);
        record.set("a", 4);
        assert_eq!(record.keys(), vec!["b".into(), "a".into(), "c".into()]);
    }

    #[test]
    fn test_get_and_has() {
        let mut inner = Record::new();
        inner.set("d", 1);

        let mut record = Record::new();
        record.set("b", true);
        record.set("c", inner);

        assert!(record.has(&"b".into()));
        assert!(!record.has(&"x".into()));
        assert!(matches!(
            record.get(&"b".into()),
            Some(Value::Prim(Primitive::Bool(true)))
        ));
        match record.get(&"c".into()) {
            Some(Value::Obj(obj)) => assert!(obj.has(&"d".into())),
            _ => panic!("expected a sub-record"),
        }
        assert!(record.get(&"x".into()).is_none());
    }
}
