use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use crate::key::Key;

/// The capability interface the tracer requires of its inputs.
///
/// An implementor exposes a read-only object protocol: property lookup,
/// existence probing and own-key enumeration. The engine observes inputs
/// exclusively through this trait, so anything that can answer these three
/// questions can be traced, matched and cached.
pub trait Reflect {
    /// The value of a property, if present.
    fn get(&self, key: &Key) -> Option<Value<'_>>;

    /// Whether a property exists.
    fn has(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// The object's own keys, in its stable enumeration order.
    fn keys(&self) -> Vec<Key>;

    /// The constructor identity of this object, if it exposes one.
    fn ctor(&self) -> Option<Ctor> {
        None
    }
}

/// What a property read yields.
#[derive(Clone)]
pub enum Value<'a> {
    /// A primitive value.
    Prim(Primitive),
    /// A further reflectable object.
    Obj(&'a dyn Reflect),
}

impl Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prim(prim) => prim.fmt(f),
            Self::Obj(_) => f.write_str("Obj(..)"),
        }
    }
}

/// A primitive value observed through the capability interface.
///
/// Equality is host equality: `Float` compares by `f64` semantics, so a
/// recorded `NaN` never compares equal. There is deliberately no `Eq`.
#[derive(Clone, PartialEq)]
pub enum Primitive {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    Str(Rc<str>),
}

impl Primitive {
    /// Create a string primitive.
    pub fn str(value: impl Into<Rc<str>>) -> Self {
        Self::Str(value.into())
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Primitive {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => v.fmt(f),
            Self::Int(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Str(v) => v.fmt(f),
        }
    }
}

/// A process-stable constructor identity.
///
/// Objects that share a "class" expose clones of the same `Ctor`; equality
/// is pointer identity, so two independently created ctors are never equal
/// even if their names coincide. Imprints hold only weak [`CtorRef`]s to
/// it, so caching a type never extends its lifetime.
#[derive(Clone)]
pub struct Ctor(Rc<str>);

impl Ctor {
    /// Create a fresh constructor identity.
    pub fn new(name: impl Into<Rc<str>>) -> Self {
        Self(name.into())
    }

    /// The constructor's name, for diagnostics only.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Create a weak handle to this constructor.
    pub fn downgrade(&self) -> CtorRef {
        CtorRef(Rc::downgrade(&self.0))
    }
}

impl PartialEq for Ctor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Ctor {}

impl Debug for Ctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ctor({})", self.0)
    }
}

/// A weak handle to a constructor identity.
///
/// A dead handle (all strong [`Ctor`]s dropped) is treated as absent
/// wherever it occurs: the matcher skips it and splitting drops it.
#[derive(Clone)]
pub struct CtorRef(Weak<str>);

impl CtorRef {
    /// The constructor, if it is still alive.
    pub fn upgrade(&self) -> Option<Ctor> {
        self.0.upgrade().map(Ctor)
    }
}

impl PartialEq for CtorRef {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for CtorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.upgrade() {
            Some(name) => write!(f, "CtorRef({name})"),
            None => f.write_str("CtorRef(<dead>)"),
        }
    }
}
