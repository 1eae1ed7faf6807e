use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Error, Op};
use crate::imprint::{Entry, Imprint};
use crate::key::Key;
use crate::reflect::{CtorRef, Primitive, Reflect, Value};

/// Start tracing accesses to an object.
///
/// Returns a [`View`] that behaves like the target for read-only access
/// while recording every observation, and the [`Trace`] handle whose
/// [`finalize`](Trace::finalize) yields the recorded [`Imprint`].
///
/// Fails with [`Error::InvalidTarget`] when the target is a primitive.
///
/// ```
/// use imprint::{trace, Record, Value};
///
/// let mut point = Record::new();
/// point.set("x", 1);
/// point.set("y", 2);
///
/// let (view, handle) = trace(Value::Obj(&point)).unwrap();
/// view.get("x");
/// let imprint = handle.finalize();
///
/// assert!(imprint.matches(&point));
/// ```
pub fn trace(target: Value<'_>) -> Result<(View<'_>, Trace<'_>), Error> {
    let obj = match target {
        Value::Obj(obj) => obj,
        Value::Prim(prim) => return Err(Error::InvalidTarget(prim)),
    };
    let shared = Rc::new(Shared { enabled: Cell::new(true) });
    let root = Rc::new(TraceNode::new(obj, shared.clone()));
    Ok((View { node: root.clone() }, Trace { root, shared }))
}

/// State shared by every view of one trace.
struct Shared {
    enabled: Cell<bool>,
}

/// A handle on a running trace.
///
/// Dropping it without calling [`finalize`](Self::finalize) leaves the
/// trace's views recording; callers own finalizing every successful path.
pub struct Trace<'a> {
    root: Rc<TraceNode<'a>>,
    shared: Rc<Shared>,
}

impl<'a> Trace<'a> {
    /// The root view of this trace.
    pub fn view(&self) -> View<'a> {
        View { node: self.root.clone() }
    }

    /// Freeze the trace.
    ///
    /// Returns the recorded imprint and permanently disables recording on
    /// the root view and every descendant view. Disabled views keep
    /// forwarding raw values.
    pub fn finalize(self) -> Imprint {
        self.shared.enabled.set(false);
        freeze(&self.root)
    }
}

/// One node of the growing trace, corresponding to one access path.
///
/// The same underlying object reached through two paths gets two nodes:
/// recording is path-sensitive, not object-sensitive.
struct TraceNode<'a> {
    target: &'a dyn Reflect,
    shared: Rc<Shared>,
    /// The constructor observed on the target when this path was first
    /// reached.
    ctor: Option<CtorRef>,
    read: RefCell<HashMap<Key, Recorded<'a>>>,
    has: RefCell<HashMap<Key, bool>>,
    own_keys: RefCell<Option<Vec<Key>>>,
}

enum Recorded<'a> {
    Absent,
    Prim(Primitive),
    Child(Rc<TraceNode<'a>>),
}

impl<'a> TraceNode<'a> {
    fn new(target: &'a dyn Reflect, shared: Rc<Shared>) -> Self {
        Self {
            ctor: target.ctor().map(|c| c.downgrade()),
            target,
            shared,
            read: RefCell::new(HashMap::new()),
            has: RefCell::new(HashMap::new()),
            own_keys: RefCell::new(None),
        }
    }
}

/// Convert a trace node tree into a frozen imprint, draining the nodes.
fn freeze(node: &TraceNode) -> Imprint {
    let read = node
        .read
        .take()
        .into_iter()
        .map(|(key, recorded)| {
            let entry = match recorded {
                Recorded::Absent => Entry::Absent,
                Recorded::Prim(prim) => Entry::Prim(prim),
                Recorded::Child(child) => Entry::Nested(freeze(&child)),
            };
            (key, entry)
        })
        .collect();
    Imprint::from_parts(node.ctor.clone(), read, node.has.take(), node.own_keys.take())
}

/// What a traced property read yields.
pub enum Traced<'a> {
    /// A primitive value.
    Prim(Primitive),
    /// A sub-object, wrapped in a further recording view.
    Obj(View<'a>),
}

impl<'a> Traced<'a> {
    /// The primitive, if this is one.
    pub fn into_prim(self) -> Option<Primitive> {
        match self {
            Self::Prim(prim) => Some(prim),
            Self::Obj(_) => None,
        }
    }

    /// The sub-view, if this is an object.
    pub fn into_view(self) -> Option<View<'a>> {
        match self {
            Self::Prim(_) => None,
            Self::Obj(view) => Some(view),
        }
    }
}

/// A recording stand-in for an object.
///
/// A view forwards [`get`](Self::get), [`has`](Self::has) and
/// [`keys`](Self::keys) to the underlying object and records each
/// observation into its path's trace node. Object reads return further
/// views; reading the same key twice returns the identical view.
#[derive(Clone)]
pub struct View<'a> {
    node: Rc<TraceNode<'a>>,
}

impl<'a> View<'a> {
    /// Read a property.
    ///
    /// A primitive read records the yielded value (re-reading overwrites:
    /// the last observation wins). Reading a missing key records its
    /// absence. An object read allocates a child trace node on first use
    /// and returns the same child view on every subsequent read.
    pub fn get(&self, key: impl Into<Key>) -> Option<Traced<'a>> {
        let key = key.into();

        // Stable identity per path: a key already known to hold an object
        // always resolves to its existing child view.
        if let Some(Recorded::Child(child)) = self.node.read.borrow().get(&key) {
            return Some(Traced::Obj(View { node: child.clone() }));
        }

        let value = self.node.target.get(&key);

        if !self.node.shared.enabled.get() {
            // Finalized: forward without recording.
            return value.map(|value| match value {
                Value::Prim(prim) => Traced::Prim(prim),
                Value::Obj(obj) => Traced::Obj(View {
                    node: Rc::new(TraceNode::new(obj, self.node.shared.clone())),
                }),
            });
        }

        match value {
            None => {
                self.node.read.borrow_mut().insert(key, Recorded::Absent);
                None
            }
            Some(Value::Prim(prim)) => {
                self.node
                    .read
                    .borrow_mut()
                    .insert(key, Recorded::Prim(prim.clone()));
                Some(Traced::Prim(prim))
            }
            Some(Value::Obj(obj)) => {
                let child = Rc::new(TraceNode::new(obj, self.node.shared.clone()));
                self.node
                    .read
                    .borrow_mut()
                    .insert(key, Recorded::Child(child.clone()));
                Some(Traced::Obj(View { node: child }))
            }
        }
    }

    /// Probe a property's existence, recording the observed boolean.
    pub fn has(&self, key: impl Into<Key>) -> bool {
        let key = key.into();
        let result = self.node.target.has(&key);
        if self.node.shared.enabled.get() {
            self.node.has.borrow_mut().insert(key, result);
        }
        result
    }

    /// Enumerate the object's own keys, recording the sequence verbatim.
    pub fn keys(&self) -> Vec<Key> {
        let keys = self.node.target.keys();
        if self.node.shared.enabled.get() {
            *self.node.own_keys.borrow_mut() = Some(keys.clone());
        }
        keys
    }

    /// Whether two views are the same view (same trace node).
    pub fn is_same(&self, other: &View<'a>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Report an operation outside the read surface.
    ///
    /// Views model read-only access only, so write- and
    /// introspection-shaped operations have no methods here. Embeddings
    /// that translate a fuller host object protocol onto views route such
    /// traffic through `deny`, which manufactures the corresponding
    /// [`Error::Unsupported`]. Writes to the inputs of a cached function
    /// are a programming error.
    pub fn deny(&self, op: Op) -> Error {
        Error::Unsupported(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use Primitive;

    #[test]
    fn test_primitive_target_is_rejected() {
        let result = trace(Value::Prim(Primitive::Int(3)));
        assert!(matches!(result, Err(Error::InvalidTarget(_))));
    }

    #[test]
    fn test_last_read_wins() {
        let mut record = Record::new();
        record.set("n", 1);

        let (view, handle) = trace(Value::Obj(&record)).unwrap();
        view.get("n");
        view.get("n");
        let imprint = handle.finalize();
        assert!(imprint.matches(&record));
    }

    #[test]
    fn test_denied_operations() {
        let record = Record::new();
        let (view, _handle) = trace(Value::Obj(&record)).unwrap();
        assert_eq!(view.deny(Op::Set), Error::Unsupported(Op::Set));
        assert_eq!(view.deny(Op::Invoke), Error::Unsupported(Op::Invoke));
    }
}
