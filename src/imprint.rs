use std::collections::HashMap;
use std::fmt::{self, Debug};

use crate::key::Key;
use crate::reflect::{CtorRef, Primitive, Reflect, Value};

/// The recorded set of property-access observations made against a single
/// object during a single trace.
///
/// An imprint describes a pattern, not a value: which keys were read and
/// what they yielded, which existence probes were taken, and whether the
/// full own-key enumeration was observed. An object is *compatible* with
/// an imprint when replaying every observation against it reproduces the
/// recorded outcome; see [`Imprint::matches`].
///
/// Imprints are produced by [`Trace::finalize`](crate::Trace::finalize)
/// and consumed by [`ImprintTree::insert`](crate::ImprintTree::insert);
/// they are never mutated in between.
#[derive(Clone, Default, PartialEq)]
pub struct Imprint {
    /// Weak handle to the constructor observed at record time. Used as a
    /// cheap pre-filter; a dead handle is treated as absent.
    pub(crate) ctor: Option<CtorRef>,
    /// Observations from property reads.
    pub(crate) read: HashMap<Key, Entry>,
    /// Observations from existence probes.
    pub(crate) has: HashMap<Key, bool>,
    /// The own-key sequence, if an enumeration was observed. Verbatim, in
    /// the order the host produced it.
    pub(crate) own_keys: Option<Vec<Key>>,
}

/// A single read observation.
#[derive(Clone, PartialEq)]
pub(crate) enum Entry {
    /// The key was read and was not present.
    Absent,
    /// The key was read and yielded this primitive.
    Prim(Primitive),
    /// The key was read and yielded an object, against which the nested
    /// observations were made.
    Nested(Imprint),
}

impl Imprint {
    pub(crate) fn from_parts(
        ctor: Option<CtorRef>,
        read: HashMap<Key, Entry>,
        has: HashMap<Key, bool>,
        own_keys: Option<Vec<Key>>,
    ) -> Self {
        Self { ctor, read, has, own_keys }
    }

    /// Whether this imprint records no observations at all.
    ///
    /// An empty imprint matches every object.
    pub fn is_empty(&self) -> bool {
        self.ctor.is_none()
            && self.read.is_empty()
            && self.has.is_empty()
            && self.own_keys.is_none()
    }

    /// Whether an object is compatible with this imprint.
    ///
    /// Replays every recorded observation against `obj` and requires the
    /// recorded outcome, short-circuiting on the first divergence. A live
    /// ctor handle must dereference to the identical constructor; a dead
    /// one is skipped, so matching never fails merely because a class was
    /// dropped.
    pub fn matches(&self, obj: &dyn Reflect) -> bool {
        if let Some(ctor) = &self.ctor {
            if let Some(expected) = ctor.upgrade() {
                if obj.ctor() != Some(expected) {
                    return false;
                }
            }
        }

        for (key, &expected) in &self.has {
            if obj.has(key) != expected {
                return false;
            }
        }

        if let Some(own_keys) = &self.own_keys {
            if obj.keys() != *own_keys {
                return false;
            }
        }

        for (key, expected) in &self.read {
            let actual = obj.get(key);
            let ok = match (expected, actual) {
                (Entry::Absent, None) => true,
                (Entry::Prim(p), Some(Value::Prim(q))) => *p == q,
                (Entry::Nested(sub), Some(Value::Obj(inner))) => sub.matches(inner),
                _ => false,
            };
            if !ok {
                return false;
            }
        }

        true
    }

    /// Layer a more specific imprint onto this one.
    ///
    /// This is the union that undoes [`split`]: merging the intersection
    /// with a remainder reconstitutes the original imprint. On the rare
    /// overlaps (nested reads), `other` wins.
    pub(crate) fn merge(&mut self, other: Imprint) {
        if other.ctor.is_some() {
            self.ctor = other.ctor;
        }
        if other.own_keys.is_some() {
            self.own_keys = other.own_keys;
        }
        self.has.extend(other.has);
        for (key, entry) in other.read {
            match (self.read.remove(&key), entry) {
                (Some(Entry::Nested(mut mine)), Entry::Nested(theirs)) => {
                    mine.merge(theirs);
                    self.read.insert(key, Entry::Nested(mine));
                }
                (_, entry) => {
                    self.read.insert(key, entry);
                }
            }
        }
    }
}

impl Debug for Imprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_struct("Imprint");
        if let Some(ctor) = &self.ctor {
            map.field("ctor", ctor);
        }
        if !self.read.is_empty() {
            map.field("read", &self.read);
        }
        if !self.has.is_empty() {
            map.field("has", &self.has);
        }
        if let Some(own_keys) = &self.own_keys {
            map.field("own_keys", own_keys);
        }
        map.finish()
    }
}

impl Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Prim(prim) => prim.fmt(f),
            Self::Nested(imprint) => imprint.fmt(f),
        }
    }
}

/// The three-way partition of two imprints.
///
/// `shared` holds the observations both sides agree on, `left` and
/// `right` what remains of each. Empty parts are `None`, so a `shared`
/// of `None` means the two imprints have no overlap at all.
pub(crate) struct Split {
    pub shared: Option<Imprint>,
    pub left: Option<Imprint>,
    pub right: Option<Imprint>,
}

/// Partition two imprints into intersection and remainders.
///
/// Recombining `shared ∪ left` yields `a` and `shared ∪ right` yields
/// `b` (up to dead ctor handles, which are dropped from all outputs).
pub(crate) fn split(a: Imprint, b: Imprint) -> Split {
    let mut shared = Imprint::default();
    let mut left = Imprint::default();
    let mut right = Imprint::default();

    // A dead handle on either side is treated as absent, so it neither
    // contributes to the intersection nor blocks it.
    let a_ctor = a.ctor.filter(|c| c.upgrade().is_some());
    let b_ctor = b.ctor.filter(|c| c.upgrade().is_some());
    match (a_ctor, b_ctor) {
        (Some(x), Some(y)) if x == y => shared.ctor = Some(x),
        (x, y) => {
            left.ctor = x;
            right.ctor = y;
        }
    }

    // Own-key sequences are atomic: identical sequences intersect, any
    // difference keeps both verbatim.
    match (a.own_keys, b.own_keys) {
        (Some(x), Some(y)) if x == y => shared.own_keys = Some(x),
        (x, y) => {
            left.own_keys = x;
            right.own_keys = y;
        }
    }

    let mut b_has = b.has;
    for (key, a_bool) in a.has {
        match b_has.remove(&key) {
            Some(b_bool) if a_bool == b_bool => {
                shared.has.insert(key, a_bool);
            }
            Some(b_bool) => {
                left.has.insert(key.clone(), a_bool);
                right.has.insert(key, b_bool);
            }
            None => {
                left.has.insert(key, a_bool);
            }
        }
    }
    right.has.extend(b_has);

    let mut b_read = b.read;
    for (key, a_entry) in a.read {
        let Some(b_entry) = b_read.remove(&key) else {
            left.read.insert(key, a_entry);
            continue;
        };
        match (a_entry, b_entry) {
            (Entry::Absent, Entry::Absent) => {
                shared.read.insert(key, Entry::Absent);
            }
            (Entry::Prim(p), Entry::Prim(q)) if p == q => {
                shared.read.insert(key, Entry::Prim(p));
            }
            (Entry::Nested(x), Entry::Nested(y)) => {
                // Both sides observed an object under this key; that fact
                // itself is shared even when the sub-observations are not.
                let sub = split(x, y);
                shared
                    .read
                    .insert(key.clone(), Entry::Nested(sub.shared.unwrap_or_default()));
                if let Some(l) = sub.left {
                    left.read.insert(key.clone(), Entry::Nested(l));
                }
                if let Some(r) = sub.right {
                    right.read.insert(key, Entry::Nested(r));
                }
            }
            (a_entry, b_entry) => {
                left.read.insert(key.clone(), a_entry);
                right.read.insert(key, b_entry);
            }
        }
    }
    right.read.extend(b_read);

    Split {
        shared: Some(shared).filter(|i| !i.is_empty()),
        left: Some(left).filter(|i| !i.is_empty()),
        right: Some(right).filter(|i| !i.is_empty()),
    }
}
