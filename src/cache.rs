use std::cell::{Cell, RefCell};
use std::hash::Hash;

use crate::error::Error;
use crate::hash::{fingerprint, FingerprintMap};
use crate::reflect::Value;
use crate::trace::{trace, View};
use crate::tree::ImprintTree;

/// A memoization cache over one function.
///
/// `query` splits the function's input in two: a *key* part, compared by
/// hash, and a *traced* part, compared by the access imprint the function
/// leaves on it. Two calls share a result when their key parts hash alike
/// and the second call's traced part is compatible with the imprint
/// recorded by the first.
///
/// ```
/// use imprint::{Cache, Primitive, Record, Traced, Value};
///
/// let cache = Cache::new();
/// let mut image = Record::new();
/// image.set("width", 20);
/// image.set("pixels", 800);
///
/// let describe = |image: &Record| {
///     cache
///         .query("describe", Value::Obj(image), |view| {
///             match view.get("width") {
///                 Some(Traced::Prim(Primitive::Int(w))) if w > 50 => "big",
///                 _ => "small",
///             }
///         })
///         .unwrap()
/// };
///
/// assert_eq!(describe(&image), "small");
///
/// // Only `width` was read, so pixel changes still hit.
/// image.set("pixels", 1600);
/// assert_eq!(describe(&image), "small");
/// assert!(imprint::testing::last_was_hit());
/// ```
pub struct Cache<Out> {
    data: RefCell<FingerprintMap<ImprintTree<CacheEntry<Out>>>>,
}

/// A memoized result.
struct CacheEntry<Out> {
    /// The memoized function's output.
    output: Out,
    /// How many evictions have passed since the entry has last been used.
    age: Cell<usize>,
}

impl<Out: Clone> Cache<Out> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self { data: RefCell::new(FingerprintMap::default()) }
    }

    /// Execute `func` or reuse a cached result for it.
    ///
    /// `key` is the hashed part of the input; `target` is the traced part
    /// handed to `func` as a recording [`View`]. Fails with
    /// [`Error::InvalidTarget`] when `target` is a primitive.
    pub fn query<'a, K, F>(&self, key: K, target: Value<'a>, func: F) -> Result<Out, Error>
    where
        K: Hash,
        F: FnOnce(View<'a>) -> Out,
    {
        let obj = match target {
            Value::Obj(obj) => obj,
            Value::Prim(prim) => return Err(Error::InvalidTarget(prim)),
        };
        let key = fingerprint(&key);

        {
            let data = self.data.borrow();
            if let Some(entry) = data.get(&key).and_then(|tree| tree.get(obj)) {
                entry.age.set(0);
                crate::testing::register_hit();
                tracing::trace!("memoized result reused");
                return Ok(entry.output.clone());
            }
        }

        let (view, handle) = trace(Value::Obj(obj))?;
        let output = func(view);
        let imprint = handle.finalize();

        self.data.borrow_mut().entry(key).or_default().insert(
            imprint,
            CacheEntry { output: output.clone(), age: Cell::new(0) },
        );
        crate::testing::register_miss();
        tracing::trace!("memoized result recorded");

        Ok(output)
    }

    /// Evict all entries whose age is larger than or equal to `max_age`.
    ///
    /// The age of an entry grows by one during each eviction and is reset
    /// to zero when the entry produces a hit. `evict(0)` clears the cache.
    pub fn evict(&self, max_age: usize) {
        let mut data = self.data.borrow_mut();
        let before: usize = data.values().map(ImprintTree::len).sum();
        for tree in data.values_mut() {
            tree.retain(|entry| {
                let age = entry.age.get() + 1;
                entry.age.set(age);
                age <= max_age
            });
        }
        data.retain(|_, tree| !tree.is_empty());
        let after: usize = data.values().map(ImprintTree::len).sum();
        tracing::debug!(evicted = before - after, "evicted cache entries");
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.data.borrow().values().map(ImprintTree::len).sum()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.data.borrow().values().all(ImprintTree::is_empty)
    }
}

impl<Out: Clone> Default for Cache<Out> {
    fn default() -> Self {
        Self::new()
    }
}
