//! Memoization keyed by recorded property-access imprints.
//!
//! Most caches key a memoized function by its arguments. This crate keys
//! it by how the function *used* its arguments: the first evaluation runs
//! against a recording [`View`] of the input, and every property read,
//! existence probe and key enumeration is captured into an [`Imprint`].
//! A later call reuses the result when its input is compatible with a
//! recorded imprint, meaning that replaying the same observations would
//! produce the same outcome, no matter how the rest of the input changed.
//!
//! Three pieces cooperate:
//!
//! - the tracer ([`trace`]) wraps an input object in views and freezes
//!   the observations into an imprint;
//! - the matcher ([`Imprint::matches`]) decides whether a fresh input is
//!   compatible with an imprint;
//! - the [`ImprintTree`] stores many imprints with their values, splitting
//!   them into shared prefixes so lookup walks overlapping observations
//!   only once.
//!
//! [`Cache`] composes the three into a ready-made memoization layer.
//! Inputs are anything implementing the small [`Reflect`] capability
//! interface; [`Record`] is a ready-made dynamic object for embeddings
//! without their own object graph.
//!
//! ```
//! use imprint::{trace, ImprintTree, Record, Value};
//!
//! let mut config = Record::new();
//! config.set("dpi", 96);
//! config.set("theme", "dark");
//!
//! // Trace a computation that only depends on `dpi`.
//! let (view, handle) = trace(Value::Obj(&config)).unwrap();
//! view.get("dpi");
//! let imprint = handle.finalize();
//!
//! let mut tree = ImprintTree::new();
//! tree.insert(imprint, "96 dots per inch");
//!
//! // A different theme still matches; a different dpi does not.
//! config.set("theme", "light");
//! assert_eq!(tree.get(&config), Some(&"96 dots per inch"));
//! config.set("dpi", 120);
//! assert_eq!(tree.get(&config), None);
//! ```

pub mod testing;

mod cache;
mod error;
mod hash;
mod imprint;
mod key;
mod record;
mod reflect;
mod trace;
mod tree;

pub use crate::cache::Cache;
pub use crate::error::{Error, Op};
pub use crate::imprint::Imprint;
pub use crate::key::{Key, Symbol};
pub use crate::record::{Record, Slot};
pub use crate::reflect::{Ctor, CtorRef, Primitive, Reflect, Value};
pub use crate::trace::{trace, Trace, Traced, View};
pub use crate::tree::ImprintTree;
