use std::fmt::{self, Display};

use thiserror::Error;

use crate::reflect::Primitive;

/// An error raised by the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The traced target was a primitive, not an object. Misuse.
    #[error("cannot trace a primitive target: {0:?}")]
    InvalidTarget(Primitive),
    /// An operation outside the read surface reached a view. Misuse.
    #[error("views do not support {0}")]
    Unsupported(Op),
    /// No stored entry is compatible with the probed input.
    ///
    /// This is normal control flow for a caching layer, which translates
    /// it into a miss and recomputes under tracing.
    #[error("no entry matches the probed input")]
    NoMatch,
}

/// An operation the tracer does not model.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Op {
    /// Property assignment.
    Set,
    /// Property deletion.
    Delete,
    /// Property descriptor definition or query.
    Define,
    /// Prototype query or mutation.
    Prototype,
    /// Extensibility query or mutation.
    Extensibility,
    /// Invocation.
    Invoke,
    /// Construction.
    Construct,
}

impl Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Set => "assignment",
            Self::Delete => "deletion",
            Self::Define => "descriptor definition",
            Self::Prototype => "prototype access",
            Self::Extensibility => "extensibility access",
            Self::Invoke => "invocation",
            Self::Construct => "construction",
        })
    }
}
