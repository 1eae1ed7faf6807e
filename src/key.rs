use std::fmt::{self, Debug, Display};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A property key on a reflected object.
///
/// Keys are either named (a shared string) or symbols: process-unique ids
/// that can never collide with a name. Cloning a key is cheap.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named property.
    Name(Rc<str>),
    /// A private, process-unique property.
    Symbol(Symbol),
}

impl Key {
    /// Create a named key.
    pub fn name(name: impl Into<Rc<str>>) -> Self {
        Self::Name(name.into())
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name.into())
    }
}

impl From<Symbol> for Key {
    fn from(symbol: Symbol) -> Self {
        Self::Symbol(symbol)
    }
}

impl Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name:?}"),
            Self::Symbol(symbol) => write!(f, "{symbol:?}"),
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Symbol(symbol) => write!(f, "#{}", symbol.0),
        }
    }
}

/// The next symbol id.
static ID: AtomicU64 = AtomicU64::new(0);

/// A process-unique key.
///
/// Two symbols are equal only if one was copied from the other.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(u64);

impl Symbol {
    /// Allocate a fresh symbol.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(ID.fetch_add(1, Ordering::SeqCst))
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_unique() {
        let a = Symbol::new();
        let b = Symbol::new();
        assert_ne!(a, b);
        assert_eq!(a, a);
        assert_ne!(Key::from(a), Key::from("a"));
    }

    #[test]
    fn test_names_compare_by_content() {
        assert_eq!(Key::from("width"), Key::name(String::from("width")));
    }
}
