//! Defines the core [`Term`] type.
//!
//! A `Term` is a cheap, clonable handle to an immutable node shared
//! through the [`TermFactory`](crate::TermFactory). Equality and hashing
//! are by identity: two handles are equal iff they point at the same
//! interned node, which the factory guarantees for equal canonical names.

use crate::Oper;
use core::fmt;
use smartstring::alias::String;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Internal payload of a term. Never mutated after construction.
#[derive(Debug)]
pub(crate) struct TermData {
    pub(crate) name: String,
    pub(crate) kind: Kind,
}

#[derive(Debug)]
pub(crate) enum Kind {
    Atom,
    Compound { oper: Oper, components: Vec<Term> },
}

/// A handle to an interned atom or compound term.
///
/// Users never construct `Term` values directly; they are produced by the
/// [`TermFactory`](crate::TermFactory). Cloning a handle is an atomic
/// reference count increment.
#[derive(Clone)]
pub struct Term(pub(crate) Arc<TermData>);

impl Term {
    #[inline]
    pub(crate) fn new_atom(name: impl Into<String>) -> Self {
        Self(Arc::new(TermData {
            name: name.into(),
            kind: Kind::Atom,
        }))
    }

    #[inline]
    pub(crate) fn new_compound(name: String, oper: Oper, components: Vec<Term>) -> Self {
        Self(Arc::new(TermData {
            name,
            kind: Kind::Compound { oper, components },
        }))
    }

    /// Returns the canonical name, which is also the interning key.
    #[inline]
    pub fn name(&self) -> &str {
        self.0.name.as_str()
    }

    /// Returns the connective of a compound term, `None` for atoms.
    #[inline]
    pub fn oper(&self) -> Option<&Oper> {
        match &self.0.kind {
            Kind::Atom => None,
            Kind::Compound { oper, .. } => Some(oper),
        }
    }

    /// Returns the components of a compound term; empty for atoms.
    #[inline]
    pub fn components(&self) -> &[Term] {
        match &self.0.kind {
            Kind::Atom => &[],
            Kind::Compound { components, .. } => components,
        }
    }

    /// Returns the number of components.
    #[inline]
    pub fn arity(&self) -> usize {
        self.components().len()
    }

    /// Returns `true` if the term is an atom.
    #[inline]
    pub fn is_atom(&self) -> bool {
        matches!(self.0.kind, Kind::Atom)
    }

    /// Returns `true` if the term is a compound term.
    #[inline]
    pub fn is_compound(&self) -> bool {
        matches!(self.0.kind, Kind::Compound { .. })
    }

    /// Returns `true` if the term is a compound with connective `op`.
    #[inline]
    pub fn has_oper(&self, op: &Oper) -> bool {
        self.oper() == Some(op)
    }

    /// Returns `true` for atoms named with a variable prefix
    /// (`?` query, `$` independent, `#` dependent).
    #[inline]
    pub fn is_variable(&self) -> bool {
        self.is_atom() && self.name().starts_with(['?', '$', '#'])
    }

    /// Returns a string describing the kind of this term.
    #[inline]
    pub fn kind_name(&self) -> &'static str {
        match &self.0.kind {
            Kind::Atom if self.is_variable() => "var",
            Kind::Atom => "atom",
            Kind::Compound { .. } => "compound",
        }
    }

    /// Returns `true` if both handles point at the same interned node.
    #[inline]
    pub fn ptr_eq(&self, other: &Term) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl AsRef<Term> for Term {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsRef<str> for Term {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl PartialEq for Term {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

/// Prints the term kind and canonical name, e.g. `Compound("(&&, a, b)")`.
///
/// The output is intended for diagnostics and logging only.
impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.kind {
            Kind::Atom => f.debug_tuple("Atom").field(&self.name()).finish(),
            Kind::Compound { .. } => f.debug_tuple("Compound").field(&self.name()).finish(),
        }
    }
}
