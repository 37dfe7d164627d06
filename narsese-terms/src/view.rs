//! Defines [`View`], a borrowed read-only representation of a [`Term`].
//!
//! Provides a pattern-matching friendly decoding without allocation.

use crate::{Oper, Term, term::Kind};

/// A borrowed view into an interned [`Term`].
///
/// Use [`Term::view`] to obtain a view. The lifetime `'a` binds the
/// returned references to the borrowed term handle.
#[derive(Debug, Clone, Copy)]
pub enum View<'a> {
    /// An atom (or variable) name.
    Atom(&'a str),
    /// A compound term: its connective and components.
    Compound(&'a Oper, &'a [Term]),
}

impl Term {
    /// Produce a [`View`] of this term.
    ///
    /// ```rust
    /// use narsese_terms::{Oper, TermFactory, View};
    /// let factory = TermFactory::new();
    /// let t = factory.negation("p").unwrap();
    /// match t.view() {
    ///     View::Compound(Oper::Negation, [inner]) => assert_eq!(inner.name(), "p"),
    ///     other => panic!("unexpected {other:?}"),
    /// }
    /// ```
    #[inline]
    pub fn view(&self) -> View<'_> {
        match &self.0.kind {
            Kind::Atom => View::Atom(self.name()),
            Kind::Compound { oper, components } => View::Compound(oper, components),
        }
    }
}
