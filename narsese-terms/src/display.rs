//! Canonical naming and [`fmt::Display`] for [`Term`].
//!
//! The canonical name is built once, when a compound is interned, and is
//! both the interning key and the display form. All compounds use the
//! uniform `(op, c1, c2, …)` layout except tuples, which omit the
//! operator token: `(c1, c2)`.

use crate::{Oper, Term};
use smartstring::alias::String;
use std::fmt::{self, Write};

/// Derives the canonical name of `oper` applied to already normalized
/// `components`.
pub(crate) fn canonical_name(oper: &Oper, components: &[Term]) -> String {
    let mut out = String::new();
    // Writing into a String never fails.
    let _ = write_canonical(&mut out, oper, components);
    out
}

fn write_canonical(out: &mut impl Write, oper: &Oper, components: &[Term]) -> fmt::Result {
    out.write_char('(')?;
    let mut first = true;
    if !oper.is_tuple() {
        out.write_str(oper.symbol())?;
        first = false;
    }
    for c in components {
        if !first {
            out.write_str(", ")?;
        }
        out.write_str(c.name())?;
        first = false;
    }
    out.write_char(')')
}

/// Renders the canonical name.
///
/// ```rust
/// use narsese_terms::TermFactory;
/// let factory = TermFactory::new();
/// let cat = factory.atomic("cat").unwrap();
/// let animal = factory.atomic("animal").unwrap();
/// let t = factory.inheritance(&cat, &animal).unwrap();
/// assert_eq!(t.to_string(), "(-->, cat, animal)");
/// ```
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms(names: &[&str]) -> Vec<Term> {
        names.iter().map(|n| Term::new_atom(*n)).collect()
    }

    #[test]
    fn operator_leads_component_list() {
        let name = canonical_name(&Oper::Inheritance, &atoms(&["cat", "animal"]));
        assert_eq!(name, "(-->, cat, animal)");
    }

    #[test]
    fn tuple_omits_operator() {
        let name = canonical_name(&Oper::Tuple, &atoms(&["a", "b", "c"]));
        assert_eq!(name, "(a, b, c)");
    }

    #[test]
    fn unary_and_empty() {
        assert_eq!(canonical_name(&Oper::Negation, &atoms(&["p"])), "(--, p)");
        assert_eq!(canonical_name(&Oper::ExtSet, &[]), "({})");
        assert_eq!(canonical_name(&Oper::Tuple, &[]), "()");
    }

    #[test]
    fn nested_names_are_embedded() {
        let inner = Term::new_compound(
            canonical_name(&Oper::Negation, &atoms(&["b"])),
            Oper::Negation,
            atoms(&["b"]),
        );
        let a = Term::new_atom("a");
        let name = canonical_name(&Oper::Implication, &[a, inner]);
        assert_eq!(name, "(==>, a, (--, b))");
    }

    #[test]
    fn display_prints_name() {
        let t = Term::new_atom("cat");
        assert_eq!(format!("{t}"), "cat");
    }
}
