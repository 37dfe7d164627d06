//! Pre-cache algebraic reductions.
//!
//! Rules are inspected on resolved but not yet normalized components.
//! A rule never builds terms itself: it tells the factory either which
//! existing term the request collapses to, or which inner request to
//! create before wrapping it in an outer connective. The factory drives
//! the rules in a bounded loop so every intermediate term is interned
//! through the regular creation path.

use crate::{Oper, Term};

/// What a matching rule asks the factory to do instead of interning the
/// request as is.
#[derive(Debug)]
pub(crate) enum Reduction {
    /// The request denotes this already interned term.
    Collapse(Term),
    /// Create `(inner_oper, inner)` first, then continue with
    /// `(outer, [that term])`.
    Wrap {
        outer: Oper,
        inner_oper: Oper,
        inner: Vec<Term>,
    },
}

pub(crate) struct Rule {
    pub(crate) name: &'static str,
    apply: fn(&Oper, &[Term]) -> Option<Reduction>,
}

pub(crate) const RULES: &[Rule] = &[
    Rule {
        name: "double-negation",
        apply: double_negation,
    },
    Rule {
        name: "implication-negation",
        apply: implication_negation,
    },
];

/// Returns the first applicable rule and its reduction.
pub(crate) fn reduce(oper: &Oper, components: &[Term]) -> Option<(&'static str, Reduction)> {
    if !oper.is_reducible() {
        return None;
    }
    RULES
        .iter()
        .find_map(|rule| (rule.apply)(oper, components).map(|r| (rule.name, r)))
}

/// `(--, (--, X))` is `X`.
fn double_negation(oper: &Oper, components: &[Term]) -> Option<Reduction> {
    match (oper, components) {
        (Oper::Negation, [inner]) if inner.has_oper(&Oper::Negation) => match inner.components() {
            [x] => Some(Reduction::Collapse(x.clone())),
            _ => None,
        },
        _ => None,
    }
}

/// `(A ==> (--, B))` is `(--, (A ==> B))`.
fn implication_negation(oper: &Oper, components: &[Term]) -> Option<Reduction> {
    match (oper, components) {
        (Oper::Implication, [a, neg]) if neg.has_oper(&Oper::Negation) => match neg.components() {
            [b] => Some(Reduction::Wrap {
                outer: Oper::Negation,
                inner_oper: Oper::Implication,
                inner: vec![a.clone(), b.clone()],
            }),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::canonical_name;

    fn compound(oper: Oper, components: Vec<Term>) -> Term {
        Term::new_compound(canonical_name(&oper, &components), oper, components)
    }

    #[test]
    fn double_negation_collapses() {
        let p = Term::new_atom("p");
        let np = compound(Oper::Negation, vec![p.clone()]);
        match reduce(&Oper::Negation, &[np]) {
            Some(("double-negation", Reduction::Collapse(t))) => assert!(t.ptr_eq(&p)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn single_negation_is_kept() {
        let p = Term::new_atom("p");
        assert!(reduce(&Oper::Negation, &[p]).is_none());
    }

    #[test]
    fn negated_consequent_is_pulled_out() {
        let a = Term::new_atom("a");
        let b = Term::new_atom("b");
        let nb = compound(Oper::Negation, vec![b.clone()]);
        match reduce(&Oper::Implication, &[a.clone(), nb]) {
            Some((
                "implication-negation",
                Reduction::Wrap {
                    outer,
                    inner_oper,
                    inner,
                },
            )) => {
                assert_eq!(outer, Oper::Negation);
                assert_eq!(inner_oper, Oper::Implication);
                assert_eq!(inner, vec![a, b]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn negated_antecedent_is_kept() {
        let a = Term::new_atom("a");
        let na = compound(Oper::Negation, vec![a]);
        let b = Term::new_atom("b");
        assert!(reduce(&Oper::Implication, &[na, b]).is_none());
    }

    #[test]
    fn other_connectives_are_not_reduced() {
        let p = Term::new_atom("p");
        let np = compound(Oper::Negation, vec![p]);
        assert!(reduce(&Oper::Conjunction, &[np]).is_none());
    }
}
