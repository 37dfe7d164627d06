//! Property-based tests for canonicalization.

use narsese_terms::{Term, TermFactory};
use proptest::prelude::*;

fn atom_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]", 1..6)
}

fn commutative_ops() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["&&", "||", "&", "|", "+", "*", "{}", "[]"])
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn creation_is_idempotent(names in atom_names(), op in commutative_ops()) {
        let f = TermFactory::new();
        let t1 = f.create_compound(op, names.iter().map(String::as_str)).unwrap();
        let t2 = f.create_compound(op, names.iter().map(String::as_str)).unwrap();
        prop_assert!(t1.ptr_eq(&t2));
    }

    #[test]
    fn commutative_order_is_irrelevant(names in atom_names(), op in commutative_ops()) {
        let f = TermFactory::new();
        let mut reversed = names.clone();
        reversed.reverse();
        let t1 = f.create_compound(op, names.iter().map(String::as_str)).unwrap();
        let t2 = f.create_compound(op, reversed.iter().map(String::as_str)).unwrap();
        prop_assert!(t1.ptr_eq(&t2));
    }

    #[test]
    fn deduplicated_components_are_sorted_and_unique(names in atom_names()) {
        let f = TermFactory::new();
        let t = f.conjunction(names.iter().map(String::as_str)).unwrap();
        let comps: Vec<&str> = t.components().iter().map(Term::name).collect();
        let mut expected: Vec<&str> = names.iter().map(String::as_str).collect();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(comps, expected);
    }

    #[test]
    fn conjunction_split_anywhere_flattens(names in atom_names(), split in 0usize..6) {
        let f = TermFactory::new();
        let split = split.min(names.len());
        let (left, right) = names.split_at(split);
        let flat = f.conjunction(names.iter().map(String::as_str)).unwrap();
        let mut parts = Vec::new();
        if !left.is_empty() {
            parts.push(f.conjunction(left.iter().map(String::as_str)).unwrap());
        }
        if !right.is_empty() {
            parts.push(f.conjunction(right.iter().map(String::as_str)).unwrap());
        }
        let nested = f.conjunction(parts).unwrap();
        // a single-name side is a unary conjunction, which is flattened too
        prop_assert!(nested.ptr_eq(&flat));
    }

    #[test]
    fn negation_is_an_involution(depth in 1usize..8) {
        let f = TermFactory::new();
        let p = f.atomic("p").unwrap();
        let mut t = p.clone();
        for _ in 0..depth {
            t = f.negation(&t).unwrap();
        }
        if depth % 2 == 0 {
            prop_assert!(t.ptr_eq(&p));
        } else {
            prop_assert_eq!(t.name(), "(--, p)");
        }
    }

    #[test]
    fn complexity_exceeds_component_count(names in atom_names(), op in commutative_ops()) {
        let f = TermFactory::new();
        let t = f.create_compound(op, names.iter().map(String::as_str)).unwrap();
        prop_assert!(f.complexity(&t) >= 1 + 2 * t.arity());
    }
}
