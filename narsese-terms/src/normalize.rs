//! Structural normalization and semantic canonicalization of component
//! lists.
//!
//! Both passes are pure functions of a connective and already interned
//! components. The structural pass flattens associative connectives and
//! sorts/deduplicates commutative ones; the semantic pass applies the
//! per-family rules (equivalence ordering, fixed-arity truncation) and
//! re-runs the commutative pass as a safety net.

use crate::{Oper, Term, TermError};
use smartstring::alias::String;
use std::collections::HashSet;

/// Nesting depth of a term: atoms are `1`, compounds are one more than
/// their deepest component. Not cached; only used to order equivalence
/// operands and never to be confused with complexity.
pub(crate) fn structural_depth(term: &Term) -> usize {
    1 + term
        .components()
        .iter()
        .map(structural_depth)
        .max()
        .unwrap_or(0)
}

/// Order-insensitive identity used for redundancy checks.
///
/// A leaf's identity is its name. A compound's identity is
/// `op_id1|id2|…`, with the component identities sorted iff the
/// compound's connective is commutative.
pub(crate) fn structural_identity(term: &Term) -> Result<String, TermError> {
    let Some(oper) = term.oper() else {
        if term.name().is_empty() {
            return Err(TermError::MalformedComponent);
        }
        return Ok(String::from(term.name()));
    };
    let mut ids = term
        .components()
        .iter()
        .map(structural_identity)
        .collect::<Result<Vec<_>, _>>()?;
    if oper.is_commutative() {
        ids.sort();
    }
    let mut out = String::from(oper.symbol());
    out.push('_');
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push('|');
        }
        out.push_str(id);
    }
    Ok(out)
}

/// Structural pass: associative flattening, then commutative sorting and
/// (except for equality) deduplication.
pub(crate) fn normalize(oper: &Oper, components: Vec<Term>) -> Result<Vec<Term>, TermError> {
    let mut components = if oper.is_associative() {
        flatten(oper, components)
    } else {
        components
    };
    if oper.is_commutative() {
        sort_by_name(&mut components);
        if oper.dedupes() {
            components = dedupe(components)?;
        }
    }
    Ok(components)
}

/// Semantic pass, applied to the output of [`normalize`].
pub(crate) fn canonicalize(oper: &Oper, components: Vec<Term>) -> Result<Vec<Term>, TermError> {
    if oper.is_equivalence_like() {
        return Ok(order_equivalence(components));
    }
    if let Some(arity) = oper.fixed_arity() {
        let mut components = components;
        components.truncate(arity);
        return Ok(components);
    }
    if oper.dedupes() {
        let mut components = components;
        sort_by_name(&mut components);
        return dedupe(components);
    }
    Ok(components)
}

/// Replaces every child built with `oper` by that child's components.
/// One level is enough: children were normalized when they were interned.
fn flatten(oper: &Oper, components: Vec<Term>) -> Vec<Term> {
    if !components.iter().any(|c| c.has_oper(oper)) {
        return components;
    }
    let mut flat = Vec::with_capacity(components.len() + 2);
    for c in components {
        if c.has_oper(oper) {
            flat.extend_from_slice(c.components());
        } else {
            flat.push(c);
        }
    }
    flat
}

#[inline]
fn sort_by_name(components: &mut [Term]) {
    components.sort_by(|a, b| a.name().cmp(b.name()));
}

/// Drops structural duplicates; the first occurrence wins.
fn dedupe(components: Vec<Term>) -> Result<Vec<Term>, TermError> {
    let mut seen = HashSet::with_capacity(components.len());
    let mut out = Vec::with_capacity(components.len());
    for c in components {
        if seen.insert(structural_identity(&c)?) {
            out.push(c);
        }
    }
    Ok(out)
}

/// Keeps two operands, deeper first, ties by ascending name.
fn order_equivalence(mut components: Vec<Term>) -> Vec<Term> {
    components.truncate(2);
    components.sort_by(|a, b| {
        structural_depth(b)
            .cmp(&structural_depth(a))
            .then_with(|| a.name().cmp(b.name()))
    });
    components
}
