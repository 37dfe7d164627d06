//! Narsese connectives and their algebraic properties.
//!
//! Every compound term carries an [`Oper`]. The set of connectives is fixed
//! at compile time and each variant knows whether it is associative,
//! commutative, equivalence-like or of fixed arity, so the normalizer never
//! consults a string-keyed table. Connectives outside the known set are
//! kept verbatim in [`Oper::Other`] and carry no algebraic properties.

use crate::TermError;
use smartstring::alias::String;
use std::fmt;
use std::str::FromStr;

/// A logical connective of a compound term.
///
/// | Variant | Symbol | Properties |
/// |---------|--------|------------|
/// | [`Oper::Inheritance`] | `-->` | fixed arity 2 |
/// | [`Oper::Similarity`] | `<->` | commutative, equivalence-like |
/// | [`Oper::Implication`] | `==>` | reducible |
/// | [`Oper::Equivalence`] | `<=>` | equivalence-like |
/// | [`Oper::Equality`] | `=` | commutative (no dedup), equivalence-like |
/// | [`Oper::Conjunction`] | `&&` | associative, commutative |
/// | [`Oper::Disjunction`] | `\|\|` | associative, commutative |
/// | [`Oper::ExtIntersection`] | `&` | associative, commutative |
/// | [`Oper::IntIntersection`] | `\|` | associative, commutative |
/// | [`Oper::Sum`] | `+` | commutative |
/// | [`Oper::Product`] | `*` | commutative |
/// | [`Oper::Resemblance`] | `<~>` | commutative |
/// | [`Oper::ExtSet`] | `{}` | commutative |
/// | [`Oper::IntSet`] | `[]` | commutative |
/// | [`Oper::Negation`] | `--` | reducible |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Oper {
    /// Inheritance `-->`.
    Inheritance,
    /// Similarity `<->`.
    Similarity,
    /// Implication `==>`.
    Implication,
    /// Equivalence `<=>`.
    Equivalence,
    /// Equality `=`.
    Equality,
    /// Conjunction `&&`.
    Conjunction,
    /// Disjunction `||`.
    Disjunction,
    /// Parallel events `&|`.
    Parallel,
    /// Sequential events `&/`.
    Sequence,
    /// Extensional intersection `&`.
    ExtIntersection,
    /// Intensional intersection `|`.
    IntIntersection,
    /// Sum `+`.
    Sum,
    /// Product `*`.
    Product,
    /// Approximate similarity `<~>`.
    Resemblance,
    /// Extensional set `{}`.
    ExtSet,
    /// Intensional set `[]`.
    IntSet,
    /// Tuple `,`. Rendered without its operator token.
    Tuple,
    /// Negation `--`.
    Negation,
    /// Difference `-`.
    Difference,
    /// Delta `Δ`.
    Delta,
    /// Extensional image `/`.
    ExtImage,
    /// Intensional image `\`.
    IntImage,
    /// Predicate application `^`.
    Apply,
    /// Any other connective, kept verbatim.
    Other(String),
}

impl Oper {
    /// Returns the textual symbol of the connective.
    pub fn symbol(&self) -> &str {
        match self {
            Oper::Inheritance => "-->",
            Oper::Similarity => "<->",
            Oper::Implication => "==>",
            Oper::Equivalence => "<=>",
            Oper::Equality => "=",
            Oper::Conjunction => "&&",
            Oper::Disjunction => "||",
            Oper::Parallel => "&|",
            Oper::Sequence => "&/",
            Oper::ExtIntersection => "&",
            Oper::IntIntersection => "|",
            Oper::Sum => "+",
            Oper::Product => "*",
            Oper::Resemblance => "<~>",
            Oper::ExtSet => "{}",
            Oper::IntSet => "[]",
            Oper::Tuple => ",",
            Oper::Negation => "--",
            Oper::Difference => "-",
            Oper::Delta => "Δ",
            Oper::ExtImage => "/",
            Oper::IntImage => "\\",
            Oper::Apply => "^",
            Oper::Other(s) => s.as_str(),
        }
    }

    /// Nested same-operator children are flattened into one level.
    #[inline]
    pub const fn is_associative(&self) -> bool {
        matches!(
            self,
            Oper::ExtIntersection | Oper::IntIntersection | Oper::Disjunction | Oper::Conjunction
        )
    }

    /// Components are sorted by name.
    #[inline]
    pub const fn is_commutative(&self) -> bool {
        self.is_associative()
            || matches!(
                self,
                Oper::Sum
                    | Oper::Product
                    | Oper::Similarity
                    | Oper::Equality
                    | Oper::Resemblance
                    | Oper::ExtSet
                    | Oper::IntSet
            )
    }

    /// Structural duplicates are removed after sorting. Equality keeps
    /// multiplicity.
    #[inline]
    pub const fn dedupes(&self) -> bool {
        self.is_commutative() && !matches!(self, Oper::Equality)
    }

    /// Exactly two operands, the structurally deeper one first.
    #[inline]
    pub const fn is_equivalence_like(&self) -> bool {
        matches!(self, Oper::Similarity | Oper::Equivalence | Oper::Equality)
    }

    /// Number of components the connective is truncated to, if fixed.
    #[inline]
    pub const fn fixed_arity(&self) -> Option<usize> {
        match self {
            Oper::Inheritance => Some(2),
            _ => None,
        }
    }

    /// Subject to algebraic rewriting before interning.
    #[inline]
    pub const fn is_reducible(&self) -> bool {
        matches!(self, Oper::Negation | Oper::Implication)
    }

    /// Returns `true` for the tuple connective.
    #[inline]
    pub const fn is_tuple(&self) -> bool {
        matches!(self, Oper::Tuple)
    }
}

impl From<&Oper> for String {
    fn from(op: &Oper) -> Self {
        op.symbol().into()
    }
}

impl fmt::Display for Oper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Parses a connective symbol. Unknown symbols become [`Oper::Other`].
/// Empty symbols are rejected, as are symbols containing letters, digits,
/// whitespace, commas or parentheses: those would print like the first
/// element of a tuple.
impl FromStr for Oper {
    type Err = TermError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" => return Err(TermError::InvalidOperator(String::new())),
            "-->" => Oper::Inheritance,
            "<->" => Oper::Similarity,
            "==>" => Oper::Implication,
            "<=>" => Oper::Equivalence,
            "=" => Oper::Equality,
            "&&" => Oper::Conjunction,
            "||" => Oper::Disjunction,
            "&|" => Oper::Parallel,
            "&/" => Oper::Sequence,
            "&" => Oper::ExtIntersection,
            "|" => Oper::IntIntersection,
            "+" => Oper::Sum,
            "*" => Oper::Product,
            "<~>" => Oper::Resemblance,
            "{}" => Oper::ExtSet,
            "[]" => Oper::IntSet,
            "," => Oper::Tuple,
            "--" => Oper::Negation,
            "-" => Oper::Difference,
            "Δ" => Oper::Delta,
            "/" => Oper::ExtImage,
            "\\" => Oper::IntImage,
            "^" => Oper::Apply,
            other if other.chars().any(|c| {
                c.is_alphanumeric() || c.is_whitespace() || matches!(c, ',' | '(' | ')')
            }) =>
            {
                return Err(TermError::InvalidOperator(String::from(other)));
            }
            other => Oper::Other(String::from(other)),
        })
    }
}

impl TryFrom<&str> for Oper {
    type Error = TermError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for Oper {
    type Error = TermError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.as_str().parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOLS: &[&str] = &[
        "-->", "<->", "==>", "<=>", "=", "&&", "||", "&|", "&/", "&", "|", "+", "*", "<~>",
        "{}", "[]", ",", "--", "-", "Δ", "/", "\\", "^",
    ];

    #[test]
    fn known_symbols_round_trip() {
        for s in SYMBOLS {
            let op: Oper = s.parse().unwrap();
            assert!(!matches!(op, Oper::Other(_)), "{s} parsed as Other");
            assert_eq!(op.symbol(), *s);
            assert_eq!(op.to_string(), *s);
        }
    }

    #[test]
    fn unknown_symbol_is_kept_verbatim() {
        let op = Oper::try_from("=/>").unwrap();
        assert_eq!(op, Oper::Other("=/>".into()));
        assert_eq!(op.symbol(), "=/>");
        assert!(!op.is_commutative());
        assert!(!op.is_associative());
        assert_eq!(op.fixed_arity(), None);
    }

    #[test]
    fn empty_symbol_is_rejected() {
        assert!(matches!(
            "".parse::<Oper>(),
            Err(TermError::InvalidOperator(_))
        ));
    }

    #[test]
    fn name_like_symbols_are_rejected() {
        for s in ["a", "op", "x1", "a b", "=,>", "(", "<)"] {
            assert_eq!(
                s.parse::<Oper>(),
                Err(TermError::InvalidOperator(s.into())),
                "{s}"
            );
        }
        assert!(matches!("~~>".parse::<Oper>(), Ok(Oper::Other(_))));
    }

    #[test]
    fn associative_implies_commutative() {
        for s in SYMBOLS {
            let op: Oper = s.parse().unwrap();
            if op.is_associative() {
                assert!(op.is_commutative(), "{s}");
            }
        }
    }

    #[test]
    fn equality_sorts_without_dedup() {
        assert!(Oper::Equality.is_commutative());
        assert!(!Oper::Equality.dedupes());
        assert!(Oper::Similarity.dedupes());
    }

    #[test]
    fn operator_families() {
        assert!(Oper::Equivalence.is_equivalence_like());
        assert!(!Oper::Equivalence.is_commutative());
        assert_eq!(Oper::Inheritance.fixed_arity(), Some(2));
        assert!(Oper::Negation.is_reducible());
        assert!(Oper::Implication.is_reducible());
        assert!(!Oper::Parallel.is_commutative());
        assert!(Oper::Tuple.is_tuple());
    }
}
