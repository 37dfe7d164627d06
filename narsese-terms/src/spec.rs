//! Creation requests.
//!
//! A [`TermSpec`] describes a term before it is canonicalized: an atom
//! name, an already built [`Term`], or a connective applied to nested
//! specs. Specs can also be decoded from JSON, where every shape the
//! factory accepts has a structured form:
//!
//! | JSON | Spec |
//! |------|------|
//! | `"cat"` | atom `cat` |
//! | `{"operator": "-->", "components": ["cat", "animal"]}` | compound |
//! | `["-->", "cat", "animal"]` | compound, operator first |
//! | `{"name": "cat"}` | atom `cat` |

use crate::{Term, TermError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use smartstring::alias::String;

/// A raw, not yet canonicalized, term description.
#[derive(Debug, Clone)]
pub enum TermSpec {
    /// An atom name.
    Name(String),
    /// An already interned term.
    Term(Term),
    /// A connective symbol applied to component specs.
    Compound {
        oper: String,
        components: Vec<TermSpec>,
    },
}

impl TermSpec {
    /// Builds a compound spec from a connective symbol and components.
    pub fn compound(
        oper: impl AsRef<str>,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Self {
        TermSpec::Compound {
            oper: String::from(oper.as_ref()),
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Decodes a spec from a JSON value.
    ///
    /// Fails with [`TermError::InvalidInput`] for `null`, booleans, empty
    /// names and objects without data, [`TermError::InvalidOperator`] when
    /// the operator is not a string, and [`TermError::InvalidComponents`]
    /// when the components are missing or not an array.
    pub fn from_json(value: &Value) -> Result<Self, TermError> {
        match value {
            Value::Null | Value::Bool(_) => Err(TermError::InvalidInput),
            Value::Number(n) => Ok(TermSpec::Name(String::from(n.to_string()))),
            Value::String(s) if s.is_empty() => Err(TermError::InvalidInput),
            Value::String(s) => Ok(TermSpec::Name(String::from(s.as_str()))),
            Value::Array(items) => {
                let Some((oper, rest)) = items.split_first() else {
                    return Err(TermError::InvalidInput);
                };
                Ok(TermSpec::Compound {
                    oper: oper_symbol(oper)?,
                    components: rest.iter().map(Self::from_json).collect::<Result<_, _>>()?,
                })
            }
            Value::Object(map) => {
                if let Some(oper) = map.get("operator") {
                    let oper = oper_symbol(oper)?;
                    let Some(Value::Array(items)) = map.get("components") else {
                        return Err(TermError::InvalidComponents);
                    };
                    return Ok(TermSpec::Compound {
                        oper,
                        components: items.iter().map(Self::from_json).collect::<Result<_, _>>()?,
                    });
                }
                match map.get("name") {
                    Some(name @ Value::String(_)) => Self::from_json(name),
                    _ => Err(TermError::InvalidInput),
                }
            }
        }
    }
}

fn oper_symbol(value: &Value) -> Result<String, TermError> {
    match value {
        Value::String(s) if !s.is_empty() => Ok(String::from(s.as_str())),
        other => Err(TermError::InvalidOperator(String::from(other.to_string()))),
    }
}

impl<'de> Deserialize<'de> for TermSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        TermSpec::from_json(&value).map_err(serde::de::Error::custom)
    }
}

impl From<&str> for TermSpec {
    #[inline]
    fn from(name: &str) -> Self {
        TermSpec::Name(String::from(name))
    }
}

impl From<String> for TermSpec {
    #[inline]
    fn from(name: String) -> Self {
        TermSpec::Name(name)
    }
}

impl From<std::string::String> for TermSpec {
    #[inline]
    fn from(name: std::string::String) -> Self {
        TermSpec::Name(String::from(name))
    }
}

impl From<Term> for TermSpec {
    #[inline]
    fn from(term: Term) -> Self {
        TermSpec::Term(term)
    }
}

impl From<&Term> for TermSpec {
    #[inline]
    fn from(term: &Term) -> Self {
        TermSpec::Term(term.clone())
    }
}
