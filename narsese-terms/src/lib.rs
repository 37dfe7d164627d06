//! # Narsese Terms
//!
//! A canonicalizing, hash-consing factory for the terms of a
//! non-axiomatic (Narsese-style) term logic.
//!
//! Every atom and compound term used by a reasoner is obtained from a
//! [`TermFactory`]. The factory normalizes each request (associative
//! flattening, commutative sorting and deduplication, equivalence operand
//! ordering, fixed-arity truncation), applies algebraic reductions such
//! as double-negation elimination, and interns the result in a bounded
//! least-recently-used cache. Structurally equivalent requests therefore
//! yield the very same [`Term`] instance and equality is a pointer
//! comparison.
//!
//! ## Example
//! ```rust
//! use narsese_terms::{Oper, TermFactory, View};
//!
//! let f = TermFactory::new();
//! let cat = f.atomic("cat").unwrap();
//! let animal = f.atomic("animal").unwrap();
//!
//! let t = f.inheritance(&cat, &animal).unwrap();
//! assert_eq!(t.name(), "(-->, cat, animal)");
//!
//! // extra components of a fixed-arity connective are dropped
//! let same = f.create_compound("-->", ["cat", "animal", "mammal"]).unwrap();
//! assert_eq!(t, same);
//!
//! // nested conjunctions are flattened and sorted
//! let abc = f.conjunction(["c", "b", "a"]).unwrap();
//! let nested = f
//!     .conjunction([f.atomic("a").unwrap(), f.conjunction(["b", "c"]).unwrap()])
//!     .unwrap();
//! assert_eq!(abc, nested);
//!
//! if let View::Compound(Oper::Conjunction, args) = abc.view() {
//!     assert_eq!(args.len(), 3);
//! }
//! assert!(f.complexity(&abc) >= 1 + 3);
//! ```
//!
//! ## License
//!
//! Released under the terms of the GNU Lesser General Public License, version 3.0 or
//! (at your option) any later version (LGPL-3.0-or-later).

mod cache;
mod display;
mod diversity;
mod error;
mod events;
mod factory;
mod normalize;
mod oper;
mod rewrite;
mod spec;
mod term;
mod view;

pub use cache::{CacheStats, LruTermCache, TermCache};
pub use diversity::{DiversityMetrics, DiversityTracker, NoDiversity, OperatorDiversity};
pub use error::TermError;
pub use events::{EventSink, FactoryEvent, LogEvents};
pub use factory::{FALSE, FactoryConfig, FactoryStats, NULL, TRUE, TermFactory};
pub use oper::Oper;
pub use spec::TermSpec;
pub use term::Term;
pub use view::View;
