//! Defines the [`TermFactory`], the only way to obtain [`Term`] values.
//!
//! Every creation request runs through a fixed pipeline:
//!
//! 1. component specs are resolved into interned terms,
//! 2. pre-cache algebraic reductions are applied,
//! 3. the components are structurally normalized and semantically
//!    canonicalized,
//! 4. the canonical name is derived and looked up in the interning cache,
//! 5. on a miss the term is built, interned (possibly evicting the least
//!    recently used entry), its complexity cached and the diversity
//!    tracker notified.
//!
//! Step 4 and 5 happen inside one critical section, so concurrent
//! requests for the same canonical form always observe a single instance,
//! and an evicted key disappears from the interning cache, the complexity
//! table and the diversity registry together.

use crate::{
    CacheStats, DiversityMetrics, DiversityTracker, EventSink, FactoryEvent, LruTermCache, Oper,
    OperatorDiversity, Term, TermCache, TermError, TermSpec,
    display::canonical_name,
    normalize::{canonicalize, normalize},
    rewrite::{self, Reduction},
};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use serde_json::Value;
use smartstring::alias::String;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the `true` sentinel atom.
pub const TRUE: &str = "True";
/// Name of the `false` sentinel atom.
pub const FALSE: &str = "False";
/// Name of the `null` sentinel atom.
pub const NULL: &str = "Null";

const SYSTEM_ATOMS: [&str; 3] = [TRUE, FALSE, NULL];

/// Tunables of a [`TermFactory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryConfig {
    /// Capacity of the interning cache.
    pub max_cache_size: usize,
    /// Maximum number of rewrite steps applied to a single request.
    pub max_rewrite_steps: usize,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_cache_size: 5000,
            max_rewrite_steps: 64,
        }
    }
}

impl FactoryConfig {
    pub fn with_max_cache_size(mut self, n: usize) -> Self {
        self.max_cache_size = n.max(1);
        self
    }

    pub fn with_max_rewrite_steps(mut self, n: usize) -> Self {
        self.max_rewrite_steps = n.max(1);
        self
    }
}

/// Snapshot of factory counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactoryStats {
    pub cache_size: usize,
    pub hits: u64,
    pub misses: u64,
    /// `hits / (hits + misses)`, `0.0` before the first request.
    pub hit_rate: f64,
    pub max_cache_size: usize,
    pub evictions: u64,
    pub diversity: DiversityMetrics,
}

/// Everything guarded by the factory lock.
struct State {
    cache: Box<dyn TermCache>,
    /// Canonical name → structural complexity, for every cached term.
    complexity: HashMap<String, usize>,
    diversity: Box<dyn DiversityTracker>,
    hits: u64,
    misses: u64,
}

impl State {
    /// Complexity of a term about to be interned. Components are normally
    /// cached; a component evicted in the meantime is measured directly.
    fn complexity_of(&self, term: &Term) -> usize {
        if term.is_atom() {
            return 1;
        }
        1 + term.arity()
            + term
                .components()
                .iter()
                .map(|c| match self.complexity.get(c.name()) {
                    Some(&n) => n,
                    None => self.complexity_of(c),
                })
                .sum::<usize>()
    }

    /// Interns a term known to be absent, keeping all three stores in step.
    fn insert(&mut self, key: &str, term: &Term, complexity: usize, outbox: &mut Outbox) {
        if let Some(evicted) = self.cache.set_with_eviction(key, term.clone()) {
            self.purge(evicted, outbox);
        }
        self.complexity.insert(String::from(key), complexity);
        self.diversity.register_term(term);
    }

    /// Drops an evicted key from the complexity table and the diversity
    /// registry. The interning cache has already let go of it.
    fn purge(&mut self, key: String, outbox: &mut Outbox) {
        log::debug!("evicted {key}");
        self.complexity.remove(&key);
        self.diversity.unregister_term(&key);
        outbox.push(|| FactoryEvent::Evicted { name: key });
    }
}

/// Events collected under the lock and emitted after it is released.
struct Outbox {
    enabled: bool,
    events: Vec<FactoryEvent>,
}

impl Outbox {
    #[inline]
    fn push(&mut self, event: impl FnOnce() -> FactoryEvent) {
        if self.enabled {
            self.events.push(event());
        }
    }
}

/// Canonicalizing, hash-consing constructor of [`Term`] values.
///
/// The factory owns the interning cache, the complexity table and the
/// diversity tracker behind a single lock and is meant to be shared by
/// reference (or in an [`Arc`]) between all collaborators of a reasoner.
///
/// ```rust
/// use narsese_terms::TermFactory;
/// let f = TermFactory::new();
/// let (a, b) = (f.atomic("a").unwrap(), f.atomic("b").unwrap());
/// let ab = f.conjunction([&a, &b]).unwrap();
/// assert_eq!(ab, f.conjunction([&b, &a]).unwrap());
/// assert_eq!(ab.name(), "(&&, a, b)");
/// assert_eq!(f.negation(f.negation(&a).unwrap()).unwrap(), a);
/// ```
pub struct TermFactory {
    state: Mutex<State>,
    events: Option<Arc<dyn EventSink>>,
    config: FactoryConfig,
}

impl Default for TermFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TermFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermFactory")
            .field("config", &self.config())
            .field("stats", &self.stats())
            .finish()
    }
}

impl TermFactory {
    /// Create a factory with the default configuration.
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    /// Create a factory with an [`LruTermCache`] and an
    /// [`OperatorDiversity`] tracker.
    pub fn with_config(config: FactoryConfig) -> Self {
        Self::with_collaborators(
            config,
            LruTermCache::new(config.max_cache_size),
            OperatorDiversity::new(),
        )
    }

    /// Create a factory around caller supplied collaborators. The cache is
    /// cleared and resized to `config.max_cache_size`.
    pub fn with_collaborators(
        config: FactoryConfig,
        cache: impl TermCache + 'static,
        diversity: impl DiversityTracker + 'static,
    ) -> Self {
        let mut cache: Box<dyn TermCache> = Box::new(cache);
        cache.clear();
        cache.set_max_size(config.max_cache_size);
        Self {
            state: Mutex::new(State {
                cache,
                complexity: HashMap::new(),
                diversity: Box::new(diversity),
                hits: 0,
                misses: 0,
            }),
            events: None,
            config,
        }
    }

    /// Attach an event sink.
    pub fn with_events(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Some(Arc::new(sink));
        self
    }

    /// Returns the current configuration. The cache capacity reflects
    /// any later [`set_max_cache_size`](Self::set_max_cache_size).
    pub fn config(&self) -> FactoryConfig {
        FactoryConfig {
            max_cache_size: self.lock().cache.stats().max_size,
            ..self.config
        }
    }

    #[inline]
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    #[inline]
    fn outbox(&self) -> Outbox {
        Outbox {
            enabled: self.events.is_some(),
            events: Vec::new(),
        }
    }

    fn flush(&self, outbox: Outbox) {
        if let Some(sink) = &self.events {
            for event in &outbox.events {
                sink.emit(event);
            }
        }
    }

    fn notify(&self, event: impl FnOnce() -> FactoryEvent) {
        if let Some(sink) = &self.events {
            sink.emit(&event());
        }
    }

    // ----------------------------------------------------------------
    // Creation
    // ----------------------------------------------------------------

    /// Create a term from any [`TermSpec`]: an atom name, an existing
    /// term or a compound spec whose components are resolved recursively.
    pub fn create(&self, spec: impl Into<TermSpec>) -> Result<Term, TermError> {
        match spec.into() {
            TermSpec::Name(name) => self.atomic(name),
            TermSpec::Term(term) => Ok(self.adopt(term)),
            TermSpec::Compound { oper, components } => {
                let oper: Oper = oper.parse()?;
                let components = components
                    .into_iter()
                    .map(|c| self.create(c))
                    .collect::<Result<Vec<_>, _>>()?;
                self.build(oper, components)
            }
        }
    }

    /// Create `oper` applied to `components`.
    pub fn create_compound(
        &self,
        oper: impl AsRef<str>,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.create(TermSpec::compound(oper, components))
    }

    /// Create a term from its JSON description (see [`TermSpec::from_json`]).
    pub fn create_json(&self, value: &Value) -> Result<Term, TermError> {
        self.create(TermSpec::from_json(value)?)
    }

    /// Create or fetch an atom. Atoms skip canonicalization and always
    /// have complexity 1.
    pub fn atomic(&self, name: impl AsRef<str>) -> Result<Term, TermError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(TermError::InvalidInput);
        }
        Ok(self.intern(name, || Term::new_atom(name)))
    }

    /// Create a variable. Names without a variable prefix get `?`.
    pub fn variable(&self, name: impl AsRef<str>) -> Result<Term, TermError> {
        let name = name.as_ref();
        if name.starts_with(['?', '$', '#']) {
            self.atomic(name)
        } else if name.is_empty() {
            Err(TermError::InvalidInput)
        } else {
            let mut prefixed = String::from("?");
            prefixed.push_str(name);
            self.atomic(prefixed)
        }
    }

    /// Applies the rewrite rules in a bounded loop, then interns.
    fn build(&self, mut oper: Oper, mut components: Vec<Term>) -> Result<Term, TermError> {
        for _ in 0..self.config.max_rewrite_steps {
            match rewrite::reduce(&oper, &components) {
                None => return self.intern_compound(oper, components),
                Some((rule, Reduction::Collapse(term))) => {
                    log::trace!("{rule}: ({oper}, ..) -> {term}");
                    self.notify(|| FactoryEvent::Rewritten { rule });
                    return Ok(self.adopt(term));
                }
                Some((
                    rule,
                    Reduction::Wrap {
                        outer,
                        inner_oper,
                        inner,
                    },
                )) => {
                    log::trace!("{rule}: ({oper}, ..) -> ({outer}, ({inner_oper}, ..))");
                    self.notify(|| FactoryEvent::Rewritten { rule });
                    let inner = self.build(inner_oper, inner)?;
                    oper = outer;
                    components = vec![inner];
                }
            }
        }
        Err(TermError::RewriteLimitExceeded(self.config.max_rewrite_steps))
    }

    fn intern_compound(&self, oper: Oper, components: Vec<Term>) -> Result<Term, TermError> {
        let components = normalize(&oper, components)?;
        let components = canonicalize(&oper, components)?;
        let name = canonical_name(&oper, &components);
        Ok(self.intern(&name, || {
            Term::new_compound(name.clone(), oper, components)
        }))
    }

    /// Get-or-insert under the lock.
    fn intern(&self, name: &str, build: impl FnOnce() -> Term) -> Term {
        let mut outbox = self.outbox();
        let term = {
            let mut state = self.lock();
            if let Some(term) = state.cache.get(name) {
                state.hits += 1;
                log::trace!("hit {name}");
                outbox.push(|| FactoryEvent::CacheHit { name: name.into() });
                term
            } else {
                state.misses += 1;
                let term = build();
                let complexity = state.complexity_of(&term);
                log::trace!("miss {name} (complexity {complexity})");
                outbox.push(|| FactoryEvent::CacheMiss {
                    name: name.into(),
                    complexity,
                });
                state.insert(name, &term, complexity, &mut outbox);
                term
            }
        };
        self.flush(outbox);
        term
    }

    /// Returns the cached instance named like `term`, re-interning `term`
    /// itself if that name was evicted. Not counted as a hit or a miss.
    fn adopt(&self, term: Term) -> Term {
        let mut outbox = self.outbox();
        let term = {
            let mut state = self.lock();
            match state.cache.get(term.name()) {
                Some(cached) => cached,
                None => {
                    let complexity = state.complexity_of(&term);
                    let key = String::from(term.name());
                    state.insert(&key, &term, complexity, &mut outbox);
                    term
                }
            }
        };
        self.flush(outbox);
        term
    }

    // ----------------------------------------------------------------
    // Connectives
    // ----------------------------------------------------------------

    /// `(-->, subject, predicate)`
    pub fn inheritance(
        &self,
        subject: impl Into<TermSpec>,
        predicate: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Inheritance, subject, predicate)
    }

    /// `(<->, a, b)`
    pub fn similarity(
        &self,
        a: impl Into<TermSpec>,
        b: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Similarity, a, b)
    }

    /// `(==>, antecedent, consequent)`
    pub fn implication(
        &self,
        antecedent: impl Into<TermSpec>,
        consequent: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Implication, antecedent, consequent)
    }

    /// `(<=>, a, b)`
    pub fn equivalence(
        &self,
        a: impl Into<TermSpec>,
        b: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Equivalence, a, b)
    }

    /// `(=, a, b)`
    pub fn equality(
        &self,
        a: impl Into<TermSpec>,
        b: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Equality, a, b)
    }

    /// `(-, a, b)`
    pub fn difference(
        &self,
        a: impl Into<TermSpec>,
        b: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Difference, a, b)
    }

    /// `(^, predicate, args)`: predicate application.
    pub fn predicate(
        &self,
        predicate: impl Into<TermSpec>,
        args: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        self.binary(Oper::Apply, predicate, args)
    }

    /// `(--, term)`
    pub fn negation(&self, term: impl Into<TermSpec>) -> Result<Term, TermError> {
        self.variadic(Oper::Negation, [term])
    }

    /// `(Δ, term)`
    pub fn delta(&self, term: impl Into<TermSpec>) -> Result<Term, TermError> {
        self.variadic(Oper::Delta, [term])
    }

    /// `(&&, …)`
    pub fn conjunction(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Conjunction, components)
    }

    /// `(||, …)`
    pub fn disjunction(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Disjunction, components)
    }

    /// `(&|, …)`
    pub fn parallel(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Parallel, components)
    }

    /// `(&/, …)`
    pub fn sequence(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Sequence, components)
    }

    /// `(*, …)`
    pub fn product(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Product, components)
    }

    /// `({}, …)`
    pub fn ext_set(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::ExtSet, components)
    }

    /// `([], …)`
    pub fn int_set(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::IntSet, components)
    }

    /// `(…)`
    pub fn tuple(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::Tuple, components)
    }

    /// `(/, relation, …)`
    pub fn ext_image(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::ExtImage, components)
    }

    /// `(\, relation, …)`
    pub fn int_image(
        &self,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        self.variadic(Oper::IntImage, components)
    }

    #[inline]
    fn binary(
        &self,
        oper: Oper,
        a: impl Into<TermSpec>,
        b: impl Into<TermSpec>,
    ) -> Result<Term, TermError> {
        let a = self.create(a)?;
        let b = self.create(b)?;
        self.build(oper, vec![a, b])
    }

    fn variadic(
        &self,
        oper: Oper,
        components: impl IntoIterator<Item = impl Into<TermSpec>>,
    ) -> Result<Term, TermError> {
        let components = components
            .into_iter()
            .map(|c| self.create(c))
            .collect::<Result<Vec<_>, _>>()?;
        self.build(oper, components)
    }

    // ----------------------------------------------------------------
    // Sentinels
    // ----------------------------------------------------------------

    pub fn create_true(&self) -> Term {
        self.intern(TRUE, || Term::new_atom(TRUE))
    }

    pub fn create_false(&self) -> Term {
        self.intern(FALSE, || Term::new_atom(FALSE))
    }

    pub fn create_null(&self) -> Term {
        self.intern(NULL, || Term::new_atom(NULL))
    }

    /// Returns `true` for the `True`, `False` and `Null` atoms.
    pub fn is_system_atom(&self, term: &Term) -> bool {
        term.is_atom() && SYSTEM_ATOMS.contains(&term.name())
    }

    // ----------------------------------------------------------------
    // Queries and maintenance
    // ----------------------------------------------------------------

    /// Structural complexity of a term or canonical name; `1` for names
    /// that are not cached.
    pub fn complexity(&self, key: impl AsRef<str>) -> usize {
        self.lock()
            .complexity
            .get(key.as_ref())
            .copied()
            .unwrap_or(1)
    }

    /// Diversity score of `term` according to the tracker.
    pub fn diversity(&self, term: &Term) -> f64 {
        self.lock().diversity.evaluate_diversity(term)
    }

    /// Returns `true` if a term with this canonical name is cached.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.lock().cache.has(name.as_ref())
    }

    /// Returns the cached term with this canonical name and marks it as
    /// recently used.
    pub fn lookup(&self, name: impl AsRef<str>) -> Option<Term> {
        self.lock().cache.get(name.as_ref())
    }

    pub fn cache_size(&self) -> usize {
        self.lock().cache.size()
    }

    /// Changes the cache capacity. Shrinking evicts least recently used
    /// terms together with their complexity and diversity entries.
    pub fn set_max_cache_size(&self, max_size: usize) {
        let mut outbox = self.outbox();
        {
            let mut state = self.lock();
            for key in state.cache.set_max_size(max_size) {
                state.purge(key, &mut outbox);
            }
        }
        self.flush(outbox);
    }

    /// Drops every cached term, complexity entry and diversity
    /// registration. Hit and miss counters are kept.
    pub fn clear_cache(&self) {
        {
            let mut state = self.lock();
            state.cache.clear();
            state.complexity.clear();
            state.diversity.clear();
        }
        log::debug!("cache cleared");
        self.notify(|| FactoryEvent::Cleared);
    }

    pub fn stats(&self) -> FactoryStats {
        let state = self.lock();
        let CacheStats {
            size,
            max_size,
            evictions,
        } = state.cache.stats();
        let total = state.hits + state.misses;
        FactoryStats {
            cache_size: size,
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total == 0 {
                0.0
            } else {
                state.hits as f64 / total as f64
            },
            max_cache_size: max_size,
            evictions,
            diversity: state.diversity.metrics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TermFactory>();
        assert_send_sync::<Term>();
    }

    #[test]
    fn config_setters_clamp_to_one() {
        let c = FactoryConfig::default()
            .with_max_cache_size(0)
            .with_max_rewrite_steps(0);
        assert_eq!(c.max_cache_size, 1);
        assert_eq!(c.max_rewrite_steps, 1);
    }

    #[test]
    fn atoms_are_interned() {
        let f = TermFactory::new();
        let a = f.atomic("cat").unwrap();
        let b = f.atomic("cat").unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(f.stats().hits, 1);
        assert_eq!(f.stats().misses, 1);
        assert_eq!(f.complexity(&a), 1);
    }

    #[test]
    fn empty_atom_is_invalid_input() {
        let f = TermFactory::new();
        assert_eq!(f.atomic("").unwrap_err(), TermError::InvalidInput);
        assert_eq!(f.variable("").unwrap_err(), TermError::InvalidInput);
    }

    #[test]
    fn empty_operator_is_invalid() {
        let f = TermFactory::new();
        assert!(matches!(
            f.create_compound("", ["a"]),
            Err(TermError::InvalidOperator(_))
        ));
    }

    #[test]
    fn complexity_of_compound() {
        let f = TermFactory::new();
        let ab = f.conjunction(["a", "b"]).unwrap();
        assert_eq!(f.complexity(&ab), 1 + 2 + 1 + 1);
        let n = f.negation(&ab).unwrap();
        assert_eq!(f.complexity(n.name()), 1 + 1 + 5);
    }

    #[test]
    fn complexity_survives_evicted_components() {
        let f = TermFactory::with_config(FactoryConfig::default().with_max_cache_size(1));
        let a = f.atomic("a").unwrap();
        let b = f.atomic("b").unwrap();
        // re-interning b pushes a out before the product is measured
        let ab = f.product([&a, &b]).unwrap();
        assert_eq!(f.complexity(&ab), 5);
        assert_eq!(f.cache_size(), 1);
    }

    #[test]
    fn rewrite_limit_is_enforced() {
        let f = TermFactory::with_config(FactoryConfig::default().with_max_rewrite_steps(1));
        let b = f.atomic("b").unwrap();
        let nb = f.negation(&b).unwrap();
        // the implication rewrite needs a second step to intern the negation
        assert_eq!(
            f.implication("a", &nb).unwrap_err(),
            TermError::RewriteLimitExceeded(1)
        );
    }

    #[test]
    fn adopting_an_evicted_term_reinterns_it() {
        let f = TermFactory::with_config(FactoryConfig::default().with_max_cache_size(2));
        let a = f.atomic("a").unwrap();
        f.atomic("b").unwrap();
        f.atomic("c").unwrap();
        assert!(!f.contains("a"));
        let again = f.create(&a).unwrap();
        assert!(again.ptr_eq(&a));
        assert!(f.contains("a"));
    }

    #[test]
    fn system_atoms() {
        let f = TermFactory::new();
        let t = f.create_true();
        assert_eq!(t.name(), TRUE);
        assert!(t.ptr_eq(&f.atomic("True").unwrap()));
        assert!(f.is_system_atom(&t));
        assert!(f.is_system_atom(&f.create_false()));
        assert!(f.is_system_atom(&f.create_null()));
        assert!(!f.is_system_atom(&f.atomic("true").unwrap()));
        let neg = f.negation(&t).unwrap();
        assert!(!f.is_system_atom(&neg));
    }

    #[test]
    fn lookup_and_contains() {
        let f = TermFactory::new();
        let t = f.inheritance("cat", "animal").unwrap();
        assert!(f.contains("(-->, cat, animal)"));
        assert!(f.lookup("(-->, cat, animal)").unwrap().ptr_eq(&t));
        assert!(f.lookup("(-->, dog, animal)").is_none());
    }
}
