//! Factory notifications.
//!
//! Events are best-effort and fire-and-forget: the factory collects them
//! while it holds its lock and hands them to the [`EventSink`] after the
//! lock is released, so a sink may freely call back into the factory.

use smartstring::alias::String;

/// Something observable that happened inside the factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryEvent {
    /// A creation request was answered from the interning cache.
    CacheHit { name: String },
    /// A creation request built and interned a new term.
    CacheMiss { name: String, complexity: usize },
    /// A term was evicted from the interning cache.
    Evicted { name: String },
    /// A creation request was rewritten before interning.
    Rewritten { rule: &'static str },
    /// The whole cache was cleared.
    Cleared,
}

impl FactoryEvent {
    /// Stable event name, e.g. for routing on an external bus.
    pub fn name(&self) -> &'static str {
        match self {
            FactoryEvent::CacheHit { .. } => "term.cache.hit",
            FactoryEvent::CacheMiss { .. } => "term.cache.miss",
            FactoryEvent::Evicted { .. } => "term.cache.evicted",
            FactoryEvent::Rewritten { .. } => "term.rewritten",
            FactoryEvent::Cleared => "term.cache.cleared",
        }
    }
}

/// Receiver of factory events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &FactoryEvent);
}

impl<F> EventSink for F
where
    F: Fn(&FactoryEvent) + Send + Sync,
{
    #[inline]
    fn emit(&self, event: &FactoryEvent) {
        self(event)
    }
}

/// Forwards events to the `log` facade at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEvents;

impl EventSink for LogEvents {
    fn emit(&self, event: &FactoryEvent) {
        log::trace!("{}: {:?}", event.name(), event);
    }
}
