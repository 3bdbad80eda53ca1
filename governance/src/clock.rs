//! Source of the current time.

use coffer_types::Timestamp;
use std::sync::Arc;

/// Anything that can tell the engine what time it is.
///
/// Deadlines are compared against this, so tests can swap in a clock that
/// only moves when told to.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
