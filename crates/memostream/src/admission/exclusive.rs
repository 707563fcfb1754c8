use std::{
    borrow::Cow,
    sync::atomic::{AtomicBool, Ordering},
};

use memostream_core::SequenceSource;
use memostream_internals::Notify;

use super::{Admission, Sealed};
use crate::gate::{GateGuard, ProductionGate};

/// One cursor at a time. The gate is never contended; creating a second cursor while the
/// first is alive fails with [`CacheError::CursorInUse`](crate::CacheError::CursorInUse).
pub struct Exclusive<S: SequenceSource> {
    gate: ProductionGate<S>,
    in_use: AtomicBool,
}

impl<S: SequenceSource> Exclusive<S> {
    pub(crate) fn new(source: S, label: Cow<'static, str>, release_on_exhaustion: bool) -> Self {
        Self {
            gate: ProductionGate::new(source, label, release_on_exhaustion),
            in_use: AtomicBool::new(false),
        }
    }
}

impl<S: SequenceSource> Sealed for Exclusive<S> {}

impl<S: SequenceSource> Admission for Exclusive<S> {
    type Source = S;

    fn admit<'a>(&'a self, on_release: &'a Notify) -> Option<GateGuard<'a, S>> {
        self.gate.try_acquire(on_release)
    }

    fn attach(&self) -> bool {
        self.in_use
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    fn detach(&self) {
        self.in_use.store(false, Ordering::Release);
    }

    async fn close(&self) {
        self.gate.release_source().await
    }
}
