use std::borrow::Cow;

use memostream_core::SequenceSource;
use memostream_internals::Notify;

use super::{Admission, Sealed};
use crate::gate::{GateGuard, ProductionGate};

/// Any number of cursors; the first one to claim the gate produces, the others wait for it.
pub struct Contended<S: SequenceSource> {
    gate: ProductionGate<S>,
}

impl<S: SequenceSource> Contended<S> {
    pub(crate) fn new(source: S, label: Cow<'static, str>, release_on_exhaustion: bool) -> Self {
        Self {
            gate: ProductionGate::new(source, label, release_on_exhaustion),
        }
    }
}

impl<S: SequenceSource> Sealed for Contended<S> {}

impl<S: SequenceSource> Admission for Contended<S> {
    type Source = S;

    fn admit<'a>(&'a self, on_release: &'a Notify) -> Option<GateGuard<'a, S>> {
        self.gate.try_acquire(on_release)
    }

    async fn close(&self) {
        self.gate.release_source().await
    }
}
