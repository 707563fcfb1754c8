use std::{
    borrow::Cow,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use futures::lock::{Mutex, MutexGuard};
use memostream_core::SequenceSource;
use memostream_internals::Notify;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellState {
    Live,
    Exhausted,
    Released,
}

/// Exclusive owner of a source.
///
/// Remembers exhaustion so that the source is not called after it returned `Ok(None)`, and
/// releases the source exactly once, at the latest when dropped.
pub struct SourceCell<S: SequenceSource> {
    source: S,
    state: CellState,
    release_on_exhaustion: bool,
    label: Cow<'static, str>,
}

impl<S: SequenceSource> SourceCell<S> {
    pub(crate) fn new(source: S, label: Cow<'static, str>, release_on_exhaustion: bool) -> Self {
        Self {
            source,
            state: CellState::Live,
            release_on_exhaustion,
            label,
        }
    }

    /// Calls the source once, or returns `None` without calling it once it is exhausted or
    /// released.
    pub(crate) async fn produce(&mut self) -> Option<Result<Option<S::Item>, S::Error>> {
        if self.state != CellState::Live {
            return None;
        }

        let produced = self.source.next().await;
        if let Ok(None) = produced {
            self.state = CellState::Exhausted;
            if self.release_on_exhaustion {
                self.release();
            }
        }
        Some(produced)
    }

    pub(crate) fn release(&mut self) {
        if self.state == CellState::Released {
            return;
        }
        self.state = CellState::Released;
        self.source.release();
        trace!(label = %self.label, "source released");
    }
}

impl<S: SequenceSource> Drop for SourceCell<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Single-owner admission to a source.
pub(crate) struct ProductionGate<S: SequenceSource> {
    cell: Mutex<SourceCell<S>>,
}

impl<S: SequenceSource> ProductionGate<S> {
    pub(crate) fn new(source: S, label: Cow<'static, str>, release_on_exhaustion: bool) -> Self {
        Self {
            cell: Mutex::new(SourceCell::new(source, label, release_on_exhaustion)),
        }
    }

    /// Claims the gate if nobody owns it. `on_release` is signalled when the returned guard is
    /// dropped.
    pub(crate) fn try_acquire<'a>(&'a self, on_release: &'a Notify) -> Option<GateGuard<'a, S>> {
        let guard = self.cell.try_lock()?;
        trace!(label = %guard.label, "production gate acquired");
        Some(GateGuard {
            guard: ManuallyDrop::new(guard),
            on_release,
        })
    }

    /// Waits for the current owner, then releases the source.
    pub(crate) async fn release_source(&self) {
        self.cell.lock().await.release();
    }
}

pub struct GateGuard<'a, S: SequenceSource> {
    guard: ManuallyDrop<MutexGuard<'a, SourceCell<S>>>,
    on_release: &'a Notify,
}

impl<S: SequenceSource> Deref for GateGuard<'_, S> {
    type Target = SourceCell<S>;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<S: SequenceSource> DerefMut for GateGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<S: SequenceSource> Drop for GateGuard<'_, S> {
    // unlock before signalling, a woken waiter must be able to claim the gate.
    fn drop(&mut self) {
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        self.on_release.send();
    }
}
