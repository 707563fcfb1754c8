use std::{
    borrow::Cow,
    sync::{
        atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering},
        Arc, OnceLock,
    },
};

use memostream_internals::{Notify, Wait};
use tracing::{debug, trace, warn};

use crate::{
    buffer::{Entry, SharedBuffer},
    stats::Stats,
};

const STATE_OPEN: u8 = 0;
const STATE_EXHAUSTED: u8 = 1;
const STATE_FAULTED: u8 = 2;
const STATE_ABANDONED: u8 = 3;
const STATE_CLOSED: u8 = 4;

/// The buffer of a cache together with how production ended, if it has.
///
/// `state` only leaves `STATE_OPEN` once, except for `STATE_CLOSED` which overrides any state.
/// Every change is followed by a `send` on `on_change`.
#[derive(Debug)]
pub(crate) struct Frontier<T, E> {
    label: Cow<'static, str>,
    buffer: SharedBuffer<T>,
    state: AtomicU8,
    fault: OnceLock<Arc<E>>,
    on_change: Notify,
    source_calls: AtomicU64,
    active_cursors: AtomicUsize,
}

pub(crate) enum Step<T, E> {
    Cached(Entry<T>),
    Frontier,
    End,
    Fault(Arc<E>),
    Abandoned,
    Closed,
}

impl<T, E> Frontier<T, E> {
    pub(crate) fn new(label: Cow<'static, str>) -> Self {
        Self {
            label,
            buffer: SharedBuffer::new(),
            state: AtomicU8::new(STATE_OPEN),
            fault: OnceLock::new(),
            on_change: Notify::new(),
            source_calls: AtomicU64::new(0),
            active_cursors: AtomicUsize::new(0),
        }
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn buffer(&self) -> &SharedBuffer<T> {
        &self.buffer
    }

    pub(crate) fn on_change(&self) -> &Notify {
        &self.on_change
    }

    /// Must be called before `step` so that a change in between is not missed.
    pub(crate) fn changed(&self) -> Wait<'_> {
        self.on_change.wait()
    }

    /// What lies after `position` right now.
    pub(crate) fn step(&self, position: Option<&Entry<T>>) -> Step<T, E> {
        // the state is read before the link: a terminal state is stored after the last append.
        let state = self.state.load(Ordering::Acquire);
        if state == STATE_CLOSED {
            return Step::Closed;
        }

        if let Some(next) = self.buffer.successor(position) {
            return Step::Cached(next);
        }

        match state {
            STATE_OPEN => Step::Frontier,
            STATE_EXHAUSTED => Step::End,
            STATE_FAULTED => match self.fault.get() {
                Some(err) => Step::Fault(Arc::clone(err)),
                None => unreachable!("faulted frontier without an error"),
            },
            STATE_ABANDONED => Step::Abandoned,
            v => unreachable!("invalid frontier state: {}", v),
        }
    }

    /// Records the outcome of one completed call into the source.
    pub(crate) fn record(&self, produced: Result<Option<T>, E>) {
        self.source_calls.fetch_add(1, Ordering::Relaxed);
        match produced {
            Ok(Some(item)) => self.publish(item),
            Ok(None) => self.finish(),
            Err(err) => self.fault(err),
        }
    }

    fn publish(&self, item: T) {
        let entry = self.buffer.append(item);
        trace!(label = %self.label, index = entry.index(), "item cached");
        self.on_change.send();
    }

    fn finish(&self) {
        if self.transition(STATE_EXHAUSTED) {
            debug!(label = %self.label, len = self.buffer.len(), "source exhausted");
        }
        self.on_change.send();
    }

    fn fault(&self, err: E) {
        let _ = self.fault.set(Arc::new(err));
        if self.transition(STATE_FAULTED) {
            warn!(label = %self.label, len = self.buffer.len(), "source faulted");
        }
        self.on_change.send();
    }

    pub(crate) fn abandon(&self) {
        if self.transition(STATE_ABANDONED) {
            warn!(label = %self.label, len = self.buffer.len(), "production abandoned");
        }
        self.on_change.send();
    }

    /// Returns `true` for the call that actually closed the frontier.
    pub(crate) fn close(&self) -> bool {
        let old = self.state.swap(STATE_CLOSED, Ordering::AcqRel);
        self.on_change.send();
        if old == STATE_CLOSED {
            return false;
        }
        debug!(label = %self.label, len = self.buffer.len(), "cache closed");
        true
    }

    fn transition(&self, to: u8) -> bool {
        self.state
            .compare_exchange(STATE_OPEN, to, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_CLOSED
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_EXHAUSTED
    }

    pub(crate) fn cursor_attached(&self) {
        self.active_cursors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn cursor_detached(&self) {
        self.active_cursors.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn stats(&self) -> Stats {
        Stats {
            source_calls: self.source_calls.load(Ordering::Relaxed),
            cached: self.buffer.len(),
            active_cursors: self.active_cursors.load(Ordering::Relaxed),
        }
    }
}
