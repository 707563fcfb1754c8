use std::sync::Arc;

use futures::{stream, Stream};

use crate::{
    admission::{Admission, ErrorOf, ItemOf},
    buffer::Entry,
    cache::Shared,
    error::CacheError,
    frontier::Step,
};

enum CursorState<T> {
    Unstarted,
    Positioned(Entry<T>),
    Exhausted,
}

/// An independent traversal over a cache.
///
/// Items behind the frontier are replayed from the buffer without touching the source. At the
/// frontier the admission of the cache decides whether this cursor produces the next item or
/// waits for whoever does.
pub struct Cursor<A: Admission> {
    shared: Arc<Shared<A>>,
    state: CursorState<ItemOf<A>>,
}

pub type CursorResult<A> = Result<Option<Entry<ItemOf<A>>>, CacheError<ErrorOf<A>>>;

impl<A: Admission> Cursor<A> {
    /// `shared.admission` must already have admitted this cursor through `attach`.
    pub(crate) fn new(shared: Arc<Shared<A>>) -> Self {
        shared.frontier.cursor_attached();
        Self {
            shared,
            state: CursorState::Unstarted,
        }
    }

    /// Moves to the next item.
    ///
    /// Returns `Ok(None)` once the source is exhausted, and keeps doing so on further calls.
    /// A source failure is returned to every cursor that reaches the end of the cached items.
    pub async fn advance(&mut self) -> CursorResult<A> {
        let frontier = &self.shared.frontier;
        let position = match &self.state {
            CursorState::Unstarted => None,
            CursorState::Positioned(entry) => Some(entry.clone()),
            CursorState::Exhausted if frontier.is_closed() => return Err(CacheError::Released),
            CursorState::Exhausted => return Ok(None),
        };

        loop {
            let changed = frontier.changed();
            match frontier.step(position.as_ref()) {
                Step::Cached(entry) => {
                    self.state = CursorState::Positioned(entry.clone());
                    return Ok(Some(entry));
                }
                Step::End => {
                    self.state = CursorState::Exhausted;
                    return Ok(None);
                }
                Step::Fault(err) => return Err(CacheError::Source(err)),
                Step::Abandoned => return Err(CacheError::Abandoned),
                Step::Closed => return Err(CacheError::Released),
                Step::Frontier => {}
            }

            let Some(mut gate) = self.shared.admission.admit(frontier.on_change()) else {
                changed.await;
                continue;
            };

            // the previous owner may have produced the successor after our step.
            if let Step::Frontier = frontier.step(position.as_ref()) {
                if let Some(produced) = gate.produce().await {
                    frontier.record(produced);
                }
            }
        }
    }

    /// The item the cursor is positioned on.
    pub fn current(&self) -> Option<&Entry<ItemOf<A>>> {
        match &self.state {
            CursorState::Positioned(entry) => Some(entry),
            _ => None,
        }
    }

    /// Index of the current item.
    pub fn position(&self) -> Option<usize> {
        self.current().map(Entry::index)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.state, CursorState::Exhausted)
    }

    /// Moves back before the first item, as if the cursor had just been created.
    pub fn reset(&mut self) {
        self.state = CursorState::Unstarted;
    }

    /// A stream of the remaining items. It ends after the last item or after the first error.
    pub fn into_stream(
        self,
    ) -> impl Stream<Item = Result<Entry<ItemOf<A>>, CacheError<ErrorOf<A>>>> {
        stream::unfold(Some(self), |cursor| async move {
            let mut cursor = cursor?;
            match cursor.advance().await {
                Ok(Some(entry)) => Some((Ok(entry), Some(cursor))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    /// An iterator over the remaining items that blocks the calling thread on every step.
    pub fn blocking(self) -> Blocking<A> {
        Blocking {
            cursor: self,
            done: false,
        }
    }
}

impl<A: Admission> std::fmt::Debug for Cursor<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("label", &self.shared.frontier.label())
            .field("position", &self.position())
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

impl<A: Admission> Drop for Cursor<A> {
    fn drop(&mut self) {
        self.shared.admission.detach();
        self.shared.frontier.cursor_detached();
    }
}

/// See [`Cursor::blocking`].
pub struct Blocking<A: Admission> {
    cursor: Cursor<A>,
    done: bool,
}

impl<A: Admission> Blocking<A> {
    pub fn into_inner(self) -> Cursor<A> {
        self.cursor
    }
}

impl<A: Admission> Iterator for Blocking<A> {
    type Item = Result<Entry<ItemOf<A>>, CacheError<ErrorOf<A>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match pollster::block_on(self.cursor.advance()) {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
