use std::sync::Arc;

use memostream_core::SequenceSource;
use memostream_internals::into_future_fn;

use crate::{
    admission::{Admission, Contended, ErrorOf, Exclusive, ItemOf, Preloaded},
    cursor::Cursor,
    error::CacheError,
    frontier::Frontier,
    gate::SourceCell,
    parameter::CacheParameter,
    preloader::preload,
    stats::Stats,
    task_spawner::{TaskSpawner, ThreadSpawner},
};

pub(crate) struct Shared<A: Admission> {
    pub(crate) frontier: Arc<Frontier<ItemOf<A>, ErrorOf<A>>>,
    pub(crate) admission: A,
}

/// A sequence source whose items are fetched at most once and can be traversed by any number
/// of cursors, concurrently or one after another.
///
/// Clones share the same cache. The source is released when the cache is closed, or when the
/// last clone and the last cursor are dropped.
pub struct MemoCache<A: Admission> {
    shared: Arc<Shared<A>>,
}

/// Cursors race for the source at the frontier; one produces while the others wait.
pub type ContendedCache<S> = MemoCache<Contended<S>>;
/// At most one cursor at a time.
pub type ExclusiveCache<S> = MemoCache<Exclusive<S>>;
/// A background task drains the source eagerly.
pub type PreloadingCache<S, Sp = ThreadSpawner> = MemoCache<Preloaded<S, Sp>>;

impl<A: Admission> Clone for MemoCache<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<A: Admission> std::fmt::Debug for MemoCache<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoCache")
            .field("label", &self.label())
            .field("stats", &self.stats())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl<A: Admission> MemoCache<A> {
    fn from_parts(frontier: Arc<Frontier<ItemOf<A>, ErrorOf<A>>>, admission: A) -> Self {
        Self {
            shared: Arc::new(Shared {
                frontier,
                admission,
            }),
        }
    }

    /// A new cursor positioned before the first item.
    pub fn cursor(&self) -> Result<Cursor<A>, CacheError<ErrorOf<A>>> {
        if self.shared.frontier.is_closed() {
            return Err(CacheError::Released);
        }
        if !self.shared.admission.attach() {
            return Err(CacheError::CursorInUse);
        }
        Ok(Cursor::new(Arc::clone(&self.shared)))
    }

    /// Stops production and releases the source, waiting for a call into the source that is
    /// in flight. Cursors fail with [`CacheError::Released`] afterwards, and so does a second
    /// `close`.
    pub async fn close(&self) -> Result<(), CacheError<ErrorOf<A>>> {
        if !self.shared.frontier.close() {
            return Err(CacheError::Released);
        }
        self.shared.admission.close().await;
        Ok(())
    }

    pub fn label(&self) -> &str {
        self.shared.frontier.label()
    }

    /// Number of cached items.
    pub fn len(&self) -> usize {
        self.shared.frontier.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the source reported its end. Every item is cached then.
    pub fn is_exhausted(&self) -> bool {
        self.shared.frontier.is_exhausted()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.frontier.is_closed()
    }

    pub fn stats(&self) -> Stats {
        self.shared.frontier.stats()
    }
}

impl<S: SequenceSource> MemoCache<Contended<S>> {
    pub fn new(source: S) -> Self {
        Self::with_parameter(source, CacheParameter::default())
    }

    pub fn with_parameter(source: S, parameter: CacheParameter) -> Self {
        let release_on_exhaustion = parameter.release_on_exhaustion();
        let label = parameter.into_label();
        let frontier = Arc::new(Frontier::new(label.clone()));
        Self::from_parts(frontier, Contended::new(source, label, release_on_exhaustion))
    }
}

impl<S: SequenceSource> MemoCache<Exclusive<S>> {
    pub fn new(source: S) -> Self {
        Self::with_parameter(source, CacheParameter::default())
    }

    pub fn with_parameter(source: S, parameter: CacheParameter) -> Self {
        let release_on_exhaustion = parameter.release_on_exhaustion();
        let label = parameter.into_label();
        let frontier = Arc::new(Frontier::new(label.clone()));
        Self::from_parts(frontier, Exclusive::new(source, label, release_on_exhaustion))
    }
}

impl<S, Sp> MemoCache<Preloaded<S, Sp>>
where
    S: 'static + SequenceSource + Send,
    S::Item: 'static + Send + Sync,
    S::Error: 'static + Send + Sync,
    Sp: TaskSpawner,
{
    /// Starts draining `source` on a task spawned by `spawner`.
    pub fn new(source: S, spawner: Sp) -> Self {
        Self::with_parameter(source, spawner, CacheParameter::default())
    }

    /// The source is always released once it is exhausted, regardless of `parameter`.
    pub fn with_parameter(source: S, spawner: Sp, parameter: CacheParameter) -> Self {
        let label = parameter.into_label();
        let frontier = Arc::new(Frontier::new(label.clone()));
        let cell = SourceCell::new(source, label, true);
        let task = spawner.spawn({
            let frontier = Arc::clone(&frontier);
            into_future_fn(move || preload(frontier, cell))
        });

        let admission = Preloaded::new(Arc::clone(&frontier), task);
        Self::from_parts(frontier, admission)
    }
}
