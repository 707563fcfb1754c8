use std::{
    future::IntoFuture,
    marker::PhantomData,
    sync::{Arc, Mutex, PoisonError},
};

use memostream_core::SequenceSource;
use memostream_internals::Notify;
use tracing::warn;

use super::{Admission, Sealed};
use crate::{frontier::Frontier, gate::GateGuard, task_spawner::TaskSpawner};

/// Production is owned by a background task that drains the source eagerly; cursors only wait.
pub struct Preloaded<S: SequenceSource, Sp: TaskSpawner> {
    frontier: Arc<Frontier<S::Item, S::Error>>,
    task: Mutex<Option<Sp::Handle<()>>>,
    _source: PhantomData<fn() -> S>,
}

impl<S: SequenceSource, Sp: TaskSpawner> Preloaded<S, Sp> {
    pub(crate) fn new(frontier: Arc<Frontier<S::Item, S::Error>>, task: Sp::Handle<()>) -> Self {
        Self {
            frontier,
            task: Mutex::new(Some(task)),
            _source: PhantomData,
        }
    }
}

impl<S: SequenceSource, Sp: TaskSpawner> Sealed for Preloaded<S, Sp> {}

impl<S: SequenceSource, Sp: TaskSpawner> Admission for Preloaded<S, Sp> {
    type Source = S;

    fn admit<'a>(&'a self, _: &'a Notify) -> Option<GateGuard<'a, S>> {
        None
    }

    async fn close(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(task) = task {
            if task.into_future().await.is_err() {
                warn!(label = %self.frontier.label(), "preloader task failed");
            }
        }
    }
}

impl<S: SequenceSource, Sp: TaskSpawner> Drop for Preloaded<S, Sp> {
    // stops the preloader once nothing can observe the buffer anymore.
    fn drop(&mut self) {
        self.frontier.close();
    }
}
