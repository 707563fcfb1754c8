use std::sync::Arc;

use memostream_core::SequenceSource;
use tracing::debug;

use crate::{frontier::Frontier, gate::SourceCell};

// marks production as abandoned unless the loop reached a terminal state.
struct AbandonOnUnwind<'a, T, E> {
    frontier: &'a Frontier<T, E>,
    finished: bool,
}

impl<T, E> Drop for AbandonOnUnwind<'_, T, E> {
    fn drop(&mut self) {
        if !self.finished {
            self.frontier.abandon();
        }
    }
}

/// Drains `cell` into `frontier` until the source ends, fails, or the cache is closed.
/// The source is released when this returns.
pub(crate) async fn preload<S: SequenceSource>(
    frontier: Arc<Frontier<S::Item, S::Error>>,
    mut cell: SourceCell<S>,
) {
    debug!(label = %frontier.label(), "preloader started");
    let mut guard = AbandonOnUnwind {
        frontier: &*frontier,
        finished: false,
    };

    loop {
        if frontier.is_closed() {
            break;
        }

        let Some(produced) = cell.produce().await else {
            break;
        };
        let terminal = !matches!(produced, Ok(Some(_)));
        frontier.record(produced);
        if terminal {
            break;
        }
    }

    guard.finished = true;
    drop(guard);
    drop(cell);
    debug!(
        label = %frontier.label(),
        len = frontier.buffer().len(),
        "preloader stopped"
    );
}
