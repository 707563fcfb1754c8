use std::future::IntoFuture;

use tokio::{
    runtime::Handle,
    task::{JoinError, JoinHandle},
};

use super::TaskSpawner;

/// Spawns tasks onto a tokio runtime. The task is driven on a blocking thread of that runtime,
/// so its future does not need to be `Send`.
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: Handle,
}

impl TokioSpawner {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime the caller runs on.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TaskSpawner for TokioSpawner {
    type Error = JoinError;
    type Handle<T: Send> = JoinHandle<T>;

    fn spawn<T, F>(&self, task: F) -> Self::Handle<T>
    where
        T: 'static + Send,
        F: 'static + Send + IntoFuture<Output = T>,
    {
        let handle = self.handle.clone();
        self.handle
            .spawn_blocking(move || handle.block_on(task.into_future()))
    }
}
