//! Where the preloading task of a [`PreloadingCache`](crate::PreloadingCache) runs.

mod thread_spawner;
#[cfg(feature = "tokio")]
mod tokio_spawner;

use std::future::IntoFuture;

pub use thread_spawner::{ThreadSpawner, ThreadSpawnerHandle, ThreadSpawnerHandleFuture};
#[cfg(feature = "tokio")]
pub use tokio_spawner::TokioSpawner;

pub trait TaskSpawner {
    type Error;
    type Handle<T: Send>: IntoFuture<Output = Result<T, Self::Error>>;

    /// Runs `task` to completion independently of the caller. Only `task` itself has to be
    /// `Send`, the future it turns into is built where it runs.
    fn spawn<T, F>(&self, task: F) -> Self::Handle<T>
    where
        T: 'static + Send,
        F: 'static + Send + IntoFuture<Output = T>;
}
