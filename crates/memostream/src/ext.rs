use memostream_core::SequenceSource;

use crate::{
    cache::{ContendedCache, ExclusiveCache, PreloadingCache},
    task_spawner::TaskSpawner,
};

/// Wraps any [`SequenceSource`] into a cache.
pub trait MemoizeExt: SequenceSource + Sized {
    /// See [`ContendedCache`].
    fn memoize(self) -> ContendedCache<Self> {
        ContendedCache::new(self)
    }

    /// See [`ExclusiveCache`].
    fn memoize_exclusive(self) -> ExclusiveCache<Self> {
        ExclusiveCache::new(self)
    }

    /// See [`PreloadingCache`].
    fn preload<Sp: TaskSpawner>(self, spawner: Sp) -> PreloadingCache<Self, Sp>
    where
        Self: 'static + Send,
        Self::Item: 'static + Send + Sync,
        Self::Error: 'static + Send + Sync,
    {
        PreloadingCache::<Self, Sp>::new(self, spawner)
    }
}

impl<S: SequenceSource> MemoizeExt for S {}
