use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError<E> {
    /// The source failed. Every cursor reaching the end of the cached items observes the same
    /// error.
    #[error("source failed: {0}")]
    Source(Arc<E>),
    /// The cache was closed and its source released.
    #[error("cache is already closed")]
    Released,
    /// An exclusive cache already has a live cursor.
    #[error("another cursor is already traversing this cache")]
    CursorInUse,
    /// The preloading task ended before the source was drained.
    #[error("preloader terminated before the source was exhausted")]
    Abandoned,
}

impl<E> Clone for CacheError<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Source(err) => Self::Source(Arc::clone(err)),
            Self::Released => Self::Released,
            Self::CursorInUse => Self::CursorInUse,
            Self::Abandoned => Self::Abandoned,
        }
    }
}

impl<E> CacheError<E> {
    /// The source error, if this is a source failure.
    pub fn source_error(&self) -> Option<&E> {
        match self {
            Self::Source(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
