use std::future::Future;

/// A pull-based producer of one item at a time.
///
/// `next` resolves to `Ok(Some(item))` for every produced item and to `Ok(None)` once the
/// source is drained. After `Ok(None)` has been returned, `next` must not be called again.
/// `Err(err)` reports a fault of the underlying producer.
///
/// `release` frees whatever backs the source. Owners call it exactly once, after the last
/// call to `next`.
pub trait SequenceSource {
    type Item;
    type Error;
    type Next<'a>: Future<Output = Result<Option<Self::Item>, Self::Error>>
    where
        Self: 'a;

    fn next(&mut self) -> Self::Next<'_>;

    fn release(&mut self) {}
}
