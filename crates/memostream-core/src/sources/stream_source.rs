use futures::{
    future::Map,
    stream::{self, TryNext},
    FutureExt, Stream, StreamExt, TryStream, TryStreamExt,
};

use crate::{Never, SequenceSource};

/// Adapts an infallible [`Stream`].
#[derive(Debug)]
pub struct StreamSource<St> {
    stream: St,
}

impl<St: Stream + Unpin> StreamSource<St> {
    pub fn new(stream: St) -> Self {
        Self { stream }
    }
}

type Infallible<T> = fn(Option<T>) -> Result<Option<T>, Never>;

impl<St: Stream + Unpin> SequenceSource for StreamSource<St> {
    type Item = St::Item;
    type Error = Never;
    type Next<'a>
        = Map<stream::Next<'a, St>, Infallible<St::Item>>
    where
        St: 'a;

    fn next(&mut self) -> Self::Next<'_> {
        self.stream.next().map(Ok as Infallible<St::Item>)
    }
}

/// Adapts a [`TryStream`]; an `Err` item is reported as a fault of the source.
#[derive(Debug)]
pub struct TryStreamSource<St> {
    stream: St,
}

impl<St: TryStream + Unpin> TryStreamSource<St> {
    pub fn new(stream: St) -> Self {
        Self { stream }
    }
}

impl<St: TryStream + Unpin> SequenceSource for TryStreamSource<St> {
    type Item = St::Ok;
    type Error = St::Error;
    type Next<'a>
        = TryNext<'a, St>
    where
        St: 'a;

    fn next(&mut self) -> Self::Next<'_> {
        self.stream.try_next()
    }
}
