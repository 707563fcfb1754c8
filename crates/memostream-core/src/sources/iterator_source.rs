use crate::{Never, SequenceSource};

#[derive(Debug)]
pub struct IteratorSource<I: Iterator> {
    iter: I,
}

impl<I: Iterator> IteratorSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(iter: T) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator> SequenceSource for IteratorSource<I> {
    type Item = I::Item;
    type Error = Never;
    type Next<'a>
        = std::future::Ready<Result<Option<I::Item>, Never>>
    where
        I: 'a;

    fn next(&mut self) -> Self::Next<'_> {
        std::future::ready(Ok(self.iter.next()))
    }
}
