use std::future::Future;

use crate::SequenceSource;

/// A source driven by a closure; each call produces the future of the next item.
pub struct FnSource<F> {
    f: F,
}

impl<F> std::fmt::Debug for FnSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnSource").finish_non_exhaustive()
    }
}

pub fn from_fn<T, E, Fut, F>(f: F) -> FnSource<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    FnSource { f }
}

impl<T, E, Fut, F> SequenceSource for FnSource<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    type Item = T;
    type Error = E;
    type Next<'a>
        = Fut
    where
        F: 'a;

    fn next(&mut self) -> Self::Next<'_> {
        (self.f)()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_counts_until_limit() {
        let mut n = 0;
        let mut source = from_fn(move || {
            n += 1;
            std::future::ready(Ok::<_, ()>((n <= 2).then_some(n)))
        });

        pollster::block_on(async {
            assert_eq!(source.next().await, Ok(Some(1)));
            assert_eq!(source.next().await, Ok(Some(2)));
            assert_eq!(source.next().await, Ok(None));
        });
    }
}
