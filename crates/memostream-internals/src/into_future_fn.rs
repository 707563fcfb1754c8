use std::future::IntoFuture;

/// Defers building a future until `into_future` is called, so that only the closure has to
/// cross a thread boundary.
pub fn into_future_fn<Fut, F>(f: F) -> FnOnceFuture<F>
where
    Fut: IntoFuture,
    F: FnOnce() -> Fut,
{
    FnOnceFuture { f }
}

pub struct FnOnceFuture<F> {
    f: F,
}

impl<Fut, F> IntoFuture for FnOnceFuture<F>
where
    Fut: IntoFuture,
    F: FnOnce() -> Fut,
{
    type Output = Fut::Output;
    type IntoFuture = Fut::IntoFuture;

    fn into_future(self) -> Self::IntoFuture {
        (self.f)().into_future()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_closure_runs_on_into_future() {
        let called = Cell::new(false);
        let fut = into_future_fn(|| {
            called.set(true);
            async { 7 }
        });

        assert!(!called.get());
        assert_eq!(pollster::block_on(fut.into_future()), 7);
        assert!(called.get());
    }
}
