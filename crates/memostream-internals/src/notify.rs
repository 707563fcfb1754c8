use slab::Slab;
use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
    task::{Context, Poll, Waker},
};

/// Broadcast wake-up signal.
///
/// A [`Wait`] remembers the version it was created at and resolves once any `send` happened
/// after that point, including sends that happen before it is first polled.
#[derive(Debug, Default)]
pub struct Notify {
    version: AtomicUsize,
    wakers: Mutex<Slab<Waker>>,
}

impl Notify {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&self) {
        // bumped under the lock so that a registered key is stale exactly when the version moved.
        let mut wakers = lock(&self.wakers);
        self.version.fetch_add(1, Ordering::SeqCst);
        for waker in wakers.drain() {
            waker.wake();
        }
    }

    pub fn wait(&self) -> Wait<'_> {
        Wait {
            version: self.version.load(Ordering::SeqCst),
            key: None,
            notify: self,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
pub struct Wait<'a> {
    version: usize,
    key: Option<usize>,
    notify: &'a Notify,
}

impl Wait<'_> {
    fn is_sent(&self) -> bool {
        self.version != self.notify.version.load(Ordering::SeqCst)
    }
}

impl Future for Wait<'_> {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.is_sent() {
            return Poll::Ready(());
        }

        let notify = self.notify;
        let mut wakers = lock(&notify.wakers);
        if self.is_sent() {
            self.key = None;
            return Poll::Ready(());
        }

        // the version is unchanged, so no `send` drained the slab since `key` was inserted.
        let key = match self.key.take() {
            Some(key) => match wakers.get_mut(key) {
                Some(waker) => {
                    waker.clone_from(cx.waker());
                    key
                }
                None => wakers.insert(cx.waker().clone()),
            },
            None => wakers.insert(cx.waker().clone()),
        };

        if self.is_sent() {
            wakers.remove(key);
            Poll::Ready(())
        } else {
            drop(wakers);
            self.key = Some(key);
            Poll::Pending
        }
    }
}

impl Drop for Wait<'_> {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        if self.is_sent() {
            return;
        }

        let mut wakers = lock(&self.notify.wakers);
        if self.is_sent() {
            return;
        }
        wakers.try_remove(key);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::task::noop_waker;
    use std::{
        sync::{Arc, Barrier},
        time::Duration,
    };

    #[test]
    fn test_pending_before_send() {
        let notify = Arc::new(Notify::new());

        let handle = std::thread::spawn({
            move || {
                let wait = notify.wait();
                pollster::block_on(wait)
            }
        });

        std::thread::sleep(Duration::from_millis(200));

        assert!(!handle.is_finished());
    }

    #[test]
    fn test_send() {
        let notify = Arc::new(Notify::new());
        let parallel = 100;
        let before_barrier = Arc::new(Barrier::new(parallel + 1));
        let after_barrier = Arc::new(Barrier::new(parallel + 1));

        for _ in 0..parallel {
            std::thread::spawn({
                let barrier = Arc::clone(&after_barrier);
                let before_barrier = Arc::clone(&before_barrier);
                let notify = notify.clone();

                move || {
                    let wait = notify.wait();
                    before_barrier.wait();
                    pollster::block_on(wait);
                    barrier.wait()
                }
            });
        }

        before_barrier.wait();
        notify.send();
        after_barrier.wait();
    }

    #[test]
    fn test_send_before_poll() {
        let notify = Notify::new();
        let wait = notify.wait();
        let mut wait = std::pin::pin!(wait);

        notify.send();

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        assert!(wait.as_mut().poll(&mut cx).is_ready());
    }

    #[test]
    fn test_send_after_poll() {
        let notify = Notify::new();
        let wait = notify.wait();
        let mut wait = std::pin::pin!(wait);

        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        assert!(wait.as_mut().poll(&mut cx).is_pending());
        assert!(wait.as_mut().poll(&mut cx).is_pending());
        assert_eq!(lock(&notify.wakers).len(), 1);

        notify.send();

        assert!(wait.as_mut().poll(&mut cx).is_ready());
    }

    #[test]
    fn test_dropped_wait_unregisters() {
        let notify = Notify::new();
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);

        {
            let wait = notify.wait();
            let mut wait = std::pin::pin!(wait);
            assert!(wait.as_mut().poll(&mut cx).is_pending());
        }

        assert!(lock(&notify.wakers).is_empty());
    }

    #[test]
    fn test_rewait_across_rounds() {
        for _ in 0..32 {
            test_once();
        }

        // every waiter re-arms after each wake-up, the way a cursor waits at the frontier.
        fn test_once() {
            let rounds = 256;
            let parallel = 8;
            let notify = Arc::new(Notify::new());
            let round = Arc::new(AtomicUsize::new(0));
            let barrier = Arc::new(Barrier::new(parallel + 1));

            let handles: Vec<_> = (0..parallel)
                .map(|_| {
                    let notify = Arc::clone(&notify);
                    let round = Arc::clone(&round);
                    let barrier = Arc::clone(&barrier);
                    std::thread::spawn(move || {
                        barrier.wait();
                        let mut seen = 0;
                        while seen < rounds {
                            let wait = notify.wait();
                            let current = round.load(Ordering::SeqCst);
                            if current == seen {
                                pollster::block_on(wait);
                            } else {
                                seen = current;
                            }
                        }
                    })
                })
                .collect();

            barrier.wait();
            for _ in 0..rounds {
                round.fetch_add(1, Ordering::SeqCst);
                notify.send();
                std::thread::yield_now();
            }

            for handle in handles {
                handle.join().unwrap();
            }
        }
    }
}
