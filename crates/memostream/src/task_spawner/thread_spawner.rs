use std::{
    any::Any,
    future::{Future, IntoFuture},
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll, Waker},
    thread::JoinHandle,
};

use super::TaskSpawner;

/// Spawns every task on a dedicated OS thread and drives it there with `pollster`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

#[derive(Default)]
struct Completion {
    done: bool,
    waker: Option<Waker>,
}

type SharedCompletion = Arc<Mutex<Completion>>;

fn lock(completion: &Mutex<Completion>) -> MutexGuard<'_, Completion> {
    completion.lock().unwrap_or_else(PoisonError::into_inner)
}

// marks the task done on return and on unwind.
struct CompleteOnExit(SharedCompletion);

impl Drop for CompleteOnExit {
    fn drop(&mut self) {
        let waker = {
            let mut completion = lock(&self.0);
            completion.done = true;
            completion.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

pub struct ThreadSpawnerHandle<T> {
    completion: SharedCompletion,
    handle: JoinHandle<T>,
}

pub struct ThreadSpawnerHandleFuture<T> {
    completion: SharedCompletion,
    handle: Option<JoinHandle<T>>,
}

impl<T> Future for ThreadSpawnerHandleFuture<T> {
    type Output = Result<T, Box<dyn Any + Send + 'static>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let completion = Arc::clone(&self.completion);
        let mut completion = lock(&completion);
        if !completion.done {
            completion.waker = Some(cx.waker().clone());
            return Poll::Pending;
        }
        drop(completion);

        // the thread is past the task, joining only waits for it to unwind its stack.
        match self.handle.take() {
            Some(handle) => Poll::Ready(handle.join()),
            None => panic!("ThreadSpawnerHandleFuture polled after completion"),
        }
    }
}

impl<T> IntoFuture for ThreadSpawnerHandle<T> {
    type Output = Result<T, Box<dyn Any + Send + 'static>>;
    type IntoFuture = ThreadSpawnerHandleFuture<T>;

    fn into_future(self) -> Self::IntoFuture {
        ThreadSpawnerHandleFuture {
            completion: self.completion,
            handle: Some(self.handle),
        }
    }
}

impl TaskSpawner for ThreadSpawner {
    type Error = Box<dyn Any + Send + 'static>;
    type Handle<T: Send> = ThreadSpawnerHandle<T>;

    fn spawn<T, F>(&self, task: F) -> Self::Handle<T>
    where
        T: 'static + Send,
        F: 'static + Send + IntoFuture<Output = T>,
    {
        let completion = SharedCompletion::default();
        let handle = std::thread::spawn({
            let completion = Arc::clone(&completion);
            move || {
                let _complete = CompleteOnExit(completion);
                pollster::block_on(task.into_future())
            }
        });

        ThreadSpawnerHandle { completion, handle }
    }
}
