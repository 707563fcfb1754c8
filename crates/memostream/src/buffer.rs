//! Append-only item storage shared by every cursor of a cache.
//!
//! ```text
//!  head            next           next
//!   ↓               ↓              ↓
//! [link] -> [0][link] -> [1][link] -> [2][link: empty]
//!                                      ↑
//!                                     tail
//! ```
//!
//! A link is written once. Readers walk links without locking, appenders are serialized by the
//! tail lock.

use std::{
    cell::UnsafeCell,
    mem::MaybeUninit,
    sync::{
        atomic::{AtomicU8, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

const LINK_EMPTY: u8 = 0;
const LINK_WRITING: u8 = 1;
const LINK_SET: u8 = 2;

struct Link<T> {
    state: AtomicU8,
    node: UnsafeCell<MaybeUninit<Arc<Node<T>>>>,
}

unsafe impl<T: Send + Sync> Send for Link<T> {}
unsafe impl<T: Send + Sync> Sync for Link<T> {}

impl<T> Link<T> {
    const fn new() -> Self {
        Self {
            state: AtomicU8::new(LINK_EMPTY),
            node: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    fn get(&self) -> Option<&Arc<Node<T>>> {
        if self.state.load(Ordering::Acquire) == LINK_SET {
            Some(unsafe { (*self.node.get()).assume_init_ref() })
        } else {
            None
        }
    }

    fn set(&self, node: Arc<Node<T>>) -> Result<(), Arc<Node<T>>> {
        let result = self.state.compare_exchange(
            LINK_EMPTY,
            LINK_WRITING,
            Ordering::Acquire,
            Ordering::Relaxed,
        );

        if result.is_err() {
            return Err(node);
        }

        unsafe {
            (*self.node.get()).write(node);
        }
        self.state.store(LINK_SET, Ordering::Release);
        Ok(())
    }

    fn take(&mut self) -> Option<Arc<Node<T>>> {
        if *self.state.get_mut() != LINK_SET {
            return None;
        }
        *self.state.get_mut() = LINK_EMPTY;
        Some(unsafe { self.node.get_mut().assume_init_read() })
    }
}

impl<T> Drop for Link<T> {
    fn drop(&mut self) {
        drop(self.take());
    }
}

struct Node<T> {
    index: usize,
    item: T,
    next: Link<T>,
}

impl<T> Drop for Node<T> {
    // unlinks iteratively so that long chains do not recurse once per node.
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// A cached item. Cloning is cheap and keeps the rest of the buffer after it reachable.
pub struct Entry<T>(Arc<Node<T>>);

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> std::ops::Deref for Entry<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0.item
    }
}

impl<T> AsRef<T> for Entry<T> {
    fn as_ref(&self) -> &T {
        &self.0.item
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Entry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("index", &self.0.index)
            .field("item", &self.0.item)
            .finish()
    }
}

impl<T> Entry<T> {
    /// Position of the item in production order, starting at zero.
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// The successor, if it has been appended yet.
    pub fn next(&self) -> Option<Entry<T>> {
        self.0.next.get().map(|n| Entry(Arc::clone(n)))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

pub struct SharedBuffer<T> {
    head: Link<T>,
    tail: Mutex<Option<Entry<T>>>,
    len: AtomicUsize,
}

impl<T> Default for SharedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SharedBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedBuffer")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

impl<T> SharedBuffer<T> {
    pub const fn new() -> Self {
        Self {
            head: Link::new(),
            tail: Mutex::new(None),
            len: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn head(&self) -> Option<Entry<T>> {
        self.head.get().map(|n| Entry(Arc::clone(n)))
    }

    pub fn tail(&self) -> Option<Entry<T>> {
        self.lock_tail().clone()
    }

    /// The entry after `position`, where `None` stands for the position before the head.
    pub fn successor(&self, position: Option<&Entry<T>>) -> Option<Entry<T>> {
        match position {
            Some(entry) => entry.next(),
            None => self.head(),
        }
    }

    /// Links `item` after the current tail and publishes it as the new tail.
    pub fn append(&self, item: T) -> Entry<T> {
        let mut tail = self.lock_tail();
        let node = Arc::new(Node {
            index: self.len.load(Ordering::Relaxed),
            item,
            next: Link::new(),
        });

        let link = match &*tail {
            Some(entry) => &entry.0.next,
            None => &self.head,
        };
        if link.set(Arc::clone(&node)).is_err() {
            unreachable!("the tail of a shared buffer already has a successor");
        }

        let entry = Entry(node);
        *tail = Some(entry.clone());
        self.len.fetch_add(1, Ordering::Release);
        entry
    }

    fn lock_tail(&self) -> MutexGuard<'_, Option<Entry<T>>> {
        self.tail.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
