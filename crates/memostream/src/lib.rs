//! Memoizing caches over sequential sources.
//!
//! A [`MemoCache`] fetches every item of a [`SequenceSource`] at most once and keeps it, so that
//! any number of [`Cursor`]s can traverse the sequence, concurrently or one after another,
//! without calling the source again.
//!
//! ```
//! use memostream::{MemoizeExt, sources::IteratorSource};
//!
//! let cache = IteratorSource::new(0..3).memoize();
//! for _ in 0..2 {
//!     let items: Vec<_> = cache
//!         .cursor()
//!         .unwrap()
//!         .blocking()
//!         .map(|entry| *entry.unwrap())
//!         .collect();
//!     assert_eq!(items, [0, 1, 2]);
//! }
//! assert_eq!(cache.stats().source_calls(), 4);
//! ```

mod admission;
mod buffer;
mod cache;
mod cursor;
mod error;
mod ext;
mod frontier;
mod gate;
mod parameter;
mod preloader;
mod stats;
pub mod task_spawner;

pub use admission::{Admission, Contended, ErrorOf, Exclusive, ItemOf, Preloaded};
pub use buffer::Entry;
pub use cache::{ContendedCache, ExclusiveCache, MemoCache, PreloadingCache};
pub use cursor::{Blocking, Cursor, CursorResult};
pub use error::CacheError;
pub use ext::MemoizeExt;
pub use memostream_core::{sources, Never, SequenceSource};
pub use parameter::CacheParameter;
pub use stats::Stats;
