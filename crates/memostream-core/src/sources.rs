mod fn_source;
mod iterator_source;
mod stream_source;

pub use fn_source::{from_fn, FnSource};
pub use iterator_source::IteratorSource;
pub use stream_source::{StreamSource, TryStreamSource};
