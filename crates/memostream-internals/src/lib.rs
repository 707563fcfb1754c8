mod into_future_fn;
mod notify;

pub use into_future_fn::{into_future_fn, FnOnceFuture};
pub use notify::{Notify, Wait};
