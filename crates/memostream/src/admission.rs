//! Policies deciding which cursor, if any, may call the source when it reaches the frontier.

mod contended;
mod exclusive;
mod preloaded;

use std::future::Future;

pub use contended::Contended;
pub use exclusive::Exclusive;
use memostream_core::SequenceSource;
use memostream_internals::Notify;
pub use preloaded::Preloaded;

use crate::gate::GateGuard;

pub trait Admission: Sealed {
    type Source: SequenceSource;

    /// Grants production of the next item, or `None` if the cursor has to wait for someone else.
    #[doc(hidden)]
    fn admit<'a>(&'a self, on_release: &'a Notify) -> Option<GateGuard<'a, Self::Source>>;

    /// Whether another cursor may be created now.
    #[doc(hidden)]
    fn attach(&self) -> bool {
        true
    }

    #[doc(hidden)]
    fn detach(&self) {}

    /// Stops production and releases the source. The frontier is already closed when this runs.
    #[doc(hidden)]
    fn close(&self) -> impl Future<Output = ()>;
}

pub type ItemOf<A> = <<A as Admission>::Source as SequenceSource>::Item;
pub type ErrorOf<A> = <<A as Admission>::Source as SequenceSource>::Error;

mod sealed {
    pub trait Sealed {}
}
pub(crate) use sealed::Sealed;
