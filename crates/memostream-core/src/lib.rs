mod never;
mod source;

pub mod sources;

pub use never::Never;
pub use source::SequenceSource;
