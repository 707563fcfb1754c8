use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct CacheParameter {
    label: Cow<'static, str>, // `label` field of every log event emitted for the cache
    release_on_exhaustion: bool,
}

impl Default for CacheParameter {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("memostream"),
            release_on_exhaustion: false,
        }
    }
}

impl CacheParameter {
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    /// Release the source as soon as it reports exhaustion instead of when the cache is dropped
    /// or closed. Preloading caches always do this.
    pub fn with_release_on_exhaustion(mut self, release_on_exhaustion: bool) -> Self {
        self.release_on_exhaustion = release_on_exhaustion;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn release_on_exhaustion(&self) -> bool {
        self.release_on_exhaustion
    }

    pub(crate) fn into_label(self) -> Cow<'static, str> {
        self.label
    }
}
