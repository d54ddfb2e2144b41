/// Switches that change how a struct is processed.
///
/// All switches are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Split camel-cased field names into underscore-separated words
    /// unless a field opts out with `#[env(split_words = false)]`.
    pub split_words: bool,
    /// Treat every field as required unless marked `#[env(required = false)]`.
    pub required: bool,
    /// Resolve fields on separate threads and report every error at once.
    pub parallel: bool,
}

impl Options {
    pub const fn new() -> Self {
        Self {
            split_words: false,
            required: false,
            parallel: false,
        }
    }

    pub const fn split_words(mut self, enabled: bool) -> Self {
        self.split_words = enabled;
        self
    }

    pub const fn required(mut self, enabled: bool) -> Self {
        self.required = enabled;
        self
    }

    pub const fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}
