//! Target-syntax emitters, kept separate from the `Pattern` IR itself.

pub mod pcre2;
