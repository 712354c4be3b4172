//! Text analysis primitives shared by the dictionary and the match finder.
//!
//! This module centralizes character classification, char filtering and mora
//! splitting so that every component agrees on what counts as Kanji or kana.

pub mod char_class;
pub mod char_filter;
pub mod mora;

// Re-export commonly used types
pub use char_class::*;
pub use char_filter::*;
pub use mora::*;
