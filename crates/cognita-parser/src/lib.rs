//! Cognita document segmenter
//!
//! Splits raw text into an ordered sequence of semantic blocks (headers with
//! their body, and paragraphs) with exact character ranges into the source.

pub mod excerpt;
pub mod segmenter;

pub use excerpt::{excerpt, DEFAULT_EXCERPT_CHARS};
pub use segmenter::{segment, Segment};
