//! Query text analysis.
//!
//! This module turns free-form, mixed-script query text into typed lexical
//! spans. It performs no dictionary or statistical word segmentation: runs of
//! characters are classified by script and emitted according to their length.
//!
//! # Architecture
//!
//! ```text
//! Text → Script classification → Runs → Spans (Word / Phrase)
//! ```
//!
//! # Examples
//!
//! ```
//! use searchable::analysis::{Span, segment};
//!
//! let spans = segment("微软Microsoft发布了一 款XBox游戏机");
//! assert_eq!(spans[0], Span::phrase("微软"));
//! assert_eq!(spans[1], Span::word("Microsoft"));
//! ```
//!
//! # Modules
//!
//! - [`script`]: Per code point script classification
//! - [`span`]: The `Word` / `Phrase` span model
//! - [`segmenter`]: Run scanning and span emission

pub mod script;
pub mod segmenter;
pub mod span;

// Re-exports
pub use script::{ScriptClass, classify, is_cjk_ideograph};
pub use segmenter::{MAX_PHRASE_CHARS, OverflowPolicy, Segmenter, segment};
pub use span::Span;
