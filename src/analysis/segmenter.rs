//! Run-based segmentation of mixed-script query text.
//!
//! The segmenter walks the input once, grouping consecutive characters of the
//! same [`ScriptClass`] into runs. Each closed run is emitted as follows:
//!
//! | class     | length  | emission                                  |
//! |-----------|---------|-------------------------------------------|
//! | Latin     | n >= 1  | `Word(run)`                               |
//! | Cjk       | n == 1  | `Word(run)`                               |
//! | Cjk       | 2..=7   | `Phrase(run)`                             |
//! | Cjk       | n > 7   | `Phrase(first 7 chars)`, the rest dropped |
//! | Delimiter | any     | nothing                                   |
//!
//! Runs never merge across a delimiter, even between two CJK runs.

use serde::{Deserialize, Serialize};

use crate::analysis::script::{ScriptClass, classify};
use crate::analysis::span::Span;

/// Maximum number of ideographs kept in a single phrase.
pub const MAX_PHRASE_CHARS: usize = 7;

/// What happens to the ideographs of a CJK run beyond [`MAX_PHRASE_CHARS`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the first chunk only; the remaining characters produce no span.
    #[default]
    Truncate,
    /// Split the whole run into consecutive chunks, each emitted by the
    /// usual length rule (a trailing single ideograph becomes a `Word`).
    Chunk,
}

/// Splits query text into [`Span`]s.
///
/// Segmentation is total and deterministic: it never fails, touches no
/// shared state and runs in time linear in the input length.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    overflow_policy: OverflowPolicy,
}

impl Segmenter {
    /// Create a segmenter with the [`OverflowPolicy::Truncate`] policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overflow policy for over-length CJK runs.
    pub fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow_policy
    }

    /// Segment `text` into spans in left-to-right order of occurrence.
    pub fn segment(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut run: Option<(ScriptClass, usize)> = None;

        for (offset, c) in text.char_indices() {
            let class = classify(c);
            match run {
                Some((current, _)) if current == class => {}
                Some((current, start)) => {
                    self.emit_run(current, &text[start..offset], &mut spans);
                    run = Some((class, offset));
                }
                None => run = Some((class, offset)),
            }
        }
        if let Some((class, start)) = run {
            self.emit_run(class, &text[start..], &mut spans);
        }

        spans
    }

    fn emit_run(&self, class: ScriptClass, run: &str, spans: &mut Vec<Span>) {
        match class {
            ScriptClass::Delimiter => {}
            ScriptClass::Latin => spans.push(Span::word(run)),
            ScriptClass::Cjk => match self.overflow_policy {
                OverflowPolicy::Truncate => {
                    let (head, _) = split_at_char(run, MAX_PHRASE_CHARS);
                    spans.push(ideograph_span(head));
                }
                OverflowPolicy::Chunk => {
                    let mut rest = run;
                    while !rest.is_empty() {
                        let (head, tail) = split_at_char(rest, MAX_PHRASE_CHARS);
                        spans.push(ideograph_span(head));
                        rest = tail;
                    }
                }
            },
        }
    }
}

/// Segment `text` with the default segmenter.
pub fn segment(text: &str) -> Vec<Span> {
    Segmenter::default().segment(text)
}

/// Split `s` after its first `n` characters.
fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((offset, _)) => s.split_at(offset),
        None => (s, ""),
    }
}

/// A single ideograph is a word, anything longer is a phrase.
fn ideograph_span(run: &str) -> Span {
    if run.chars().nth(1).is_none() {
        Span::word(run)
    } else {
        Span::phrase(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(text: &str) -> Span {
        Span::word(text)
    }

    fn p(text: &str) -> Span {
        Span::phrase(text)
    }

    #[test]
    fn test_segment_delimiters_only() {
        for text in ["", " ", " () #", "\t\n", "，。！？", "&&&---"] {
            assert!(segment(text).is_empty(), "{text:?}");
        }
    }

    #[test]
    fn test_segment_english() {
        assert_eq!(segment("hello,world"), vec![w("hello"), w("world")]);
        assert_eq!(
            segment(" Hello World&Wide"),
            vec![w("Hello"), w("World"), w("Wide")]
        );
        assert_eq!(segment("H&M"), vec![w("H"), w("M")]);
        assert_eq!(segment("iPhone7"), vec![w("iPhone7")]);
    }

    #[test]
    fn test_segment_chinese() {
        assert_eq!(segment("你好"), vec![p("你好")]);
        assert_eq!(segment("防 毒 软件"), vec![w("防"), w("毒"), p("软件")]);
        assert_eq!(
            segment("防毒，软件？测试"),
            vec![p("防毒"), p("软件"), p("测试")]
        );
        assert_eq!(segment("我的电脑，系统"), vec![p("我的电脑"), p("系统")]);
    }

    #[test]
    fn test_segment_long_chinese_truncates() {
        assert_eq!(
            segment("李白：君不见黄河之水天上来"),
            vec![p("李白"), p("君不见黄河之水")]
        );
        // exactly seven characters survive unchanged
        assert_eq!(segment("君不见黄河之水"), vec![p("君不见黄河之水")]);
        // an eighth character is dropped rather than becoming a word
        assert_eq!(segment("君不见黄河之水天"), vec![p("君不见黄河之水")]);
    }

    #[test]
    fn test_segment_mixed() {
        assert_eq!(
            segment("微软Microsoft发布了一 款XBox游戏机"),
            vec![
                p("微软"),
                w("Microsoft"),
                p("发布了一"),
                w("款"),
                w("XBox"),
                p("游戏机"),
            ]
        );
    }

    #[test]
    fn test_segment_latin_run_of_any_length() {
        let long = "a".repeat(1000);
        assert_eq!(segment(&long), vec![w(&long)]);
    }

    #[test]
    fn test_segment_keeps_other_numerics_in_words() {
        assert_eq!(segment("x² H₂O"), vec![w("x²"), w("H₂O")]);
    }

    #[test]
    fn test_segment_is_deterministic() {
        let text = "特朗普Trump上任后美或加入亚投行, Obama: Give Trump a chance";
        assert_eq!(segment(text), segment(text));
    }

    #[test]
    fn test_chunk_policy() {
        let segmenter = Segmenter::new().with_overflow_policy(OverflowPolicy::Chunk);
        assert_eq!(segmenter.overflow_policy(), OverflowPolicy::Chunk);
        assert_eq!(
            segmenter.segment("李白：君不见黄河之水天上来"),
            vec![p("李白"), p("君不见黄河之水"), p("天上来")]
        );
        assert_eq!(
            segmenter.segment("君不见黄河之水天"),
            vec![p("君不见黄河之水"), w("天")]
        );
        // short runs behave exactly like the truncating policy
        assert_eq!(segmenter.segment("防 毒 软件"), segment("防 毒 软件"));
    }

    #[test]
    fn test_split_at_char() {
        assert_eq!(split_at_char("你好世界", 2), ("你好", "世界"));
        assert_eq!(split_at_char("你好", 7), ("你好", ""));
    }
}
