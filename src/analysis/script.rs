//! Script classification of individual code points.

use serde::{Deserialize, Serialize};

/// Inclusive code point ranges of the CJK Unified Ideographs blocks.
const CJK_UNIFIED_IDEOGRAPHS: &[(u32, u32)] = &[
    (0x4E00, 0x9FFF),   // CJK Unified Ideographs
    (0x3400, 0x4DBF),   // Extension A
    (0x20000, 0x2A6DF), // Extension B
    (0x2A700, 0x2EBEF), // Extensions C, D, E, F and I
    (0x30000, 0x323AF), // Extensions G and H
];

/// The script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptClass {
    /// Whitespace, punctuation, symbols and anything else that separates runs.
    Delimiter,
    /// Letters and digits outside the CJK ideograph ranges.
    Latin,
    /// CJK unified ideographs.
    Cjk,
}

impl ScriptClass {
    /// Returns true if runs of this class never produce a span.
    pub fn is_delimiter(self) -> bool {
        self == ScriptClass::Delimiter
    }
}

/// Check whether a character is a CJK unified ideograph.
pub fn is_cjk_ideograph(c: char) -> bool {
    let cp = c as u32;
    CJK_UNIFIED_IDEOGRAPHS
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Classify a character.
///
/// CJK ideographs are tested first because `char::is_alphanumeric` also
/// accepts them. Anything `is_alphanumeric` accepts counts as a letter or
/// digit, so other numerics such as `²` or `Ⅻ` and alphabetic combining marks
/// continue a word instead of ending it.
pub fn classify(c: char) -> ScriptClass {
    if is_cjk_ideograph(c) {
        ScriptClass::Cjk
    } else if c.is_alphanumeric() {
        ScriptClass::Latin
    } else {
        ScriptClass::Delimiter
    }
}
