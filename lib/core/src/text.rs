//! Text normalization and Hangul decomposition
//!
//! Every comparison in the search and recommendation engines goes through
//! [`normalize`], so two fields compare equal exactly when their cleaned forms
//! do. [`to_jamo`] is only used for phonetic similarity, never for equality.

use crate::fuzzy::ratio;
use serde_json::Value;

/// Default threshold for [`jamo_similar`]
pub const DEFAULT_JAMO_THRESHOLD: f64 = 80.0;

const HANGUL_FIRST: u32 = 0xAC00;
const HANGUL_LAST: u32 = 0xD7A3;
const LEAD_BASE: u32 = 0x1100;
const VOWEL_BASE: u32 = 0x1161;
const TAIL_BASE: u32 = 0x11A7;
const VOWEL_COUNT: u32 = 21;
const TAIL_COUNT: u32 = 28;

#[inline]
pub fn is_hangul_syllable(c: char) -> bool {
    (HANGUL_FIRST..=HANGUL_LAST).contains(&(c as u32))
}

#[inline]
fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c.is_whitespace() || is_hangul_syllable(c)
}

/// Clean a piece of text for matching.
///
/// Lowercases, drops every character that is not a word character,
/// whitespace or a Hangul syllable, and trims the result.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text.to_lowercase().chars().filter(|c| is_kept(*c)).collect();
    cleaned.trim().to_string()
}

/// Render a JSON value as plain text.
///
/// Arrays are joined with single spaces, `null` becomes the empty string.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        other => other.to_string(),
    }
}

/// [`normalize`] applied to any JSON value
pub fn normalize_value(value: &Value) -> String {
    normalize(&value_text(value))
}

/// Decompose Hangul syllables into conjoining jamo and drop all whitespace.
pub fn to_jamo(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        if c.is_whitespace() {
            continue;
        }
        if !is_hangul_syllable(c) {
            out.push(c);
            continue;
        }
        let index = c as u32 - HANGUL_FIRST;
        let lead = index / (VOWEL_COUNT * TAIL_COUNT);
        let vowel = (index % (VOWEL_COUNT * TAIL_COUNT)) / TAIL_COUNT;
        let tail = index % TAIL_COUNT;

        // All three ranges are valid scalar values.
        out.extend(char::from_u32(LEAD_BASE + lead));
        out.extend(char::from_u32(VOWEL_BASE + vowel));
        if tail > 0 {
            out.extend(char::from_u32(TAIL_BASE + tail));
        }
    }
    out
}

/// Phonetic similarity: full [`ratio`] of the two jamo streams.
pub fn jamo_similar(a: &str, b: &str, threshold: f64) -> bool {
    let a = to_jamo(&a.to_lowercase());
    let b = to_jamo(&b.to_lowercase());
    ratio(&a, &b) >= threshold
}
