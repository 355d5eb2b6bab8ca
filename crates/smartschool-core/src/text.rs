//! Text helpers for values the portal renders for humans.

use crate::CoreError;

/// Parse a number that may use a decimal comma (`"13,5"`).
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if the text is not a number.
pub fn as_float(text: &str) -> Result<f64, CoreError> {
    let normalized = text.trim().replace(',', ".");
    normalized
        .parse::<f64>()
        .map_err(|e| CoreError::Parse(format!("not a number: {text:?} ({e})")))
}

/// Parse a document size such as `"75,54 KB"` or `"1,2 MB"` into kilobytes.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if the number or unit is not recognised.
pub fn parse_size_kb(text: &str) -> Result<f64, CoreError> {
    let text = text.trim();
    let split_at = text
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    let (number, unit) = text.split_at(split_at);
    let value = as_float(number)?;

    match unit.trim().to_ascii_lowercase().as_str() {
        "" | "kb" | "k" => Ok(value),
        "b" | "bytes" => Ok(value / 1024.0),
        "mb" | "m" => Ok(value * 1024.0),
        "gb" | "g" => Ok(value * 1024.0 * 1024.0),
        other => Err(CoreError::Parse(format!("unknown size unit {other:?} in {text:?}"))),
    }
}

/// Normalise the human file type label of a document row (`"PDF"`,
/// `"docx-bestand"`) to a lowercase extension-like token.
#[must_use]
pub fn parse_mime_type(text: &str) -> String {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .find(|part| !part.is_empty())
        .unwrap_or_default()
        .trim_start_matches('.')
        .to_ascii_lowercase()
}

/// Make a filename safe for every common filesystem.
///
/// Path separators, `:` and `+` become `_`; `< > " | ? *` and control
/// characters are dropped. Leading/trailing dots and spaces are trimmed.
#[must_use]
pub fn filesystem_safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| match c {
            '/' | '\\' | ':' | '+' => Some('_'),
            '<' | '>' | '"' | '|' | '?' | '*' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Sort key that orders embedded numbers numerically (`"thema 2"` before
/// `"thema 10"`), case-insensitively.
#[must_use]
pub fn natural_sort_key(text: &str) -> Vec<NaturalChunk> {
    let mut chunks = Vec::new();
    let mut digits = String::new();
    let mut letters = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            if !letters.is_empty() {
                chunks.push(NaturalChunk::Text(std::mem::take(&mut letters)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                chunks.push(NaturalChunk::Number(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            letters.extend(c.to_lowercase());
        }
    }
    if !digits.is_empty() {
        chunks.push(NaturalChunk::Number(digits.parse().unwrap_or(u64::MAX)));
    }
    if !letters.is_empty() {
        chunks.push(NaturalChunk::Text(letters));
    }
    chunks
}

/// One piece of a [`natural_sort_key`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalChunk {
    Number(u64),
    Text(String),
}
