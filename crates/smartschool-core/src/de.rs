//! Lenient serde adapters.
//!
//! The XML dispatcher hands every leaf over as text (`"1"`, `"0"`,
//! `"2023-10-25 14:57"`) while the JSON endpoints use native types. These
//! adapters accept both so one record type serves either source.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, de::Error as _};

use crate::CoreError;
use crate::enums::MessageLabel;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Parse a portal timestamp.
///
/// Accepts RFC 3339 (`2023-09-01T01:02:03+02:00`), the same without a colon in
/// the offset, and the naive `YYYY-MM-DD HH:MM[:SS]` form, which is taken as
/// local time.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if no known format matches.
pub fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Ok(dt);
    }

    let naive = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .ok_or_else(|| CoreError::Parse(format!("unrecognised timestamp: {text:?}")))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| CoreError::Parse(format!("timestamp does not exist locally: {text:?}")))
}

/// Parse a `YYYY-MM-DD` date, also accepting a full timestamp.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] if the text is neither a date nor a timestamp.
pub fn parse_date(text: &str) -> Result<NaiveDate, CoreError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| parse_datetime(text).map(|dt| dt.date_naive()))
        .map_err(|_| CoreError::Parse(format!("unrecognised date: {text:?}")))
}

/// Integer from a number or a numeric string.
///
/// # Errors
///
/// Fails when the value is not an integer in either representation.
pub fn lenient_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Int(n) => Ok(n),
        Scalar::Bool(b) => Ok(i64::from(b)),
        Scalar::Float(f) => {
            #[allow(clippy::cast_possible_truncation)]
            let n = f as i64;
            Ok(n)
        }
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// Like [`lenient_i64`], with null and empty text mapping to `None`.
///
/// # Errors
///
/// Fails when a non-empty value is not an integer.
pub fn lenient_opt_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n)),
        Some(Scalar::Bool(b)) => Ok(Some(i64::from(b))),
        Some(Scalar::Float(f)) => {
            #[allow(clippy::cast_possible_truncation)]
            let n = f as i64;
            Ok(Some(n))
        }
        Some(Scalar::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// Float from a number or a string, decimal comma allowed.
///
/// # Errors
///
/// Fails when the value is not numeric.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Float(f) => Ok(f),
        #[allow(clippy::cast_precision_loss)]
        Scalar::Int(n) => Ok(n as f64),
        Scalar::Bool(b) => Ok(f64::from(u8::from(b))),
        Scalar::Text(s) => crate::text::as_float(&s).map_err(D::Error::custom),
    }
}

/// Boolean from `true`/`false`, `0`/`1` or their string forms. Empty text and
/// null are `false`.
///
/// # Errors
///
/// Fails on any other text.
pub fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Int(n)) => Ok(n != 0),
        Some(Scalar::Float(f)) => Ok(f != 0.0),
        Some(Scalar::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "" | "0" | "false" | "no" => Ok(false),
            "1" | "true" | "yes" => Ok(true),
            other => Err(D::Error::custom(format!("expected a boolean, got {other:?}"))),
        },
    }
}

/// String that tolerates null (empty XML elements) and numbers.
///
/// # Errors
///
/// Never fails for scalar input.
pub fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s.trim().to_string(),
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

/// Free text kept verbatim, whitespace included. Null becomes empty.
///
/// # Errors
///
/// Never fails for scalar input.
pub fn verbatim_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        None => String::new(),
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Int(n)) => n.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
    })
}

/// Message flag from its numeric code (`0`..=`4`), as number or text.
/// Null and empty text are [`MessageLabel::NoFlag`].
///
/// # Errors
///
/// Fails on codes outside the known range.
pub fn message_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MessageLabel, D::Error> {
    let code = match Option::<Scalar>::deserialize(deserializer)? {
        None => return Ok(MessageLabel::NoFlag),
        Some(Scalar::Text(s)) if s.trim().is_empty() => return Ok(MessageLabel::NoFlag),
        Some(Scalar::Int(n)) => n,
        Some(Scalar::Bool(b)) => i64::from(b),
        #[allow(clippy::cast_possible_truncation)]
        Some(Scalar::Float(f)) => f as i64,
        Some(Scalar::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("expected a label code, got {s:?}")))?,
    };
    MessageLabel::from_code(code)
        .ok_or_else(|| D::Error::custom(format!("unknown label code {code}")))
}

/// Optional string: null and blank text become `None`.
///
/// # Errors
///
/// Never fails for scalar input.
pub fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    let s = lenient_string(deserializer)?;
    Ok((!s.is_empty()).then_some(s))
}

/// Timestamp in any format [`parse_datetime`] understands.
///
/// # Errors
///
/// Fails when the text is not a recognised timestamp.
pub fn datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<FixedOffset>, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_datetime(&s).map_err(D::Error::custom)
}

/// Optional timestamp: null and blank text become `None`.
///
/// # Errors
///
/// Fails when non-blank text is not a recognised timestamp.
pub fn opt_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_datetime(&s).map(Some).map_err(D::Error::custom),
    }
}

/// Date in any format [`parse_date`] understands.
///
/// # Errors
///
/// Fails when the text is not a recognised date.
pub fn date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(D::Error::custom)
}

/// A list that may arrive as null, a single object or an array.
///
/// # Errors
///
/// Fails when an element does not deserialize as `T`.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
