//! Payload validation, coercion and pagination helpers.
//!
//! Function payloads arrive as loosely-typed JSON. These helpers give the
//! façades one consistent reading of that JSON: which fields count as
//! present, how scalars become strings and numbers, and how list results are
//! sliced into pages.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::FunctionError;

/// Page size used when the caller gives none (or an unusable one).
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Fail with [`FunctionError::Validation`] if any of `fields` is absent.
///
/// A field counts as missing when it is not present in the object or is
/// `null`. Present falsy values such as `0`, `""` or `false` are accepted.
/// A payload that is not an object is missing every field.
///
/// # Errors
///
/// Returns a validation error naming every missing field in one message.
pub fn require_fields(payload: &Value, fields: &[&str], context: &str) -> Result<(), FunctionError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|field| payload.get(**field).is_none_or(Value::is_null))
        .map(|field| (*field).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FunctionError::Validation {
            context: context.to_string(),
            missing,
        })
    }
}

/// Stringify a JSON value and trim surrounding whitespace.
///
/// Absent and `null` values become the empty string.
#[must_use]
pub fn sanitize_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => scalar_to_string(other).trim().to_string(),
    }
}

/// Render a scalar the way it reads in a spreadsheet cell.
fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.as_f64().map_or_else(|| n.to_string(), format_number),
        other => other.to_string(),
    }
}

/// Format a number without a trailing `.0` for whole values.
#[must_use]
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)] // bounded by the check above
        let whole = n as i64;
        whole.to_string()
    } else {
        n.to_string()
    }
}

/// Coerce a JSON value to a number.
///
/// Absent values and anything that does not read as a number become `NaN`;
/// `null`, `false` and blank strings become `0`; `true` becomes `1`. Strings
/// are trimmed and may use `0x`/`0o`/`0b` prefixes or `Infinity`.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        None => f64::NAN,
        Some(Value::Null | Value::Bool(false)) => 0.0,
        Some(Value::Bool(true)) => 1.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => parse_numeric_str(s),
        Some(Value::Array(_) | Value::Object(_)) => f64::NAN,
    }
}

fn parse_numeric_str(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }

    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        #[allow(clippy::cast_precision_loss)] // matches float semantics of the source text
        let parsed = s
            .get(2..)
            .and_then(|digits| u64::from_str_radix(digits, radix).ok())
            .map_or(f64::NAN, |n| n as f64);
        return parsed;
    }

    // Rust accepts "inf"/"nan" spellings that are not numbers in JSON payloads.
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return f64::NAN;
    }

    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Requested page of a list operation.
///
/// Both fields are read leniently: numeric strings are accepted and anything
/// unusable falls back to the defaults applied by [`paginate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageOptions {
    /// 1-based page number.
    #[serde(deserialize_with = "lenient::number")]
    pub page: Option<f64>,
    /// Items per page.
    #[serde(deserialize_with = "lenient::number")]
    pub page_size: Option<f64>,
}

impl PageOptions {
    /// Options for an explicit page and page size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // page numbers are small
    pub const fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: Some(page as f64),
            page_size: Some(page_size as f64),
        }
    }

    /// Resolved 1-based page number.
    #[must_use]
    pub fn resolved_page(&self) -> usize {
        match self.page {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked >= 1
            Some(p) if p.is_finite() && p >= 1.0 => p.trunc() as usize,
            _ => 1,
        }
    }

    /// Resolved page size within `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn resolved_page_size(&self) -> usize {
        match self.page_size {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked > 0
            Some(size) if size.is_finite() && size > 0.0 => {
                (size.trunc() as usize).clamp(1, MAX_PAGE_SIZE)
            }
            _ => DEFAULT_PAGE_SIZE,
        }
    }
}

/// Pagination envelope returned by every list operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// 1-based page number actually served.
    pub page: usize,
    /// Page size actually applied.
    pub page_size: usize,
    /// Size of the whole collection, regardless of the page served.
    pub total: usize,
    /// Items on this page; empty when the page is past the end.
    pub items: Vec<T>,
}

/// Slice `items` into the page described by `options`.
///
/// Out-of-range pages are not an error: they yield no items while `total`
/// still reports the full collection size.
#[must_use]
pub fn paginate<T>(items: Vec<T>, options: &PageOptions) -> Page<T> {
    let page = options.resolved_page();
    let page_size = options.resolved_page_size();
    let total = items.len();
    let offset = (page - 1).saturating_mul(page_size);

    Page {
        page,
        page_size,
        total,
        items: items.into_iter().skip(offset).take(page_size).collect(),
    }
}

/// Serde adapters for loosely-typed payload fields.
pub mod lenient {
    use super::{Deserialize, Deserializer, Serializer, Value, coerce_number};

    /// Read an optional scalar as text; `null` is treated as absent.
    ///
    /// # Errors
    ///
    /// Fails when the value is an array or object.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(Value::Number(n)) => Ok(Some(
                n.as_f64().map_or_else(|| n.to_string(), super::format_number),
            )),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(_) => Err(serde::de::Error::custom("expected a string, number or boolean")),
        }
    }

    /// Keep an explicit `null` as `Some(Value::Null)`.
    ///
    /// Pair with `#[serde(default)]` so only a missing field reads as `None`.
    ///
    /// # Errors
    ///
    /// Propagates deserializer errors.
    pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Some)
    }

    /// Read an optional value as a number; `null` is treated as absent.
    ///
    /// # Errors
    ///
    /// Never fails for well-formed input; unreadable values become `NaN`.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(coerce_number(Some(&value)))),
        }
    }

    /// Serialize a number, writing whole values as integers and `NaN` or
    /// infinities as `null`.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
    pub fn serialize_number<S>(n: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if !n.is_finite() {
            serializer.serialize_none()
        } else if n.fract() == 0.0 && n.abs() < 1e15 {
            #[allow(clippy::cast_possible_truncation)] // bounded by the check above
            let whole = *n as i64;
            serializer.serialize_i64(whole)
        } else {
            serializer.serialize_f64(*n)
        }
    }

    /// Deserialize a number written by [`serialize_number`]; `null` reads
    /// back as `NaN`.
    ///
    /// # Errors
    ///
    /// Never fails for well-formed input.
    pub fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(f64::NAN),
            Some(value) => Ok(coerce_number(Some(&value))),
        }
    }
}
