//! Dynamic slot values
//!
//! Blocks accept text, numbers, dates, and collections interchangeably per
//! slot, so values carry an explicit runtime tag. Every coercion a block
//! performs is an explicit branch on that tag rather than an implicit
//! conversion.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Advisory type tags declared on input/output slots.
///
/// These describe what a slot expects for the host UI; they are not enforced
/// at execution time. Blocks must handle any [`Value`] on any slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    /// Continuation signal
    Action,
    /// Text string
    Text,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
    /// Calendar date-time
    Date,
    /// Ordered sequence or set
    List,
    /// Keyed mapping
    Object,
    /// Explicit null
    Null,
    /// Slot left unconnected
    Unspecified,
}

/// A runtime value flowing through block slots.
///
/// `Value` is `Eq + Hash` so it can be a set member. Numeric equality uses
/// same-value-zero semantics (`NaN == NaN`, `+0 == -0`) to keep `Eq` lawful
/// and consistent with hashing. Sets and objects compare order-insensitively;
/// lists compare element-wise in order.
#[derive(Debug, Clone)]
pub enum Value {
    /// No value bound to the slot
    Unspecified,
    /// Explicit null
    Null,
    /// Boolean
    Bool(bool),
    /// Number (doubles, like the host platform's numeric type)
    Number(f64),
    /// Text string
    Text(String),
    /// Calendar date-time in the process-local calendar
    Date(NaiveDateTime),
    /// Ordered sequence (may contain duplicates)
    List(Vec<Value>),
    /// Set of unique values, insertion-ordered
    Set(IndexSet<Value>),
    /// Keyed mapping, insertion-ordered
    Object(IndexMap<String, Value>),
}

/// Collapse the bit patterns that must compare equal: every NaN, and both
/// signed zeros.
fn canonical_bits(n: f64) -> u64 {
    if n.is_nan() {
        f64::NAN.to_bits()
    } else if n == 0.0 {
        0
    } else {
        n.to_bits()
    }
}

fn hash_one(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Combine element hashes so that the result is independent of iteration
/// order, matching the order-insensitive equality of sets and objects.
fn unordered_hash<H: Hasher>(state: &mut H, hashes: impl Iterator<Item = u64>) {
    let mut acc: u64 = 0;
    for h in hashes {
        acc = acc.wrapping_add(h);
    }
    acc.hash(state);
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unspecified, Value::Unspecified) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Unspecified | Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Number(n) => canonical_bits(*n).hash(state),
            Value::Text(s) => s.hash(state),
            Value::Date(d) => d.hash(state),
            Value::List(items) => {
                for item in items {
                    item.hash(state);
                }
            }
            Value::Set(items) => unordered_hash(state, items.iter().map(hash_one)),
            Value::Object(map) => unordered_hash(
                state,
                map.iter().map(|(k, v)| {
                    let mut hasher = DefaultHasher::new();
                    k.hash(&mut hasher);
                    v.hash(&mut hasher);
                    hasher.finish()
                }),
            ),
        }
    }
}

impl Value {
    /// Name of the runtime tag, for error messages and logging
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unspecified => "unspecified",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Object(_) => "object",
        }
    }

    /// Check if the value is the unbound-slot marker
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Value::Unspecified)
    }

    /// Try to view the value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to view the value as a number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to view the value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to view the value as a date
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Read the value as a whole number, the way the host platform's numeric
    /// inputs are read.
    ///
    /// - `Number` truncates toward zero; non-finite numbers read as absent.
    /// - `Text` skips leading whitespace, accepts an optional sign, and takes
    ///   the leading run of ASCII digits (`"12px"` → 12, `"-5"` → -5).
    /// - Every other tag reads as absent.
    ///
    /// # Examples
    /// ```
    /// use automation_blocks::Value;
    ///
    /// assert_eq!(Value::Number(12.9).coerce_int(), Some(12));
    /// assert_eq!(Value::Text(" -4x".into()).coerce_int(), Some(-4));
    /// assert_eq!(Value::Text("abc".into()).coerce_int(), None);
    /// assert_eq!(Value::Bool(true).coerce_int(), None);
    /// ```
    pub fn coerce_int(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n as i64),
            Value::Text(s) => parse_leading_int(s),
            _ => None,
        }
    }

    /// Project the value onto plain JSON for deterministic stringification.
    ///
    /// Dates render as ISO-8601 text with millisecond precision; sets render
    /// as arrays in enumeration order; `Unspecified` maps to null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Unspecified | Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Number(n) => {
                // whole numbers serialize without a fractional part
                if n.is_finite() && n.fract() == 0.0 && (*n as i64 as f64) == *n {
                    JsonValue::Number((*n as i64).into())
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(JsonValue::Number)
                        .unwrap_or(JsonValue::Null)
                }
            }
            Value::Text(s) => JsonValue::String(s.clone()),
            Value::Date(d) => JsonValue::String(format_date(*d)),
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Set(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => JsonValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Render a date the way block outputs display it
pub fn format_date(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

/// Parse an optional sign plus a leading ASCII digit run, after skipping
/// leading whitespace. At least one digit is required. Absurdly long digit
/// runs saturate rather than overflow.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.strip_prefix('-') {
        Some(r) => (true, r),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let mut digits = rest.chars().take_while(|c| c.is_ascii_digit()).peekable();
    digits.peek()?;

    let mut value: i64 = 0;
    for c in digits {
        value = value
            .saturating_mul(10)
            .saturating_add((c as u8 - b'0') as i64);
    }
    Some(if negative { -value } else { value })
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unspecified => write!(f, "unspecified"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Date(d) => write!(f, "{}", format_date(*d)),
            Value::List(_) | Value::Set(_) | Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::Number(f64::NAN), Value::Number(f64::NAN));
        assert_eq!(
            hash_one(&Value::Number(f64::NAN)),
            hash_one(&Value::Number(f64::NAN))
        );
    }

    #[test]
    fn test_signed_zeros_equal() {
        assert_eq!(Value::Number(0.0), Value::Number(-0.0));
        assert_eq!(hash_one(&Value::Number(0.0)), hash_one(&Value::Number(-0.0)));
    }

    #[test]
    fn test_cross_tag_inequality() {
        assert_ne!(Value::Text("1".into()), Value::Number(1.0));
        assert_ne!(Value::Null, Value::Unspecified);
        assert_ne!(Value::List(vec![]), Value::Set(IndexSet::new()));
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a: IndexSet<Value> = ["a", "b"].iter().map(|s| Value::from(*s)).collect();
        let b: IndexSet<Value> = ["b", "a"].iter().map(|s| Value::from(*s)).collect();
        assert_eq!(Value::Set(a.clone()), Value::Set(b.clone()));
        assert_eq!(hash_one(&Value::Set(a)), hash_one(&Value::Set(b)));
    }

    #[test]
    fn test_list_equality_is_ordered() {
        let a = Value::List(vec!["a".into(), "b".into()]);
        let b = Value::List(vec!["b".into(), "a".into()]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_coerce_int_number() {
        assert_eq!(Value::Number(5.0).coerce_int(), Some(5));
        assert_eq!(Value::Number(-2.7).coerce_int(), Some(-2));
        assert_eq!(Value::Number(f64::NAN).coerce_int(), None);
        assert_eq!(Value::Number(f64::INFINITY).coerce_int(), None);
    }

    #[test]
    fn test_coerce_int_text() {
        assert_eq!(Value::Text("12".into()).coerce_int(), Some(12));
        assert_eq!(Value::Text("  12  ".into()).coerce_int(), Some(12));
        assert_eq!(Value::Text("12px".into()).coerce_int(), Some(12));
        assert_eq!(Value::Text("-3".into()).coerce_int(), Some(-3));
        assert_eq!(Value::Text("+3".into()).coerce_int(), Some(3));
        assert_eq!(Value::Text("px12".into()).coerce_int(), None);
        assert_eq!(Value::Text("".into()).coerce_int(), None);
        assert_eq!(Value::Text("-".into()).coerce_int(), None);
    }

    #[test]
    fn test_coerce_int_other_tags() {
        assert_eq!(Value::Unspecified.coerce_int(), None);
        assert_eq!(Value::Null.coerce_int(), None);
        assert_eq!(Value::Bool(true).coerce_int(), None);
        assert_eq!(Value::Date(date(2024, 1, 1)).coerce_int(), None);
        assert_eq!(Value::List(vec![]).coerce_int(), None);
    }

    #[test]
    fn test_to_json_date() {
        let v = Value::Date(date(2024, 1, 1));
        assert_eq!(v.to_json(), serde_json::json!("2024-01-01T00:00:00.000"));
    }

    #[test]
    fn test_to_json_collections() {
        let set: IndexSet<Value> = [Value::from("b"), Value::from("a")].into_iter().collect();
        assert_eq!(Value::Set(set).to_json(), serde_json::json!(["b", "a"]));

        let mut map = IndexMap::new();
        map.insert("k".to_string(), Value::from(1.0));
        assert_eq!(Value::Object(map).to_json(), serde_json::json!({"k": 1}));
    }

    #[test]
    fn test_display_number_is_integral_when_whole() {
        assert_eq!(Value::Number(1234.0).to_string(), "1234");
        assert_eq!(Value::Number(12.35).to_string(), "12.35");
    }
}
