// SPDX-License-Identifier: MIT OR Apache-2.0
//! Field errors, error lists and their aggregate.

use crate::path::Path;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error as StdError;
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorType
// ---------------------------------------------------------------------------

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The value refers to something that does not exist.
    NotFound,
    /// A required value is missing.
    Required,
    /// The value collides with another one that must be unique.
    Duplicate,
    /// The value is malformed or out of range.
    Invalid,
    /// The value is not one of the accepted choices.
    NotSupported,
    /// The field may not be set.
    Forbidden,
    /// The value is longer than allowed.
    TooLong,
    /// The list holds more items than allowed.
    TooMany,
    /// Validation itself failed.
    Internal,
    /// The value has the wrong type.
    TypeInvalid,
}

impl ErrorType {
    /// Stable machine-readable code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "FieldValueNotFound",
            Self::Required => "FieldValueRequired",
            Self::Duplicate => "FieldValueDuplicate",
            Self::Invalid => "FieldValueInvalid",
            Self::NotSupported => "FieldValueNotSupported",
            Self::Forbidden => "FieldValueForbidden",
            Self::TooLong => "FieldValueTooLong",
            Self::TooMany => "FieldValueTooMany",
            Self::Internal => "InternalError",
            Self::TypeInvalid => "FieldValueTypeInvalid",
        }
    }

    /// Whether messages of this type leave the offending value out.
    fn omits_value(self) -> bool {
        matches!(
            self,
            Self::Required | Self::Forbidden | Self::TooLong | Self::Internal
        )
    }
}

/// Human-readable text, e.g. `Invalid value`.
impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NotFound => "Not found",
            Self::Required => "Required value",
            Self::Duplicate => "Duplicate value",
            Self::Invalid => "Invalid value",
            Self::NotSupported => "Unsupported value",
            Self::Forbidden => "Forbidden",
            Self::TooLong => "Too long",
            Self::TooMany => "Too many",
            Self::Internal => "Internal error",
            Self::TypeInvalid => "Invalid value",
        })
    }
}

impl Serialize for ErrorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldError
// ---------------------------------------------------------------------------

/// A problem with one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// Kind of problem.
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    /// Rendered path of the field.
    pub field: String,
    /// The offending value, `null` when not applicable.
    pub bad_value: Value,
    /// Extra explanation, possibly empty.
    pub detail: String,
}

impl FieldError {
    fn build(
        error_type: ErrorType,
        field: &Path,
        bad_value: Value,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            error_type,
            field: field.to_string(),
            bad_value,
            detail: detail.into(),
        }
    }

    /// The value refers to something that does not exist.
    pub fn not_found(field: &Path, value: impl Into<Value>) -> Self {
        Self::build(ErrorType::NotFound, field, value.into(), "")
    }

    /// A required value is missing.
    pub fn required(field: &Path, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Required, field, Value::String(String::new()), detail)
    }

    /// The value must be unique but is not.
    pub fn duplicate(field: &Path, value: impl Into<Value>) -> Self {
        Self::build(ErrorType::Duplicate, field, value.into(), "")
    }

    /// The value is malformed or out of range.
    pub fn invalid(field: &Path, value: impl Into<Value>, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Invalid, field, value.into(), detail)
    }

    /// The value is not one of `valid`.
    pub fn not_supported<S: AsRef<str>>(field: &Path, value: impl Into<Value>, valid: &[S]) -> Self {
        let detail = if valid.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = valid
                .iter()
                .map(|v| Value::String(v.as_ref().to_owned()).to_string())
                .collect();
            format!("supported values: {}", quoted.join(", "))
        };
        Self::build(ErrorType::NotSupported, field, value.into(), detail)
    }

    /// The field may not be set.
    pub fn forbidden(field: &Path, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::Forbidden, field, Value::String(String::new()), detail)
    }

    /// The value exceeds `max_len` bytes; `None` when the limit is unknown.
    pub fn too_long(field: &Path, value: impl Into<Value>, max_len: Option<usize>) -> Self {
        let detail = match max_len {
            Some(max) => format!("must have at most {max} bytes"),
            None => "value is too long".to_owned(),
        };
        Self::build(ErrorType::TooLong, field, value.into(), detail)
    }

    /// The list holds `actual` items where at most `max` are allowed.
    pub fn too_many(field: &Path, actual: usize, max: usize) -> Self {
        Self::build(
            ErrorType::TooMany,
            field,
            Value::from(actual),
            format!("must have at most {max} items"),
        )
    }

    /// Validation itself failed with `err`.
    pub fn internal(field: &Path, err: &dyn StdError) -> Self {
        Self::build(ErrorType::Internal, field, Value::Null, err.to_string())
    }

    /// The value has the wrong type.
    pub fn type_invalid(field: &Path, value: impl Into<Value>, detail: impl Into<String>) -> Self {
        Self::build(ErrorType::TypeInvalid, field, value.into(), detail)
    }

    /// The message without the field prefix.
    pub fn body(&self) -> String {
        let mut body = if self.error_type.omits_value() {
            self.error_type.to_string()
        } else {
            format!("{}: {}", self.error_type, self.bad_value)
        };
        if !self.detail.is_empty() {
            body.push_str(": ");
            body.push_str(&self.detail);
        }
        body
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.body())
    }
}

impl StdError for FieldError {}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

/// Selects field errors, used by [`ErrorList::filter`].
pub trait Matcher {
    /// Whether `err` is selected.
    fn matches(&self, err: &FieldError) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&FieldError) -> bool,
{
    fn matches(&self, err: &FieldError) -> bool {
        self(err)
    }
}

/// Selects errors of one [`ErrorType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorTypeMatcher(pub ErrorType);

impl Matcher for ErrorTypeMatcher {
    fn matches(&self, err: &FieldError) -> bool {
        err.error_type == self.0
    }
}

// ---------------------------------------------------------------------------
// ErrorList / Aggregate
// ---------------------------------------------------------------------------

/// An ordered collection of field errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorList(Vec<FieldError>);

impl ErrorList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one error.
    pub fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// A copy without the errors selected by any of `matchers`.
    pub fn filter(&self, matchers: &[&dyn Matcher]) -> ErrorList {
        self.0
            .iter()
            .filter(|err| !matchers.iter().any(|m| m.matches(err)))
            .cloned()
            .collect()
    }

    /// Fold into an [`Aggregate`], dropping errors whose message repeats an
    /// earlier one. `None` when the list is empty.
    pub fn to_aggregate(&self) -> Option<Aggregate> {
        let mut seen = HashSet::new();
        let errors: Vec<FieldError> = self
            .0
            .iter()
            .filter(|err| seen.insert(err.to_string()))
            .cloned()
            .collect();
        if errors.is_empty() {
            None
        } else {
            Some(Aggregate(errors))
        }
    }
}

impl FromIterator<FieldError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<FieldError> for ErrorList {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ErrorList {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<FieldError>> for ErrorList {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

/// A non-empty set of distinct field errors reported as one error.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate(Vec<FieldError>);

impl Aggregate {
    /// The collected errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Number of collected errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; an aggregate holds at least one error.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One error renders as itself; several as `[a, b]`.
impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [only] => write!(f, "{only}"),
            errors => {
                f.write_str("[")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{err}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl StdError for Aggregate {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn f() -> Path {
        Path::new("f")
    }

    #[test]
    fn constructors_set_type() {
        let io = std::io::Error::other("e");
        let cases = [
            (FieldError::invalid(&f(), "v", "d"), ErrorType::Invalid),
            (
                FieldError::not_supported(&f(), "v", &[] as &[&str]),
                ErrorType::NotSupported,
            ),
            (FieldError::duplicate(&f(), "v"), ErrorType::Duplicate),
            (FieldError::not_found(&f(), "v"), ErrorType::NotFound),
            (FieldError::required(&f(), "d"), ErrorType::Required),
            (FieldError::internal(&f(), &io), ErrorType::Internal),
            (FieldError::forbidden(&f(), "d"), ErrorType::Forbidden),
            (FieldError::too_long(&f(), "vvv", Some(2)), ErrorType::TooLong),
            (FieldError::too_many(&f(), 5, 3), ErrorType::TooMany),
            (FieldError::type_invalid(&f(), 1, "d"), ErrorType::TypeInvalid),
        ];
        for (err, expected) in cases {
            assert_eq!(err.error_type, expected, "{err}");
        }
    }

    #[test]
    fn null_value_is_rendered() {
        let s = FieldError::invalid(&Path::new(""), Value::Null, "").to_string();
        assert!(s.contains("null"), "{s}");
    }

    #[test]
    fn message_contains_every_part() {
        let s = FieldError::invalid(&Path::new("foo"), "bar", "deet").to_string();
        assert_eq!(s, r#"foo: Invalid value: "bar": deet"#);
    }

    #[test]
    fn nested_values_are_rendered() {
        let value = json!({
            "Baz": 1,
            "Qux": "aoeu",
            "Inner": {"Qux": "asdf"},
            "KV": {"Billy": 2},
        });
        let s = FieldError::invalid(&Path::new("foo"), value, "detail").to_string();
        for part in [
            "foo", "Invalid value", "Baz", "Qux", "Inner", "KV", "detail", "1", "aoeu",
            "asdf", "Billy", "2",
        ] {
            assert!(s.contains(part), "missing {part:?} in {s}");
        }
    }

    #[test]
    fn not_supported_lists_choices() {
        let err = FieldError::not_supported(&f(), "v", &["a", "b", "c"]);
        assert_eq!(
            err.body(),
            r#"Unsupported value: "v": supported values: "a", "b", "c""#
        );
    }

    #[test]
    fn value_omitted_for_some_types() {
        assert_eq!(FieldError::required(&f(), "").body(), "Required value");
        assert_eq!(
            FieldError::forbidden(&f(), "disabled").to_string(),
            "f: Forbidden: disabled"
        );
        assert_eq!(
            FieldError::too_long(&f(), "abc", Some(2)).body(),
            "Too long: must have at most 2 bytes"
        );
        assert_eq!(
            FieldError::too_long(&f(), "abc", None).body(),
            "Too long: value is too long"
        );
        let io = std::io::Error::other("boom");
        assert_eq!(FieldError::internal(&f(), &io).body(), "Internal error: boom");
    }

    #[test]
    fn too_many_reports_actual() {
        assert_eq!(
            FieldError::too_many(&f(), 5, 3).body(),
            "Too many: 5: must have at most 3 items"
        );
    }

    #[test]
    fn to_aggregate_counts() {
        let io = std::io::Error::other("e");
        let cases: Vec<(ErrorList, usize)> = vec![
            (ErrorList::new(), 0),
            (vec![FieldError::invalid(&f(), "v", "d")].into(), 1),
            (
                vec![
                    FieldError::invalid(&f(), "v", "d"),
                    FieldError::invalid(&f(), "v", "d"),
                ]
                .into(),
                1,
            ),
            (
                vec![
                    FieldError::invalid(&f(), "v", "d"),
                    FieldError::internal(&Path::new(""), &io),
                ]
                .into(),
                2,
            ),
        ];
        for (i, (list, expected)) in cases.into_iter().enumerate() {
            let agg = list.to_aggregate();
            assert_eq!(agg.as_ref().map_or(0, Aggregate::len), expected, "case {i}");
            assert_eq!(agg.is_none(), list.is_empty(), "case {i}");
        }
    }

    #[test]
    fn filter_removes_matches() {
        let list: ErrorList = vec![
            FieldError::invalid(&Path::new("test.field"), "", ""),
            FieldError::invalid(&Path::new("field.test"), "", ""),
            FieldError::duplicate(&Path::new("test"), "value"),
        ]
        .into();
        let dup = ErrorTypeMatcher(ErrorType::Duplicate);
        let inv = ErrorTypeMatcher(ErrorType::Invalid);
        assert_eq!(list.filter(&[&dup]).len(), 2);
        assert_eq!(list.filter(&[&inv]).len(), 1);
        assert_eq!(list.filter(&[&dup, &inv]).len(), 0);

        let by_field = |e: &FieldError| e.field.starts_with("test");
        assert_eq!(list.filter(&[&by_field]).len(), 1);
    }

    #[test]
    fn aggregate_display() {
        let one: ErrorList = vec![FieldError::required(&f(), "")].into();
        assert_eq!(one.to_aggregate().unwrap().to_string(), "f: Required value");

        let two: ErrorList = vec![
            FieldError::required(&Path::new("a"), ""),
            FieldError::required(&Path::new("b"), ""),
        ]
        .into();
        assert_eq!(
            two.to_aggregate().unwrap().to_string(),
            "[a: Required value, b: Required value]"
        );
    }

    #[test]
    fn serializes_with_type_code() {
        let err = FieldError::invalid(&Path::new("spec").child("port"), 70000, "out of range");
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "type": "FieldValueInvalid",
                "field": "spec.port",
                "badValue": 70000,
                "detail": "out of range",
            })
        );
    }
}
