//! Command-line style assignments applied to the merged tree before scripts run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::address::Address;
use super::error::DomainError;
use super::path;
use super::value::Value;

/// How the raw text of a set operation is converted before assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    #[default]
    Str,
    Int,
    Float,
    Bool,
    Bytes,
}

impl TypeTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Str => "str",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Bytes => "bytes",
        }
    }

    /// Convert raw text into a value of this type.
    ///
    /// `bytes` becomes a sequence of the UTF-8 byte values, the closest JSON
    /// has to a byte string.
    pub fn convert(self, raw: &str) -> Result<Value, DomainError> {
        let fail = |reason: String| DomainError::Conversion {
            raw: raw.to_owned(),
            tag: self.as_str(),
            reason,
        };

        match self {
            Self::Str => Ok(Value::String(raw.to_owned())),
            Self::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| fail(e.to_string())),
            Self::Float => {
                let parsed = raw.trim().parse::<f64>().map_err(|e| fail(e.to_string()))?;
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(|| fail("not a finite number".into()))
            }
            Self::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(fail("expected true/false, yes/no, on/off or 1/0".into())),
            },
            Self::Bytes => Ok(Value::Array(
                raw.bytes().map(|b| Value::from(u64::from(b))).collect(),
            )),
        }
    }
}

impl FromStr for TypeTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "str" | "string" => Ok(Self::Str),
            "int" | "integer" => Ok(Self::Int),
            "float" | "number" => Ok(Self::Float),
            "bool" | "boolean" => Ok(Self::Bool),
            "bytes" | "binary" => Ok(Self::Bytes),
            _ => Err(DomainError::UnknownTypeTag(s.to_owned())),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(address, raw value, type)` assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOperation {
    pub address: String,
    pub raw: String,
    pub tag: TypeTag,
}

impl SetOperation {
    /// A string-typed assignment.
    pub fn new(address: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::typed(address, raw, TypeTag::Str)
    }

    pub fn typed(address: impl Into<String>, raw: impl Into<String>, tag: TypeTag) -> Self {
        Self {
            address: address.into(),
            raw: raw.into(),
            tag,
        }
    }

    /// Build from the `ADDRESS[:TYPE]` form, e.g. `user.age:int`.
    ///
    /// The suffix is only taken as a type when it names a known tag, so
    /// field names containing ':' still work untyped.
    pub fn parse(target: &str, raw: impl Into<String>) -> Self {
        if let Some((address, suffix)) = target.rsplit_once(':')
            && let Ok(tag) = suffix.parse::<TypeTag>()
        {
            return Self::typed(address, raw, tag);
        }
        Self::new(target, raw)
    }

    /// Parse, convert and assign. Nothing is written on failure.
    pub fn apply(&self, root: &mut Value) -> Result<(), DomainError> {
        let address = Address::parse(&self.address)?;
        let value = self.tag.convert(&self.raw)?;
        path::set(root, &address, value)
            .map_err(|source| DomainError::at_address(&self.address, source))
    }
}

/// A set operation that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct SetFailure {
    pub address: String,
    pub error: DomainError,
}

/// Outcome of [`apply_all`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetReport {
    pub applied: usize,
    pub failures: Vec<SetFailure>,
}

impl SetReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Apply operations in order. A failing operation is logged and skipped;
/// the ones after it still run.
pub fn apply_all(root: &mut Value, operations: &[SetOperation]) -> SetReport {
    let mut report = SetReport::default();

    for operation in operations {
        match operation.apply(root) {
            Ok(()) => {
                debug!(address = %operation.address, tag = %operation.tag, "Applied set operation");
                report.applied += 1;
            }
            Err(error) => {
                warn!(address = %operation.address, "Could not set '{}': {}", operation.address, error);
                report.failures.push(SetFailure {
                    address: operation.address.clone(),
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_string_is_default() {
        let mut root = json!({});
        SetOperation::new("user.age", "18").apply(&mut root).unwrap();
        assert_eq!(root, json!({"user": {"age": "18"}}));
    }

    #[test]
    fn test_typed_conversions() {
        assert_eq!(TypeTag::Int.convert("42").unwrap(), json!(42));
        assert_eq!(TypeTag::Int.convert(" -7 ").unwrap(), json!(-7));
        assert_eq!(TypeTag::Float.convert("1.5").unwrap(), json!(1.5));
        assert_eq!(TypeTag::Bool.convert("yes").unwrap(), json!(true));
        assert_eq!(TypeTag::Bool.convert("0").unwrap(), json!(false));
        assert_eq!(TypeTag::Bytes.convert("hi").unwrap(), json!([104, 105]));
    }

    #[test]
    fn test_conversion_failures() {
        assert!(matches!(
            TypeTag::Int.convert("4.2"),
            Err(DomainError::Conversion { tag: "int", .. })
        ));
        assert!(TypeTag::Float.convert("inf").is_err());
        assert!(TypeTag::Bool.convert("maybe").is_err());
    }

    #[test]
    fn test_parse_type_suffix() {
        assert_eq!(
            SetOperation::parse("user.age:int", "18"),
            SetOperation::typed("user.age", "18", TypeTag::Int)
        );
        assert_eq!(
            SetOperation::parse("url:port", "80"),
            SetOperation::new("url:port", "80")
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            "uuid".parse::<TypeTag>(),
            Err(DomainError::UnknownTypeTag("uuid".into()))
        );
    }

    #[test]
    fn test_apply_all_continues_after_failure() {
        let mut root = json!({"user": {"name": "ann", "backpack": ["a", "b"]}});
        let operations = vec![
            SetOperation::new("extra", "more"),
            SetOperation::new("user.name.first", "x"),
            SetOperation::new("user[0]", "x"),
            SetOperation::new("bad..address", "x"),
            SetOperation::typed("user.age", "old", TypeTag::Int),
            SetOperation::new("user.backpack[1]", "keys"),
        ];

        let report = apply_all(&mut root, &operations);

        assert_eq!(report.applied, 2);
        let failed: Vec<_> = report.failures.iter().map(|f| f.address.as_str()).collect();
        assert_eq!(failed, vec!["user.name.first", "user[0]", "bad..address", "user.age"]);
        assert_eq!(
            root,
            json!({"user": {"name": "ann", "backpack": ["a", "keys"]}, "extra": "more"})
        );
    }

    #[test]
    fn test_failure_carries_address() {
        let mut root = json!({"a": {}});
        let err = SetOperation::new("a[2]", "5").apply(&mut root).unwrap_err();
        assert!(matches!(err, DomainError::Path { ref address, .. } if address == "a[2]"));
        assert!(err.to_string().contains("a[2]"));
    }
}
