//! Named, typed fields awaiting allocation.

use regpack_core::{convert, Value, ValueType};
use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Result};

/// Longest accepted field name.
pub const MAX_NAME_LEN: usize = 50;

/// Hardware-description keywords that cannot name a field.
pub const RESERVED_WORDS: &[&str] = &[
    "signal",
    "entity",
    "architecture",
    "process",
    "begin",
    "end",
    "if",
    "then",
    "else",
    "loop",
    "for",
    "while",
    "case",
    "when",
];

/// A value to be carried in the register bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Field {
    /// Create a field, validating its name.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            value_type,
            default: None,
            description: None,
        })
    }

    /// Attach a default after checking its kind and domain.
    pub fn with_default(mut self, value: Value) -> Result<Self> {
        convert::validate_value(self.value_type, &value)?;
        self.default = Some(value);
        Ok(self)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn bit_width(&self) -> u32 {
        self.value_type.bit_width()
    }

    /// The explicit default, or the catalog default for the type.
    pub fn default_value(&self) -> Value {
        self.default
            .unwrap_or(self.value_type.info().default_value)
    }

    /// Re-run constructor checks. Used for fields that arrive through serde.
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if let Some(value) = &self.default {
            convert::validate_value(self.value_type, value)?;
        }
        Ok(())
    }
}

/// Check a field name against the identifier rules.
pub fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| AllocationError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let Some(first) = name.chars().next() else {
        return Err(invalid("name is empty"));
    };
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name exceeds 50 characters"));
    }
    if !first.is_ascii_alphabetic() {
        return Err(invalid("must start with a letter"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid("only letters, digits, and '_' are allowed"));
    }
    let lower = name.to_ascii_lowercase();
    if RESERVED_WORDS.contains(&lower.as_str()) {
        return Err(invalid("reserved keyword"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use regpack_core::ConversionError;

    #[test]
    fn accepts_identifiers() {
        assert!(Field::new("arm_timeout", ValueType::PulseDurationMsU16).is_ok());
        assert!(Field::new("cr6_a1", ValueType::Boolean).is_ok());
        assert!(Field::new("a".repeat(50), ValueType::Boolean).is_ok());
    }

    #[test]
    fn rejects_bad_names() {
        for bad in ["", "1st", "_x", "has-dash", "has space", "End", "signal"] {
            assert!(
                matches!(
                    Field::new(bad, ValueType::Boolean),
                    Err(AllocationError::InvalidName { .. })
                ),
                "{bad:?} should be rejected"
            );
        }
        assert!(Field::new("a".repeat(51), ValueType::Boolean).is_err());
    }

    #[test]
    fn defaults_are_checked() {
        let f = Field::new("intensity", ValueType::VoltageOutput05vS16)
            .unwrap()
            .with_default(Value::Int(2400))
            .unwrap();
        assert_eq!(f.default_value(), Value::Int(2400));

        let err = Field::new("intensity", ValueType::VoltageOutput05vS16)
            .unwrap()
            .with_default(Value::Int(6000))
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::Conversion(ConversionError::OutOfRange { max: 5000, .. })
        ));

        let err = Field::new("enable", ValueType::Boolean)
            .unwrap()
            .with_default(Value::Int(1))
            .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::Conversion(ConversionError::KindMismatch { .. })
        ));
    }

    #[test]
    fn catalog_default_fallback() {
        let f = Field::new("armed", ValueType::Boolean).unwrap();
        assert_eq!(f.default_value(), Value::Bool(false));
    }

    #[test]
    fn validate_deserialized() {
        let f: Field = serde_json::from_str(
            r#"{"name": "begin", "type": "boolean"}"#,
        )
        .unwrap();
        assert!(f.validate().is_err());
    }
}
