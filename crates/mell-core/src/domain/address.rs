//! Dotted/bracket addresses into the metadata tree.
//!
//! `users[0].name` parses into `[Field("users"), Index(0), Field("name")]`.

use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// One step of an [`Address`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AddressStep {
    Field(String),
    Index(usize),
}

impl AddressStep {
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index(_))
    }
}

impl fmt::Display for AddressStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A non-empty, ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address {
    steps: Vec<AddressStep>,
}

impl Address {
    /// Parse an address string.
    ///
    /// Rejects empty dot-segments, unclosed or stray brackets, and bracket
    /// contents that are not a non-negative integer.
    pub fn parse(address: &str) -> Result<Self, DomainError> {
        let syntax = |reason: &str| DomainError::AddressSyntax {
            address: address.to_owned(),
            reason: reason.to_owned(),
        };

        if address.is_empty() {
            return Err(syntax("address is empty"));
        }

        let mut steps = Vec::new();

        for segment in address.split('.') {
            if segment.is_empty() {
                return Err(syntax("empty segment between dots"));
            }

            let mut rest = segment;
            while !rest.is_empty() {
                let Some(open) = rest.find(['[', ']']) else {
                    steps.push(AddressStep::field(rest));
                    break;
                };

                if rest[open..].starts_with(']') {
                    return Err(syntax("']' without a matching '['"));
                }
                if open > 0 {
                    steps.push(AddressStep::field(&rest[..open]));
                }

                let inner = &rest[open + 1..];
                let close = inner.find(']').ok_or_else(|| syntax("unclosed '['"))?;
                let digits = &inner[..close];

                if digits.is_empty() {
                    return Err(syntax("empty brackets"));
                }
                if !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(syntax(&format!("'{digits}' is not an index")));
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| syntax(&format!("index '{digits}' is too large")))?;

                steps.push(AddressStep::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self { steps })
    }

    /// Build an address from already-typed steps. `None` when `steps` is empty.
    pub fn from_steps(steps: Vec<AddressStep>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self { steps })
        }
    }

    pub fn steps(&self) -> &[AddressStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The final step and everything before it.
    pub fn split_last(&self) -> (&AddressStep, &[AddressStep]) {
        let (parents, last) = self.steps.split_at(self.steps.len() - 1);
        (&last[0], parents)
    }
}

impl FromStr for Address {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && !step.is_index() {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AddressStep::{Field, Index};

    fn field(name: &str) -> AddressStep {
        AddressStep::field(name)
    }

    #[test]
    fn test_single_field() {
        let address = Address::parse("a").unwrap();
        assert_eq!(address.steps(), &[field("a")]);
    }

    #[test]
    fn test_fields_and_indices() {
        let address = Address::parse("users[0].name").unwrap();
        assert_eq!(address.steps(), &[field("users"), Index(0), field("name")]);
    }

    #[test]
    fn test_consecutive_indices() {
        let address = Address::parse("matrix[1][22]").unwrap();
        assert_eq!(address.steps(), &[field("matrix"), Index(1), Index(22)]);
    }

    #[test]
    fn test_segment_of_only_an_index() {
        let address = Address::parse("a.[0]").unwrap();
        assert_eq!(address.steps(), &[field("a"), Index(0)]);
    }

    #[test]
    fn test_text_after_bracket_is_a_field() {
        let address = Address::parse("a[0]b").unwrap();
        assert_eq!(address.steps(), &[field("a"), Index(0), Field("b".into())]);
    }

    #[test]
    fn test_rejects_bad_brackets() {
        for bad in ["a[x]", "a[]", "a[-1]", "a[0", "a]0", "a[[0]]", "a[1.5]"] {
            let err = Address::parse(bad).unwrap_err();
            assert!(
                matches!(err, DomainError::AddressSyntax { .. }),
                "{bad} should be a syntax error, got {err:?}"
            );
        }
    }

    #[test]
    fn test_rejects_empty_segments() {
        for bad in ["", ".a", "a.", "a..b"] {
            assert!(Address::parse(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_rejects_overflowing_index() {
        let err = Address::parse("a[99999999999999999999999]").unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_display_round_trips_canonical_form() {
        for text in ["a", "users[0].name", "m[0][1]", "x.y.z"] {
            assert_eq!(Address::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_split_last() {
        let address = Address::parse("a.b[3]").unwrap();
        let (last, parents) = address.split_last();
        assert_eq!(last, &Index(3));
        assert_eq!(parents, &[field("a"), field("b")]);
    }
}
