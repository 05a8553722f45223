use serde::{Deserialize, Serialize};

/// Fully-qualified name of the division operation.
pub const DIVISION_METHOD: &str = "Service.Division";

/// Arguments of `Service.Division`.
///
/// Field names are upper-case on the wire; lower-case names are accepted
/// when decoding. A missing field decodes as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivisionArgs {
    /// Dividend.
    #[serde(rename = "A", alias = "a")]
    pub a: i64,
    /// Divisor.
    #[serde(rename = "B", alias = "b")]
    pub b: i64,
}

impl DivisionArgs {
    /// Builds division arguments.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::expect_used, reason = "test code uses expect for clarity")]

    use super::*;

    #[test]
    fn uses_upper_case_field_names() {
        let json = serde_json::to_string(&DivisionArgs::new(88, 6)).expect("serialise");
        assert_eq!(json, r#"{"A":88,"B":6}"#);
    }

    #[test]
    fn accepts_lower_case_field_names() {
        let args: DivisionArgs = serde_json::from_str(r#"{"a":88,"b":6}"#).expect("parse");
        assert_eq!(args, DivisionArgs::new(88, 6));
    }

    #[test]
    fn missing_fields_decode_as_zero() {
        let args: DivisionArgs = serde_json::from_str(r#"{"A":5}"#).expect("parse");
        assert_eq!(args, DivisionArgs::new(5, 0));
        let args: DivisionArgs = serde_json::from_str("{}").expect("parse");
        assert_eq!(args, DivisionArgs::default());
    }

    #[test]
    fn rejects_fractional_operands() {
        let result = serde_json::from_str::<DivisionArgs>(r#"{"A":1.5,"B":2}"#);
        assert!(result.is_err());
    }
}
