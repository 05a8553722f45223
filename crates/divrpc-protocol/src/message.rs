//! Request and reply envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A call to a named operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Operation name in `Service.Method` form.
    pub method: String,
    /// Raw parameters, normally an array whose first element carries the
    /// argument object. An absent or `null` field decodes as `None`; the
    /// shape is checked when the call is dispatched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Correlation identifier chosen by the client and echoed in the reply.
    #[serde(default)]
    pub id: Value,
}

impl Request {
    /// Builds a request carrying a single argument object.
    #[must_use]
    pub fn new(id: u64, method: impl Into<String>, argument: Value) -> Self {
        Self {
            method: method.into(),
            params: Some(Value::Array(vec![argument])),
            id: Value::from(id),
        }
    }
}

/// The answer to one [`Request`].
///
/// Both `result` and `error` are always serialised; exactly one of them is
/// non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Identifier copied from the request.
    #[serde(default)]
    pub id: Value,
    /// Successful result, `null` on failure.
    #[serde(default)]
    pub result: Value,
    /// Error description, `null` on success.
    #[serde(default)]
    pub error: Option<String>,
}

impl Reply {
    /// Builds a successful reply.
    #[must_use]
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            id,
            result,
            error: None,
        }
    }

    /// Builds a failed reply.
    #[must_use]
    pub fn failure(id: Value, message: impl Into<String>) -> Self {
        Self {
            id,
            result: Value::Null,
            error: Some(message.into()),
        }
    }

    /// Returns the numeric correlation identifier, if the id is an unsigned integer.
    #[must_use]
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_u64()
    }

    /// Splits the reply into its result or error message.
    ///
    /// # Errors
    ///
    /// Returns the remote error message when the reply carries one.
    pub fn into_outcome(self) -> Result<Value, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.result),
        }
    }
}

#[cfg(test)]
mod tests {
    #![expect(clippy::expect_used, reason = "test code uses expect for clarity")]

    use super::*;
    use serde_json::json;

    #[test]
    fn serialises_request_in_wire_order() {
        let request = Request::new(0, "Service.Division", json!({"A": 88, "B": 6}));
        let line = serde_json::to_string(&request).expect("serialise");
        assert_eq!(
            line,
            r#"{"method":"Service.Division","params":[{"A":88,"B":6}],"id":0}"#
        );
    }

    #[test]
    fn failure_reply_serialises_null_result() {
        let reply = Reply::failure(json!(3), "division by zero");
        let line = serde_json::to_string(&reply).expect("serialise");
        assert_eq!(line, r#"{"id":3,"result":null,"error":"division by zero"}"#);
    }

    #[test]
    fn success_reply_serialises_null_error() {
        let reply = Reply::success(json!(1), json!(2.5));
        let line = serde_json::to_string(&reply).expect("serialise");
        assert_eq!(line, r#"{"id":1,"result":2.5,"error":null}"#);
    }

    #[test]
    fn request_without_params_has_none() {
        let request: Request =
            serde_json::from_str(r#"{"method":"Service.Division","id":7}"#).expect("parse");
        assert_eq!(request.params, None);
        assert_eq!(request.id, json!(7));
    }

    #[test]
    fn null_params_decode_as_none() {
        let request: Request =
            serde_json::from_str(r#"{"method":"Service.Division","params":null,"id":2}"#)
                .expect("parse");
        assert_eq!(request.params, None);
    }

    #[test]
    fn non_array_params_survive_envelope_decoding() {
        let request: Request = serde_json::from_str(
            r#"{"method":"Service.Division","params":{"A":1,"B":2},"id":9}"#,
        )
        .expect("parse");
        assert_eq!(request.params, Some(json!({"A": 1, "B": 2})));
        assert_eq!(request.id, json!(9));
    }

    #[test]
    fn error_takes_precedence_in_outcome() {
        let reply: Reply =
            serde_json::from_str(r#"{"id":0,"result":null,"error":"boom"}"#).expect("parse");
        assert_eq!(reply.numeric_id(), Some(0));
        assert_eq!(reply.into_outcome(), Err(String::from("boom")));
    }
}
