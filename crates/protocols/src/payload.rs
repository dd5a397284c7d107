//! Entry-function and view-function request shapes.

use hybrid_dex_domain::value_objects::TokenAmount;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An entry-function call handed to the signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Fully-qualified function, `0xADDR::module::function`.
    pub function: String,
    pub type_arguments: Vec<String>,
    pub function_arguments: Vec<Value>,
}

impl TransactionRequest {
    pub fn new(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        function_arguments: Vec<Value>,
    ) -> Self {
        Self {
            function: function.into(),
            type_arguments,
            function_arguments,
        }
    }

    /// Bare function name, without the module path.
    #[must_use]
    pub fn function_name(&self) -> &str {
        self.function.rsplit("::").next().unwrap_or(&self.function)
    }
}

/// A read-only view call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRequest {
    pub function: String,
    pub type_arguments: Vec<String>,
    pub function_arguments: Vec<Value>,
}

impl ViewRequest {
    pub fn new(
        function: impl Into<String>,
        type_arguments: Vec<String>,
        function_arguments: Vec<Value>,
    ) -> Self {
        Self {
            function: function.into(),
            type_arguments,
            function_arguments,
        }
    }
}

/// Raw amount argument. u64/u128 values travel as decimal strings.
pub(crate) fn amount_arg(amount: TokenAmount) -> Value {
    Value::String(amount.to_string())
}

pub(crate) fn u64_arg(v: u64) -> Value {
    Value::String(v.to_string())
}

pub(crate) fn u128_arg(v: u128) -> Value {
    Value::String(v.to_string())
}

/// Small integers (u8, fee tiers) travel as JSON numbers.
pub(crate) fn small_arg(v: u32) -> Value {
    Value::from(v)
}

/// `vector<u8>` argument from UTF-8 text.
pub(crate) fn bytes_arg(text: &str) -> Value {
    Value::Array(text.bytes().map(Value::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let req = TransactionRequest::new("0x1::amm::create_pool", vec!["A".into()], vec![small_arg(5)]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["function"], "0x1::amm::create_pool");
        assert_eq!(json["typeArguments"][0], "A");
        assert_eq!(json["functionArguments"][0], 5);
        assert_eq!(req.function_name(), "create_pool");
    }

    #[test]
    fn test_bytes_arg() {
        assert_eq!(bytes_arg("MY"), serde_json::json!([77, 89]));
    }
}
