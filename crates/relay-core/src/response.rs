//! The wire-level shape of a single method result.
//!
//! Request framing, batching, and the `{jsonrpc, id}` envelope are the
//! transport's job (out of scope here, spec §1); this core only needs to
//! say whether a method call produced a value or an error.

use crate::error::RpcError;
use serde::{Deserialize, Serialize};

/// Represents the result of a call either success or error.
#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub enum ResponseResult {
    #[serde(rename = "result")]
    Success(serde_json::Value),
    #[serde(rename = "error")]
    Error(RpcError),
}

impl ResponseResult {
    pub fn success<S>(content: S) -> Self
    where
        S: Serialize,
    {
        match serde_json::to_value(content) {
            Ok(v) => ResponseResult::Success(v),
            Err(_) => ResponseResult::Error(RpcError::internal_error()),
        }
    }

    pub fn error(error: RpcError) -> Self {
        ResponseResult::Error(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseResult::Success(_))
    }
}

impl From<RpcError> for ResponseResult {
    fn from(err: RpcError) -> Self {
        ResponseResult::error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_round_trips_through_json() {
        let r = ResponseResult::success(vec![1, 2, 3]);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"result\""));
    }
}
