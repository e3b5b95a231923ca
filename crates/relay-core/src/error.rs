//! Error taxonomy (spec §7).
//!
//! Two channels are kept deliberately distinct, per the "dynamic result
//! shapes" design note (spec §9): [`BlockchainError`] is the Rust-level
//! `Result::Err` channel for genuine internal failures that abort a
//! handler; [`EthError`] is a *value* — several methods construct one and
//! return it as their successful result so the JSON-RPC layer serializes
//! it under `result.error` instead of throwing. [`EthOutcome`] is the
//! tagged sum type a handler returns when it can produce either shape.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{borrow::Cow, fmt};

pub type Result<T> = std::result::Result<T, BlockchainError>;

/// The JSON-RPC error envelope (wire-level `{code, message, data}`).
#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RpcError {
    pub const fn new(code: ErrorCode) -> Self {
        RpcError { message: Cow::Borrowed(code.message()), code, data: None }
    }

    pub const fn invalid_request() -> Self {
        Self::new(ErrorCode::InvalidRequest)
    }

    pub const fn internal_error() -> Self {
        Self::new(ErrorCode::InternalError)
    }

    pub fn invalid_params<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        RpcError { code: ErrorCode::InvalidParams, message: message.into().into(), data: None }
    }

    pub fn internal_error_with<M>(message: M) -> Self
    where
        M: Into<String>,
    {
        RpcError { code: ErrorCode::InternalError, message: message.into().into(), data: None }
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.code.message(), self.message)
    }
}

impl From<EthError> for RpcError {
    fn from(err: EthError) -> Self {
        RpcError {
            code: ErrorCode::ServerError(err.code),
            message: err.message.into(),
            data: err.data,
        }
    }
}

/// List of JSON-RPC error codes.
#[derive(Debug, Copy, PartialEq, Eq, Clone)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Used for server/application specific errors, including every
    /// [`EthError`] this core constructs.
    ServerError(i64),
}

impl ErrorCode {
    pub fn code(&self) -> i64 {
        match *self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::ServerError(c) => c,
        }
    }

    pub const fn message(&self) -> &'static str {
        match *self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

impl<'a> Deserialize<'a> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<ErrorCode, D::Error>
    where
        D: Deserializer<'a>,
    {
        i64::deserialize(deserializer).map(Into::into)
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => ErrorCode::ParseError,
            -32600 => ErrorCode::InvalidRequest,
            -32601 => ErrorCode::MethodNotFound,
            -32602 => ErrorCode::InvalidParams,
            -32603 => ErrorCode::InternalError,
            _ => ErrorCode::ServerError(code),
        }
    }
}

/// Well-known application error codes, chosen to not collide with the
/// reserved JSON-RPC range (-32768..-32000).
pub mod codes {
    pub const UNSUPPORTED_METHOD: i64 = -32601;
    pub const REQUEST_BEYOND_HEAD_BLOCK: i64 = -32000;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// The "Error value" of spec §3: a tagged value some methods *return* as
/// a normal result rather than throw, so the transport serializes it as
/// `result.error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl EthError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self { code, message: message.into(), data: None }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// A deliberately unimplemented method (spec §4.1).
    pub fn unsupported_method() -> Self {
        Self::new(codes::UNSUPPORTED_METHOD, "Unsupported JSON-RPC method")
    }

    /// `eth_feeHistory` requested a block past the chain head (spec §4.5).
    pub fn request_beyond_head_block(requested: u64, head: u64) -> Self {
        Self::new(
            codes::REQUEST_BEYOND_HEAD_BLOCK,
            format!("Requested block number {requested} is beyond head block number {head}"),
        )
    }

    /// Any unexpected condition a write-path method must surface to the
    /// caller rather than throw (spec §7).
    pub fn internal_error() -> Self {
        Self::new(codes::INTERNAL_ERROR, "Internal error")
    }
}

impl fmt::Display for EthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// The tagged sum type for "dynamic result shape" methods (spec §9):
/// a handler either completed with a value, or completed by constructing
/// an [`EthError`] that the caller must still receive as a normal result.
#[derive(Debug, Clone, PartialEq)]
pub enum EthOutcome<T> {
    Success(T),
    Error(EthError),
}

impl<T> EthOutcome<T> {
    pub fn success(value: T) -> Self {
        EthOutcome::Success(value)
    }

    pub fn error(error: EthError) -> Self {
        EthOutcome::Error(error)
    }
}

impl<T> From<T> for EthOutcome<T> {
    fn from(value: T) -> Self {
        EthOutcome::Success(value)
    }
}

/// Internal failures that abort a handler (spec §7 "Internal" /
/// "Invalid parameter" / "Backend invalid-id" kinds, plus pass-through
/// errors from the two backends).
#[derive(thiserror::Error, Debug)]
pub enum BlockchainError {
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("mirror node request failed: {0}")]
    Mirror(String),
    #[error("consensus node request failed: {0}")]
    Consensus(String),
    /// `ConsensusPort` reported the account id does not resolve; callers
    /// that have a sensible default (`getBalance` -> `0x0`) catch this
    /// explicitly instead of letting it propagate.
    #[error("invalid account id")]
    InvalidAccountId,
    /// As above but for `getCode` -> `0x`.
    #[error("invalid contract id")]
    InvalidContractId,
    #[error("pre-check rejected the transaction")]
    PrecheckRejected(EthError),
    #[error("no blocks exist on this chain yet")]
    NoBlocksAvailable,
    #[error("internal error: {0}")]
    Internal(String),
}

/// Converts a handler [`Result`] into the wire-level [`crate::response::ResponseResult`].
pub trait ToRpcResult {
    fn to_rpc_result(self) -> crate::response::ResponseResult;
}

impl<T: Serialize> ToRpcResult for Result<T> {
    fn to_rpc_result(self) -> crate::response::ResponseResult {
        match self {
            Ok(val) => to_rpc_success(val),
            Err(err) => crate::response::ResponseResult::Error(blockchain_error_to_rpc(err)),
        }
    }
}

impl<T: Serialize> ToRpcResult for Result<EthOutcome<T>> {
    fn to_rpc_result(self) -> crate::response::ResponseResult {
        match self {
            Ok(EthOutcome::Success(val)) => to_rpc_success(val),
            Ok(EthOutcome::Error(err)) => to_rpc_success(err),
            Err(err) => crate::response::ResponseResult::Error(blockchain_error_to_rpc(err)),
        }
    }
}

fn to_rpc_success<T: Serialize>(val: T) -> crate::response::ResponseResult {
    match serde_json::to_value(val) {
        Ok(v) => crate::response::ResponseResult::Success(v),
        Err(_) => crate::response::ResponseResult::Error(RpcError::internal_error()),
    }
}

fn blockchain_error_to_rpc(err: BlockchainError) -> RpcError {
    match err {
        BlockchainError::InvalidParams(msg) => RpcError::invalid_params(msg),
        BlockchainError::Mirror(msg) | BlockchainError::Consensus(msg) => {
            RpcError::internal_error_with(msg)
        }
        BlockchainError::InvalidAccountId | BlockchainError::InvalidContractId => {
            RpcError::internal_error_with(err.to_string())
        }
        BlockchainError::PrecheckRejected(eth_err) => eth_err.into(),
        BlockchainError::NoBlocksAvailable => RpcError::internal_error_with(err.to_string()),
        BlockchainError::Internal(msg) => RpcError::internal_error_with(msg),
    }
}
