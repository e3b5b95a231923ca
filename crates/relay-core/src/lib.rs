pub mod constants;
pub mod error;
pub mod hex;
pub mod ports;
pub mod response;
pub mod types;

pub use error::{BlockchainError, EthError, EthOutcome, Result, RpcError, ToRpcResult};
pub use response::ResponseResult;
