pub mod api;
pub mod block_tag;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod fees;
pub mod logs;
pub mod read;
pub mod send_raw_tx;
pub mod tx;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use api::EthApi;
pub use config::RelayConfig;
pub use dispatcher::{ConstantMethod, EthRequest};
