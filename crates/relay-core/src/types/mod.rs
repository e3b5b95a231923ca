pub mod block;
pub mod block_id;
pub mod call;
pub mod fee_history;
pub mod log;
pub mod receipt;
pub mod transaction;

pub use block::{Block, BlockTransactions};
pub use block_id::{BlockId, Index};
pub use call::{CallRequest, GasValue};
pub use fee_history::FeeHistory;
pub use log::Log;
pub use receipt::Receipt;
pub use transaction::Transaction;
