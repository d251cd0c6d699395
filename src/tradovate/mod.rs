pub mod client;
pub mod session;
pub mod sync;

pub use client::{Account, BrokerError, Contract, TradovateClient};
pub use session::BrokerSession;
pub use sync::{run_sync, SyncError, SyncReport};
